// ==========================================
// 航班数据分析系统 - 航班导入仓储 SQLite 实现
// ==========================================
// 职责: flight / import_batch / import_conflict 三表读写
// 事务: 分块事务（unchecked_transaction），块内失败整块回滚
// ==========================================

use crate::domain::flight::{ConflictType, FlightRecord, ImportBatch, ImportConflict};
use crate::repository::error::{RepoResult, RepositoryError};
use crate::repository::flight_import_repo::FlightImportRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// SQLite 单语句参数上限以内的 IN 子句分片大小
const SQL_IN_CHUNK: usize = 500;

const INSERT_FLIGHT_SQL: &str = r#"
INSERT OR REPLACE INTO flight (
    year, month, day_of_month, day_of_week, fl_date,
    op_unique_carrier, op_carrier_fl_num, origin, origin_city_name, origin_state_nm,
    dest, dest_city_name, dest_state_nm,
    crs_dep_time, dep_time, dep_delay, taxi_out, wheels_off, wheels_on, taxi_in,
    crs_arr_time, arr_time, arr_delay,
    cancelled, cancellation_code, diverted,
    crs_elapsed_time, actual_elapsed_time, air_time, distance,
    carrier_delay, weather_delay, nas_delay, security_delay, late_aircraft_delay,
    created_at, updated_at
) VALUES (
    ?1, ?2, ?3, ?4, ?5,
    ?6, ?7, ?8, ?9, ?10,
    ?11, ?12, ?13,
    ?14, ?15, ?16, ?17, ?18, ?19, ?20,
    ?21, ?22, ?23,
    ?24, ?25, ?26,
    ?27, ?28, ?29, ?30,
    ?31, ?32, ?33, ?34, ?35,
    ?36, ?37
)
"#;

/// flight_key 的 SQL 表达式（与 RawFlightRecord::flight_key 同口径）
const FLIGHT_KEY_EXPR: &str = "fl_date || '|' || op_unique_carrier || '|' || op_carrier_fl_num \
     || '|' || origin || '|' || printf('%04d', crs_dep_time)";

// ==========================================
// FlightImportRepositoryImpl
// ==========================================
pub struct FlightImportRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl FlightImportRepositoryImpl {
    pub fn new(db_path: &str) -> RepoResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;
        crate::db::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepoResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn lock(&self) -> RepoResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn conflict_type_to_str(t: ConflictType) -> &'static str {
        match t {
            ConflictType::KeyMissing => "KEY_MISSING",
            ConflictType::DuplicateFlight => "DUPLICATE_FLIGHT",
            ConflictType::DataTypeError => "DATA_TYPE_ERROR",
        }
    }

    fn conflict_type_from_str(s: &str) -> ConflictType {
        match s {
            "KEY_MISSING" => ConflictType::KeyMissing,
            "DATA_TYPE_ERROR" => ConflictType::DataTypeError,
            _ => ConflictType::DuplicateFlight,
        }
    }

    fn parse_utc(value: Option<String>) -> Option<DateTime<Utc>> {
        value
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|d| d.with_timezone(&Utc))
    }
}

#[async_trait]
impl FlightImportRepository for FlightImportRepositoryImpl {
    #[instrument(skip(self))]
    async fn truncate_flights(&self) -> RepoResult<usize> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM flight", [])?;
        info!(deleted, "已清空航班主表");
        Ok(deleted)
    }

    #[instrument(skip(self, records), fields(total = records.len(), chunk_size))]
    async fn batch_insert_flights(
        &self,
        records: &[FlightRecord],
        chunk_size: usize,
    ) -> RepoResult<(usize, usize)> {
        if records.is_empty() {
            return Ok((0, 0));
        }

        let chunk_size = chunk_size.max(1);
        let conn = self.lock()?;

        let mut inserted = 0usize;
        let mut chunk_count = 0usize;

        for (chunk_index, chunk) in records.chunks(chunk_size).enumerate() {
            let row_from = chunk_index * chunk_size + 1;
            let row_to = row_from + chunk.len() - 1;

            let tx = conn.unchecked_transaction()?;
            {
                let mut stmt = tx.prepare_cached(INSERT_FLIGHT_SQL)?;

                for record in chunk {
                    stmt.execute(params![
                        record.year,
                        record.month,
                        record.day_of_month,
                        record.day_of_week,
                        record.fl_date.format("%Y-%m-%d").to_string(),
                        record.op_unique_carrier,
                        record.op_carrier_fl_num,
                        record.origin,
                        record.origin_city_name,
                        record.origin_state_nm,
                        record.dest,
                        record.dest_city_name,
                        record.dest_state_nm,
                        record.crs_dep_time,
                        record.dep_time,
                        record.dep_delay,
                        record.taxi_out,
                        record.wheels_off,
                        record.wheels_on,
                        record.taxi_in,
                        record.crs_arr_time,
                        record.arr_time,
                        record.arr_delay,
                        record.cancelled as i32,
                        record.cancellation_code,
                        record.diverted as i32,
                        record.crs_elapsed_time,
                        record.actual_elapsed_time,
                        record.air_time,
                        record.distance,
                        record.carrier_delay,
                        record.weather_delay,
                        record.nas_delay,
                        record.security_delay,
                        record.late_aircraft_delay,
                        record.created_at.to_rfc3339(),
                        record.updated_at.to_rfc3339(),
                    ])
                    .map_err(|e| {
                        warn!(chunk_index, row_from, row_to, error = %e, "块写入失败，整块回滚");
                        RepositoryError::ChunkTransactionError {
                            chunk_index,
                            row_from,
                            row_to,
                            message: e.to_string(),
                        }
                    })?;
                }
            }
            tx.commit()?;

            inserted += chunk.len();
            chunk_count += 1;
            debug!(chunk_index, rows = chunk.len(), "事务块已提交");
        }

        info!(inserted, chunk_count, "航班批量写入完成");
        Ok((inserted, chunk_count))
    }

    async fn count_flights(&self) -> RepoResult<i64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM flight", [], |row| row.get(0))?;
        Ok(count)
    }

    #[instrument(skip(self, flight_keys), fields(total = flight_keys.len()))]
    async fn batch_check_exists(&self, flight_keys: &[String]) -> RepoResult<Vec<String>> {
        if flight_keys.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.lock()?;
        let mut existing = Vec::new();

        // IN 子句分片，避免超出 SQLite 参数上限
        for chunk in flight_keys.chunks(SQL_IN_CHUNK) {
            let placeholders = (1..=chunk.len())
                .map(|i| format!("?{}", i))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "SELECT {expr} FROM flight WHERE {expr} IN ({placeholders})",
                expr = FLIGHT_KEY_EXPR,
                placeholders = placeholders
            );

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(
                rusqlite::params_from_iter(chunk.iter()),
                |row| row.get::<_, String>(0),
            )?;

            for row in rows {
                existing.push(row?);
            }
        }

        Ok(existing)
    }

    async fn insert_batch(&self, batch: &ImportBatch) -> RepoResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO import_batch (
                batch_id, file_name, file_path,
                total_rows, success_rows, blocked_rows, warning_rows, conflict_rows,
                chunk_count, imported_at, imported_by, elapsed_ms, dq_report_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                batch.batch_id,
                batch.file_name,
                batch.file_path,
                batch.total_rows,
                batch.success_rows,
                batch.blocked_rows,
                batch.warning_rows,
                batch.conflict_rows,
                batch.chunk_count,
                batch.imported_at.map(|d| d.to_rfc3339()),
                batch.imported_by,
                batch.elapsed_ms,
                batch.dq_report_json,
            ],
        )?;
        Ok(())
    }

    async fn get_recent_batches(&self, limit: usize) -> RepoResult<Vec<ImportBatch>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, file_name, file_path,
                   total_rows, success_rows, blocked_rows, warning_rows, conflict_rows,
                   chunk_count, imported_at, imported_by, elapsed_ms, dq_report_json
            FROM import_batch
            ORDER BY imported_at DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            let imported_at: Option<String> = row.get(9)?;
            Ok(ImportBatch {
                batch_id: row.get(0)?,
                file_name: row.get(1)?,
                file_path: row.get(2)?,
                total_rows: row.get(3)?,
                success_rows: row.get(4)?,
                blocked_rows: row.get(5)?,
                warning_rows: row.get(6)?,
                conflict_rows: row.get(7)?,
                chunk_count: row.get(8)?,
                imported_at: Self::parse_utc(imported_at),
                imported_by: row.get(10)?,
                elapsed_ms: row.get(11)?,
                dq_report_json: row.get(12)?,
            })
        })?;

        let mut batches = Vec::new();
        for row in rows {
            batches.push(row?);
        }
        Ok(batches)
    }

    async fn insert_conflicts(&self, conflicts: &[ImportConflict]) -> RepoResult<()> {
        if conflicts.is_empty() {
            return Ok(());
        }

        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                r#"
                INSERT INTO import_conflict (
                    conflict_id, source_batch_id, flight_key, row_number,
                    conflict_type, source_row_json, reason, resolution_status, detected_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )?;

            for conflict in conflicts {
                stmt.execute(params![
                    conflict.conflict_id,
                    conflict.batch_id,
                    conflict.flight_key,
                    conflict.row_number as i64,
                    Self::conflict_type_to_str(conflict.conflict_type),
                    conflict.raw_data,
                    conflict.reason,
                    if conflict.resolved { "RESOLVED" } else { "OPEN" },
                    conflict.created_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;

        debug!(count = conflicts.len(), "冲突记录已写入");
        Ok(())
    }

    async fn list_conflicts(
        &self,
        batch_id: Option<&str>,
        resolved: Option<bool>,
    ) -> RepoResult<Vec<ImportConflict>> {
        let conn = self.lock()?;

        let mut sql = String::from(
            r#"
            SELECT conflict_id, source_batch_id, flight_key, row_number,
                   conflict_type, source_row_json, reason, resolution_status, detected_at
            FROM import_conflict
            WHERE 1=1
            "#,
        );
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(batch_id) = batch_id {
            sql.push_str(&format!(" AND source_batch_id = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(batch_id.to_string()));
        }
        if let Some(resolved) = resolved {
            sql.push_str(&format!(" AND resolution_status = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(if resolved { "RESOLVED" } else { "OPEN" }));
        }
        sql.push_str(" ORDER BY detected_at DESC, row_number ASC");

        let mut stmt = conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let rows = stmt.query_map(param_refs.as_slice(), |row| {
            let detected_at: Option<String> = row.get(8)?;
            let status: String = row.get(7)?;
            let conflict_type: String = row.get(4)?;
            Ok(ImportConflict {
                conflict_id: row.get(0)?,
                batch_id: row.get(1)?,
                flight_key: row.get(2)?,
                row_number: row.get::<_, i64>(3)? as usize,
                conflict_type: Self::conflict_type_from_str(&conflict_type),
                raw_data: row.get(5)?,
                reason: row.get(6)?,
                resolved: status == "RESOLVED",
                created_at: Self::parse_utc(detected_at).unwrap_or_else(Utc::now),
            })
        })?;

        let mut conflicts = Vec::new();
        for row in rows {
            conflicts.push(row?);
        }
        Ok(conflicts)
    }

    async fn count_conflicts(
        &self,
        batch_id: Option<&str>,
        resolved: Option<bool>,
    ) -> RepoResult<i64> {
        let conn = self.lock()?;

        let mut sql = String::from("SELECT COUNT(*) FROM import_conflict WHERE 1=1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(batch_id) = batch_id {
            sql.push_str(&format!(" AND source_batch_id = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(batch_id.to_string()));
        }
        if let Some(resolved) = resolved {
            sql.push_str(&format!(" AND resolution_status = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(if resolved { "RESOLVED" } else { "OPEN" }));
        }

        let param_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();
        let count: i64 = conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))?;
        Ok(count)
    }

    async fn resolve_conflict(&self, conflict_id: &str) -> RepoResult<()> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE import_conflict SET resolution_status = 'RESOLVED' WHERE conflict_id = ?1",
            params![conflict_id],
        )?;

        if updated == 0 {
            return Err(RepositoryError::NotFound(format!(
                "冲突记录不存在: {}",
                conflict_id
            )));
        }
        Ok(())
    }
}
