// ==========================================
// 航班数据分析系统 - 航班导入实现
// ==========================================
// 导入管道（6 阶段）:
//   0. 文件解析（CSV/Excel → 原始行）
//   1. 字段映射（类型转换，失败行进入冲突队列）
//   2. 数据清洗（TRIM/NULL 标准化 + 数据集清洗规则）
//   3. DQ 校验（必填 ERROR 阻断 / 范围 WARNING / 一致性 INFO）
//   4. 重复检测（自然键缺失 / 同批次 / 跨批次）
//   5. 分块事务落库 + 批次与冲突记录
// ==========================================

use crate::config::import_config_trait::LoaderConfigReader;
use crate::domain::flight::{
    ConflictType, DqLevel, DqReport, DqSummary, DqViolation, FlightRecord, ImportBatch,
    ImportConflict, ImportResult, RawFlightRecord,
};
use crate::importer::conflict_handler::FlightConflictHandler;
use crate::importer::data_cleaner::FlightDataCleaner;
use crate::importer::dq_validator::FlightDqValidator;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::flight_importer_trait::{
    ConflictHandler, DataCleaner, DqValidator, FlightFieldMapper, FlightImporter,
};
use crate::repository::flight_import_repo::FlightImportRepository;
use async_trait::async_trait;
use chrono::{Datelike, Utc};
use std::collections::HashSet;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};
use uuid::Uuid;

// ==========================================
// FlightImporterImpl
// ==========================================
pub struct FlightImporterImpl<R, C>
where
    R: FlightImportRepository,
    C: LoaderConfigReader,
{
    repo: Arc<R>,
    config: Arc<C>,
    imported_by: String,
}

impl<R, C> FlightImporterImpl<R, C>
where
    R: FlightImportRepository,
    C: LoaderConfigReader,
{
    pub fn new(repo: Arc<R>, config: Arc<C>) -> Self {
        Self {
            repo,
            config,
            imported_by: "system".to_string(),
        }
    }

    pub fn with_imported_by(mut self, imported_by: impl Into<String>) -> Self {
        self.imported_by = imported_by.into();
        self
    }

    fn make_conflict(
        batch_id: &str,
        row_number: usize,
        flight_key: Option<String>,
        conflict_type: ConflictType,
        raw_data: String,
        reason: String,
    ) -> ImportConflict {
        ImportConflict {
            conflict_id: Uuid::new_v4().to_string(),
            batch_id: batch_id.to_string(),
            row_number,
            flight_key,
            conflict_type,
            raw_data,
            reason,
            resolved: false,
            created_at: Utc::now(),
        }
    }

    /// RawFlightRecord → FlightRecord（必填字段已通过 DQ 校验）
    ///
    /// 日期维度列缺失时从 fl_date 推导。
    fn to_flight_record(raw: &RawFlightRecord) -> Option<FlightRecord> {
        let fl_date = raw.fl_date?;
        let now = Utc::now();

        Some(FlightRecord {
            year: raw.year.or(Some(fl_date.year())),
            month: raw.month.or(Some(fl_date.month() as i32)),
            day_of_month: raw.day_of_month.or(Some(fl_date.day() as i32)),
            day_of_week: raw
                .day_of_week
                .or(Some(fl_date.weekday().number_from_monday() as i32)),
            fl_date,
            op_unique_carrier: raw.op_unique_carrier.clone()?,
            op_carrier_fl_num: raw.op_carrier_fl_num,
            origin: raw.origin.clone()?,
            origin_city_name: raw.origin_city_name.clone(),
            origin_state_nm: raw.origin_state_nm.clone(),
            dest: raw.dest.clone()?,
            dest_city_name: raw.dest_city_name.clone(),
            dest_state_nm: raw.dest_state_nm.clone(),
            crs_dep_time: raw.crs_dep_time,
            dep_time: raw.dep_time,
            dep_delay: raw.dep_delay,
            taxi_out: raw.taxi_out,
            wheels_off: raw.wheels_off,
            wheels_on: raw.wheels_on,
            taxi_in: raw.taxi_in,
            crs_arr_time: raw.crs_arr_time,
            arr_time: raw.arr_time,
            arr_delay: raw.arr_delay,
            cancelled: raw.cancelled.unwrap_or(false),
            cancellation_code: raw.cancellation_code.clone(),
            diverted: raw.diverted.unwrap_or(false),
            crs_elapsed_time: raw.crs_elapsed_time,
            actual_elapsed_time: raw.actual_elapsed_time,
            air_time: raw.air_time,
            distance: raw.distance,
            carrier_delay: raw.carrier_delay,
            weather_delay: raw.weather_delay,
            nas_delay: raw.nas_delay,
            security_delay: raw.security_delay,
            late_aircraft_delay: raw.late_aircraft_delay,
            created_at: now,
            updated_at: now,
        })
    }
}

#[async_trait]
impl<R, C> FlightImporter for FlightImporterImpl<R, C>
where
    R: FlightImportRepository + 'static,
    C: LoaderConfigReader + 'static,
{
    #[instrument(skip(self, file_path))]
    async fn import_from_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> Result<ImportResult, Box<dyn Error>> {
        let started = Instant::now();
        let path = file_path.as_ref();
        let batch_id = Uuid::new_v4().to_string();

        info!(batch_id = %batch_id, file = %path.display(), "开始导入航班文件");

        // ===== 读取配置口径 =====
        let chunk_size = self.config.get_load_chunk_size().await?;
        let truncate_before_load = self.config.get_truncate_before_load().await?;
        let delay_threshold = self.config.get_delay_anomaly_threshold_minutes().await?;
        let max_distance = self.config.get_max_reasonable_distance_miles().await?;

        // ===== 阶段 0: 文件解析 =====
        let parser = UniversalFileParser;
        let rows = parser.parse(path)?;
        let total_rows = rows.len();

        // ===== 阶段 1: 字段映射 =====
        let mapper = FieldMapper::new();
        let mut records: Vec<RawFlightRecord> = Vec::with_capacity(total_rows);
        let mut conflicts: Vec<ImportConflict> = Vec::new();

        for (idx, row) in rows.into_iter().enumerate() {
            let row_number = idx + 2; // 行号含表头
            let raw_json = serde_json::to_string(&row).unwrap_or_default();

            match mapper.map_to_raw_flight(row, row_number) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(row = row_number, error = %e, "字段映射失败，进入冲突队列");
                    conflicts.push(Self::make_conflict(
                        &batch_id,
                        row_number,
                        None,
                        ConflictType::DataTypeError,
                        raw_json,
                        e.to_string(),
                    ));
                }
            }
        }

        // ===== 阶段 2: 数据清洗 =====
        let cleaner = FlightDataCleaner::new();
        for record in &mut records {
            cleaner.clean_record(record);
        }

        // ===== 阶段 3: DQ 校验 =====
        let validator = FlightDqValidator::new(delay_threshold, max_distance);
        let mut violations: Vec<DqViolation> = Vec::new();
        let mut blocked_rows: HashSet<usize> = HashSet::new();

        for record in &records {
            let mut row_violations = validator.validate_required_fields(record);
            row_violations.extend(validator.validate_ranges(record));
            row_violations.extend(validator.validate_cancellation_consistency(record));

            if row_violations
                .iter()
                .any(|v| v.level == DqLevel::Error)
            {
                blocked_rows.insert(record.row_number);
            }
            violations.extend(row_violations);
        }

        // ===== 阶段 4: 重复检测 =====
        let importable: Vec<RawFlightRecord> = records
            .iter()
            .filter(|r| !blocked_rows.contains(&r.row_number))
            .cloned()
            .collect();

        // 4a. 自然键缺失: 无法去重/幂等重载，进入冲突队列
        let (keyed, keyless): (Vec<_>, Vec<_>) = importable
            .into_iter()
            .partition(|r| r.flight_key().is_some());

        for record in &keyless {
            conflicts.push(Self::make_conflict(
                &batch_id,
                record.row_number,
                None,
                ConflictType::KeyMissing,
                serde_json::to_string(record).unwrap_or_default(),
                "自然键字段不全（航班号/计划起飞时刻缺失）".to_string(),
            ));
        }

        // 4b. 同批次重复（保留首次出现的行）
        let handler = FlightConflictHandler::new();
        let intra_dups = handler.detect_duplicates(&keyed);
        let mut dup_rows: HashSet<usize> = intra_dups.iter().map(|(row, _)| *row).collect();

        for (row_number, key) in intra_dups {
            let record = keyed.iter().find(|r| r.row_number == row_number);
            conflicts.push(Self::make_conflict(
                &batch_id,
                row_number,
                Some(key.clone()),
                ConflictType::DuplicateFlight,
                record
                    .map(|r| serde_json::to_string(r).unwrap_or_default())
                    .unwrap_or_default(),
                format!("同批次重复航班: {}", key),
            ));
        }

        // 4c. 跨批次重复（全量重载模式下跳过，主表即将清空）
        if !truncate_before_load {
            let keys: Vec<String> = keyed
                .iter()
                .filter(|r| !dup_rows.contains(&r.row_number))
                .filter_map(|r| r.flight_key())
                .collect();
            let existing = self
                .repo
                .batch_check_exists(&keys)
                .await
                .map_err(|e| e.to_string())?;

            let cross_dups = handler.detect_cross_batch_duplicates(&keyed, &existing);
            for (row_number, key) in cross_dups {
                if !dup_rows.insert(row_number) {
                    continue;
                }
                let record = keyed.iter().find(|r| r.row_number == row_number);
                conflicts.push(Self::make_conflict(
                    &batch_id,
                    row_number,
                    Some(key.clone()),
                    ConflictType::DuplicateFlight,
                    record
                        .map(|r| serde_json::to_string(r).unwrap_or_default())
                        .unwrap_or_default(),
                    format!("跨批次重复航班（库中已存在）: {}", key),
                ));
            }
        }

        let loadable: Vec<FlightRecord> = keyed
            .iter()
            .filter(|r| !dup_rows.contains(&r.row_number))
            .filter_map(Self::to_flight_record)
            .collect();

        // ===== 阶段 5: 落库 =====
        if truncate_before_load {
            self.repo
                .truncate_flights()
                .await
                .map_err(|e| e.to_string())?;
        }

        let (inserted, chunk_count) = self
            .repo
            .batch_insert_flights(&loadable, chunk_size)
            .await
            .map_err(|e| e.to_string())?;

        self.repo
            .insert_conflicts(&conflicts)
            .await
            .map_err(|e| e.to_string())?;

        // ===== 汇总与批次记录 =====
        let warning_rows: HashSet<usize> = violations
            .iter()
            .filter(|v| v.level == DqLevel::Warning && !blocked_rows.contains(&v.row_number))
            .map(|v| v.row_number)
            .collect();

        let summary = DqSummary {
            total_rows,
            success: inserted,
            blocked: blocked_rows.len(),
            warning: warning_rows.len(),
            conflict: conflicts.len(),
        };

        let dq_report = DqReport {
            batch_id: batch_id.clone(),
            summary: summary.clone(),
            violations: violations.clone(),
        };
        let dq_report_json = serde_json::to_string(&dq_report)?;

        let elapsed = started.elapsed();
        let batch = ImportBatch {
            batch_id: batch_id.clone(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string()),
            file_path: Some(path.display().to_string()),
            total_rows: total_rows as i32,
            success_rows: inserted as i32,
            blocked_rows: blocked_rows.len() as i32,
            warning_rows: warning_rows.len() as i32,
            conflict_rows: conflicts.len() as i32,
            chunk_count: chunk_count as i32,
            imported_at: Some(Utc::now()),
            imported_by: Some(self.imported_by.clone()),
            elapsed_ms: Some(elapsed.as_millis() as i32),
            dq_report_json: Some(dq_report_json),
        };

        self.repo
            .insert_batch(&batch)
            .await
            .map_err(|e| e.to_string())?;

        info!(
            batch_id = %batch_id,
            total = total_rows,
            success = inserted,
            blocked = summary.blocked,
            conflict = summary.conflict,
            chunks = chunk_count,
            elapsed_ms = elapsed.as_millis() as i64,
            "航班文件导入完成"
        );

        Ok(ImportResult {
            batch,
            summary,
            violations,
            elapsed_time: elapsed,
        })
    }

    /// 批量导入多个文件（并发执行，单文件失败不影响其他文件）
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Result<Vec<Result<ImportResult, String>>, Box<dyn Error>> {
        use futures::future::join_all;

        info!(count = file_paths.len(), "开始批量导入文件");

        let import_tasks = file_paths.into_iter().map(|path| {
            let path_str = path.as_ref().to_string_lossy().to_string();
            async move {
                match self.import_from_file(path).await {
                    Ok(result) => Ok(result),
                    Err(e) => {
                        warn!(file = %path_str, error = %e, "文件导入失败");
                        Err(format!("{}: {}", path_str, e))
                    }
                }
            }
        });

        let results = join_all(import_tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        Ok(results)
    }
}
