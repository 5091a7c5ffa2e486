// ==========================================
// 航班数据分析系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少偶发 busy 错误
// - 内嵌建库 DDL（单文件数据库，一次性建表）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 建库 DDL
///
/// flight 表列集与 flight_data_2024 数据字典对齐（35 列）。
/// 自然键唯一索引用于 INSERT OR REPLACE 的重复覆盖语义。
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS flight (
    flight_rowid INTEGER PRIMARY KEY AUTOINCREMENT,
    year INTEGER,
    month INTEGER,
    day_of_month INTEGER,
    day_of_week INTEGER,
    fl_date TEXT NOT NULL,
    op_unique_carrier TEXT NOT NULL,
    op_carrier_fl_num INTEGER,
    origin TEXT NOT NULL,
    origin_city_name TEXT,
    origin_state_nm TEXT,
    dest TEXT NOT NULL,
    dest_city_name TEXT,
    dest_state_nm TEXT,
    crs_dep_time INTEGER,
    dep_time REAL,
    dep_delay REAL,
    taxi_out REAL,
    wheels_off REAL,
    wheels_on REAL,
    taxi_in REAL,
    crs_arr_time INTEGER,
    arr_time REAL,
    arr_delay REAL,
    cancelled INTEGER NOT NULL DEFAULT 0,
    cancellation_code TEXT,
    diverted INTEGER NOT NULL DEFAULT 0,
    crs_elapsed_time REAL,
    actual_elapsed_time REAL,
    air_time REAL,
    distance REAL,
    carrier_delay INTEGER,
    weather_delay INTEGER,
    nas_delay INTEGER,
    security_delay INTEGER,
    late_aircraft_delay INTEGER,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_flight_natural_key
    ON flight (fl_date, op_unique_carrier, op_carrier_fl_num, origin, crs_dep_time);

CREATE INDEX IF NOT EXISTS idx_flight_carrier ON flight (op_unique_carrier);
CREATE INDEX IF NOT EXISTS idx_flight_month ON flight (month);
CREATE INDEX IF NOT EXISTS idx_flight_route ON flight (origin, dest);

CREATE TABLE IF NOT EXISTS import_batch (
    batch_id TEXT PRIMARY KEY,
    file_name TEXT,
    file_path TEXT,
    total_rows INTEGER NOT NULL DEFAULT 0,
    success_rows INTEGER NOT NULL DEFAULT 0,
    blocked_rows INTEGER NOT NULL DEFAULT 0,
    warning_rows INTEGER NOT NULL DEFAULT 0,
    conflict_rows INTEGER NOT NULL DEFAULT 0,
    chunk_count INTEGER NOT NULL DEFAULT 0,
    imported_at TEXT,
    imported_by TEXT,
    elapsed_ms INTEGER,
    dq_report_json TEXT
);

CREATE TABLE IF NOT EXISTS import_conflict (
    conflict_id TEXT PRIMARY KEY,
    source_batch_id TEXT NOT NULL,
    flight_key TEXT,
    row_number INTEGER NOT NULL,
    conflict_type TEXT NOT NULL,
    source_row_json TEXT NOT NULL,
    reason TEXT NOT NULL DEFAULT '',
    resolution_status TEXT NOT NULL DEFAULT 'OPEN',
    detected_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_conflict_batch ON import_conflict (source_batch_id);
CREATE INDEX IF NOT EXISTS idx_conflict_status ON import_conflict (resolution_status);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库结构（幂等）
///
/// 建表后写入 schema_version 戳记（若尚未写入）。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    let current = read_schema_version(conn)?;
    if current.unwrap_or(0) < CURRENT_SCHEMA_VERSION {
        conn.execute(
            "INSERT OR REPLACE INTO schema_version (version, applied_at) VALUES (?1, ?2)",
            rusqlite::params![
                CURRENT_SCHEMA_VERSION,
                chrono::Utc::now().to_rfc3339()
            ],
        )?;
    }
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
