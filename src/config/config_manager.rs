// ==========================================
// 航班数据分析系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::LoaderConfigReader;
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - `config list` 子命令输出 / 问题排查时确认当前口径
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }
}

// ==========================================
// LoaderConfigReader Trait 实现
// ==========================================
#[async_trait]
impl LoaderConfigReader for ConfigManager {
    // ===== 入库配置 =====

    async fn get_load_chunk_size(&self) -> Result<usize, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::LOAD_CHUNK_SIZE, "10000")?;
        let parsed = value.parse::<usize>().unwrap_or(10_000);
        // 0 会导致 chunks(0) panic，最小取 1
        Ok(parsed.max(1))
    }

    async fn get_truncate_before_load(&self) -> Result<bool, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::TRUNCATE_BEFORE_LOAD, "true")?;
        Ok(matches!(
            value.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ))
    }

    // ===== 数据质量配置 =====

    async fn get_delay_anomaly_threshold_minutes(&self) -> Result<f64, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::DELAY_ANOMALY_THRESHOLD, "2880")?;
        Ok(value.parse::<f64>().unwrap_or(2880.0))
    }

    async fn get_max_reasonable_distance_miles(&self) -> Result<f64, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::MAX_REASONABLE_DISTANCE, "6000")?;
        Ok(value.parse::<f64>().unwrap_or(6000.0))
    }

    // ===== 统计口径配置 =====

    async fn get_on_time_threshold_minutes(&self) -> Result<i32, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::ON_TIME_THRESHOLD, "15")?;
        Ok(value.parse::<i32>().unwrap_or(15))
    }

    // ===== 批次保留 =====

    async fn get_batch_retention_days(&self) -> Result<i32, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::BATCH_RETENTION_DAYS, "90")?;
        Ok(value.parse::<i32>().unwrap_or(90))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 入库
    pub const LOAD_CHUNK_SIZE: &str = "load_chunk_size";
    pub const TRUNCATE_BEFORE_LOAD: &str = "truncate_before_load";

    // 数据质量
    pub const DELAY_ANOMALY_THRESHOLD: &str = "delay_anomaly_threshold_minutes";
    pub const MAX_REASONABLE_DISTANCE: &str = "max_reasonable_distance_miles";

    // 统计口径
    pub const ON_TIME_THRESHOLD: &str = "on_time_threshold_minutes";

    // 批次保留
    pub const BATCH_RETENTION_DAYS: &str = "batch_retention_days";
}
