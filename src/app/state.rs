// ==========================================
// 航班数据分析系统 - 应用状态装配
// ==========================================
// 职责: 共享连接 + 配置 + 仓储 + API 的统一装配入口
// 连接策略: 单连接 Arc<Mutex<Connection>>，各层共享
// ==========================================

use crate::api::analytics_api::AnalyticsApi;
use crate::api::import_api::ImportApi;
use crate::config::config_manager::ConfigManager;
use crate::repository::flight_import_repo_impl::FlightImportRepositoryImpl;
use crate::repository::stats_repo::StatsRepositoryImpl;
use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;

/// 数据库路径环境变量（优先于默认位置）
pub const DB_PATH_ENV: &str = "FLIGHT_ANALYTICS_DB_PATH";

/// 默认数据库文件名
pub const DEFAULT_DB_FILE: &str = "flight_analytics.db";

// ==========================================
// AppState
// ==========================================
pub struct AppState {
    pub db_path: String,
    pub config: Arc<ConfigManager>,
    pub import_api: Arc<ImportApi>,
    pub analytics_api: Arc<AnalyticsApi>,
}

impl AppState {
    /// 按数据库路径装配全部组件
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        info!(db_path, "装配应用状态");

        let mut conn = crate::db::open_sqlite_connection(db_path)?;
        crate::db::init_schema(&conn)?;
        crate::perf::install_sqlite_tracing(&mut conn);
        let conn = Arc::new(Mutex::new(conn));

        let config = Arc::new(ConfigManager::from_connection(conn.clone())?);
        let import_repo = Arc::new(FlightImportRepositoryImpl::from_connection(conn.clone())?);
        let stats_repo = Arc::new(StatsRepositoryImpl::from_connection(conn));

        let import_api = Arc::new(ImportApi::new(import_repo, config.clone()));
        let analytics_api = Arc::new(AnalyticsApi::new(stats_repo, config.clone()));

        Ok(Self {
            db_path: db_path.to_string(),
            config,
            import_api,
            analytics_api,
        })
    }

    /// 使用默认数据库路径装配
    pub fn with_default_db() -> Result<Self, Box<dyn Error>> {
        let path = get_default_db_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::new(&path.to_string_lossy())
    }
}

/// 解析默认数据库路径
///
/// 优先级: 环境变量 FLIGHT_ANALYTICS_DB_PATH > 系统数据目录 > 当前目录
pub fn get_default_db_path() -> PathBuf {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    dirs::data_dir()
        .map(|d| d.join("flight-analytics").join(DEFAULT_DB_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
}
