// ==========================================
// 航班数据分析系统 - 配置层
// ==========================================
// 职责: 系统配置读取与管理
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::LoaderConfigReader;
