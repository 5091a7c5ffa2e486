// ==========================================
// 航班数据分析系统 - API 层
// ==========================================
// 职责: 面向调用方（CLI/上层应用）的稳定接口
// ==========================================

pub mod analytics_api;
pub mod error;
pub mod import_api;

pub use analytics_api::{AnalyticsApi, DashboardSummary};
pub use error::{ApiError, ApiResult};
pub use import_api::ImportApi;
