// ==========================================
// 航班数据分析系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 航班准点数据的清洗 / 入库 / 描述性统计
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 性能观测（SQL trace / PerfGuard）
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 导出层 - 图表数据序列
pub mod export;

// 应用层 - 组件装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CancellationReason, DelayCause};

// 领域实体
pub use domain::{
    CleanSummary, ConflictType, DqLevel, DqReport, DqSummary, DqViolation, FlightRecord,
    ImportBatch, ImportConflict, ImportResult, RawFlightRecord,
};

// 统计 DTO
pub use domain::stats::{
    AirportStat, CancellationBreakdown, CarrierDelaySummary, DelayCauseTotals, MonthlyTrendPoint,
    OnTimeSummary, RouteStat, WeekdayProfilePoint,
};

// API
pub use api::{AnalyticsApi, DashboardSummary, ImportApi};

// 应用装配
pub use app::{get_default_db_path, AppState};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "航班数据分析系统";

// ==========================================
// 预编译检查
// ==========================================
