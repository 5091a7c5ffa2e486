// ==========================================
// 航班数据分析系统 - 领域层
// ==========================================
// 职责: 实体与类型定义（不含业务逻辑/数据访问）
// ==========================================

pub mod flight;
pub mod stats;
pub mod types;

// 重导出核心类型
pub use flight::{
    CleanSummary, ConflictType, DqLevel, DqReport, DqSummary, DqViolation, FlightRecord,
    ImportBatch, ImportConflict, ImportResult, RawFlightRecord,
};
pub use stats::{
    AirportStat, CancellationBreakdown, CarrierDelaySummary, DelayCauseTotals, MonthlyTrendPoint,
    OnTimeSummary, RouteStat, WeekdayProfilePoint,
};
pub use types::{CancellationReason, DelayCause};
