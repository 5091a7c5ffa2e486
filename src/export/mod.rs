// ==========================================
// 航班数据分析系统 - 导出层
// ==========================================
// 职责: 图表数据序列导出（CSV/JSON）
// ==========================================

pub mod chart_export;

pub use chart_export::{build_chart_tables, export_dashboard_tables, ChartTable};
