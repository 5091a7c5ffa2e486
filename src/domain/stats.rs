// ==========================================
// 航班数据分析系统 - 统计查询 DTO
// ==========================================
// 用途: StatsRepository 聚合查询返回值
// 口径: 取消航班不计入延误均值（cancelled = 0 过滤）
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// CarrierDelaySummary - 承运人延误汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierDelaySummary {
    pub carrier: String,         // 承运人代码
    pub flights: i64,            // 航班数
    pub avg_dep_delay: f64,      // 平均起飞延误（分钟）
    pub avg_arr_delay: f64,      // 平均到达延误（分钟）
    pub cancelled: i64,          // 取消航班数
    pub cancellation_rate: f64,  // 取消率（0-1）
}

// ==========================================
// MonthlyTrendPoint - 月度趋势点
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyTrendPoint {
    pub month: i32,              // 1-12
    pub flights: i64,
    pub avg_dep_delay: f64,
    pub avg_arr_delay: f64,
    pub cancelled: i64,
    pub cancellation_rate: f64,
}

// ==========================================
// RouteStat - 航线统计
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStat {
    pub origin: String,
    pub dest: String,
    pub flights: i64,
    pub avg_arr_delay: f64,
    pub avg_distance: f64, // 英里
}

// ==========================================
// AirportStat - 出发机场统计
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirportStat {
    pub airport: String,             // 机场代码
    pub city_name: Option<String>,   // 城市名
    pub departures: i64,             // 出港航班数
    pub avg_dep_delay: f64,          // 平均起飞延误
    pub avg_taxi_out: f64,           // 平均滑出时间（分钟）
}

// ==========================================
// CancellationBreakdown - 取消原因分布
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationBreakdown {
    pub code: String,  // A/B/C/D
    pub label: String, // 展示标签
    pub count: i64,
    pub share: f64, // 占取消航班比例（0-1）
}

// ==========================================
// DelayCauseTotals - 延误归因合计
// ==========================================
// 5 个归因列的分钟数合计（仅统计归因非全零的航班）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayCauseTotals {
    pub carrier_minutes: i64,
    pub weather_minutes: i64,
    pub nas_minutes: i64,
    pub security_minutes: i64,
    pub late_aircraft_minutes: i64,
}

impl DelayCauseTotals {
    pub fn total_minutes(&self) -> i64 {
        self.carrier_minutes
            + self.weather_minutes
            + self.nas_minutes
            + self.security_minutes
            + self.late_aircraft_minutes
    }
}

// ==========================================
// OnTimeSummary - 准点率汇总
// ==========================================
// 准点口径: arr_delay <= 阈值（默认 15 分钟，可配置）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnTimeSummary {
    pub total_flights: i64,
    pub on_time: i64,
    pub delayed: i64,
    pub cancelled: i64,
    pub diverted: i64,
    pub on_time_rate: f64,      // on_time / (total - cancelled - diverted)
    pub threshold_minutes: i32, // 判定阈值
}

// ==========================================
// WeekdayProfilePoint - 星期维度概况
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekdayProfilePoint {
    pub day_of_week: i32, // 1=周一 ... 7=周日
    pub flights: i64,
    pub avg_dep_delay: f64,
    pub avg_arr_delay: f64,
}
