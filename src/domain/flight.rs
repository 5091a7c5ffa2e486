// ==========================================
// 航班数据分析系统 - 航班领域模型
// ==========================================
// 依据: flight_data_2024 数据字典（35 列）
// 依据: sql/01_create_tables.sql flight 表
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// FlightRecord - 航班主数据
// ==========================================
// 用途: 导入层写入,统计层只读
// 对齐: flight 表（35 数据列 + 审计列）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightRecord {
    // ===== 日期维度 =====
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub day_of_month: Option<i32>,
    pub day_of_week: Option<i32>, // 1=周一 ... 7=周日
    pub fl_date: NaiveDate,       // 航班日期（必填）

    // ===== 承运与航线 =====
    pub op_unique_carrier: String,        // 承运人代码（必填）
    pub op_carrier_fl_num: Option<i64>,   // 航班号（可空整数）
    pub origin: String,                   // 出发机场代码（必填）
    pub origin_city_name: Option<String>,
    pub origin_state_nm: Option<String>,
    pub dest: String,                     // 到达机场代码（必填）
    pub dest_city_name: Option<String>,
    pub dest_state_nm: Option<String>,

    // ===== 时刻（HHMM 整数 / 实际值浮点）=====
    pub crs_dep_time: Option<i32>, // 计划起飞时刻
    pub dep_time: Option<f64>,     // 实际起飞时刻
    pub dep_delay: Option<f64>,    // 起飞延误（分钟）
    pub taxi_out: Option<f64>,
    pub wheels_off: Option<f64>,
    pub wheels_on: Option<f64>,
    pub taxi_in: Option<f64>,
    pub crs_arr_time: Option<i32>, // 计划到达时刻
    pub arr_time: Option<f64>,     // 实际到达时刻
    pub arr_delay: Option<f64>,    // 到达延误（分钟）

    // ===== 取消/备降 =====
    pub cancelled: bool,
    pub cancellation_code: Option<String>, // A/B/C/D 或 "Not Cancelled"
    pub diverted: bool,

    // ===== 航程 =====
    pub crs_elapsed_time: Option<f64>,
    pub actual_elapsed_time: Option<f64>,
    pub air_time: Option<f64>,
    pub distance: Option<f64>, // 英里

    // ===== 延误归因（分钟）=====
    pub carrier_delay: Option<i32>,
    pub weather_delay: Option<i32>,
    pub nas_delay: Option<i32>,
    pub security_delay: Option<i32>,
    pub late_aircraft_delay: Option<i32>,

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// RawFlightRecord - 导入中间结构体
// ==========================================
// 用途: 导入管道中间产物（文件解析 → 字段映射 → 此结构）
// 生命周期: 仅在清洗/导入流程内
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFlightRecord {
    // 源字段（已类型转换，全部可空）
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub day_of_month: Option<i32>,
    pub day_of_week: Option<i32>,
    pub fl_date: Option<NaiveDate>,
    pub op_unique_carrier: Option<String>,
    pub op_carrier_fl_num: Option<i64>,
    pub origin: Option<String>,
    pub origin_city_name: Option<String>,
    pub origin_state_nm: Option<String>,
    pub dest: Option<String>,
    pub dest_city_name: Option<String>,
    pub dest_state_nm: Option<String>,
    pub crs_dep_time: Option<i32>,
    pub dep_time: Option<f64>,
    pub dep_delay: Option<f64>,
    pub taxi_out: Option<f64>,
    pub wheels_off: Option<f64>,
    pub wheels_on: Option<f64>,
    pub taxi_in: Option<f64>,
    pub crs_arr_time: Option<i32>,
    pub arr_time: Option<f64>,
    pub arr_delay: Option<f64>,
    pub cancelled: Option<bool>,
    pub cancellation_code: Option<String>,
    pub diverted: Option<bool>,
    pub crs_elapsed_time: Option<f64>,
    pub actual_elapsed_time: Option<f64>,
    pub air_time: Option<f64>,
    pub distance: Option<f64>,
    pub carrier_delay: Option<i32>,
    pub weather_delay: Option<i32>,
    pub nas_delay: Option<i32>,
    pub security_delay: Option<i32>,
    pub late_aircraft_delay: Option<i32>,

    // 元信息
    pub row_number: usize, // 原始文件行号（用于 DQ 报告）
}

impl RawFlightRecord {
    /// 航班自然键: fl_date + 承运人 + 航班号 + 出发机场 + 计划起飞时刻
    ///
    /// # 返回
    /// - Some(key): 键字段齐全
    /// - None: 缺少任一键字段（进入 DQ 校验而非冲突检测）
    pub fn flight_key(&self) -> Option<String> {
        let date = self.fl_date?;
        let carrier = self.op_unique_carrier.as_deref()?;
        let fl_num = self.op_carrier_fl_num?;
        let origin = self.origin.as_deref()?;
        let crs_dep = self.crs_dep_time?;
        Some(format!("{}|{}|{}|{}|{:04}", date, carrier, fl_num, origin, crs_dep))
    }
}

// ==========================================
// ImportBatch - 导入批次
// ==========================================
// 用途: 记录导入批次元信息
// 对齐: import_batch 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,                   // 批次 ID（UUID）
    pub file_name: Option<String>,          // 源文件名
    pub file_path: Option<String>,          // 源文件路径
    pub total_rows: i32,                    // 总行数
    pub success_rows: i32,                  // 成功导入行数
    pub blocked_rows: i32,                  // 阻断行数（DQ ERROR）
    pub warning_rows: i32,                  // 警告行数（DQ WARNING）
    pub conflict_rows: i32,                 // 冲突行数
    pub chunk_count: i32,                   // 提交的事务块数
    pub imported_at: Option<DateTime<Utc>>, // 导入时间
    pub imported_by: Option<String>,        // 导入人
    pub elapsed_ms: Option<i32>,            // 导入耗时（毫秒）
    pub dq_report_json: Option<String>,     // DQ 报告 JSON
}

// ==========================================
// ImportConflict - 导入冲突记录
// ==========================================
// 用途: 记录重复航班/类型错误等，进入人工队列
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConflict {
    pub conflict_id: String,         // 冲突记录 ID（UUID）
    pub batch_id: String,            // 关联批次 ID
    pub row_number: usize,           // 原始文件行号
    pub flight_key: Option<String>,  // 航班自然键（如果可解析）
    pub conflict_type: ConflictType, // 冲突类型
    pub raw_data: String,            // 原始行数据（JSON）
    pub reason: String,              // 冲突原因
    pub resolved: bool,              // 是否已处理
    pub created_at: DateTime<Utc>,   // 创建时间
}

// ==========================================
// ConflictType - 冲突类型枚举
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictType {
    KeyMissing,        // 自然键字段缺失
    DuplicateFlight,   // 重复航班（同批次或跨批次）
    DataTypeError,     // 数据类型错误
}

// ==========================================
// DqViolation - 数据质量违规记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DqViolation {
    pub row_number: usize,          // 原始文件行号
    pub flight_key: Option<String>, // 航班自然键（如果可解析）
    pub level: DqLevel,             // 违规级别
    pub field: String,              // 违规字段
    pub message: String,            // 违规描述
}

// ==========================================
// DqLevel - 数据质量级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DqLevel {
    Error,    // 错误（阻断该行导入）
    Warning,  // 警告（允许导入）
    Info,     // 提示（仅记录）
    Conflict, // 冲突（进入冲突队列）
}

// ==========================================
// DqReport - 数据质量报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DqReport {
    pub batch_id: String,             // 批次 ID
    pub summary: DqSummary,           // 汇总统计
    pub violations: Vec<DqViolation>, // 违规明细
}

// ==========================================
// DqSummary - 数据质量汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DqSummary {
    pub total_rows: usize, // 总行数
    pub success: usize,    // 成功导入
    pub blocked: usize,    // 阻断（ERROR）
    pub warning: usize,    // 警告（WARNING）
    pub conflict: usize,   // 冲突（CONFLICT）
}

// ==========================================
// ImportResult - 导入结果
// ==========================================
// 用途: 导入接口返回值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
    pub batch: ImportBatch,                // 批次信息
    pub summary: DqSummary,                // 汇总统计
    pub violations: Vec<DqViolation>,      // 违规明细
    pub elapsed_time: std::time::Duration, // 导入耗时
}

// ==========================================
// CleanSummary - 清洗阶段汇总
// ==========================================
// 用途: csv_cleaner 返回值（清洗 CSV → 清洗后 CSV）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanSummary {
    pub total_rows: usize,       // 输入行数（不含表头）
    pub written_rows: usize,     // 写出行数
    pub dropped_rows: usize,     // 丢弃行数（日期不可解析等）
    pub zero_filled_cells: usize, // 以 0 填充的数值单元格数
    pub normalized_codes: usize, // 填充 "Not Cancelled" 的行数
}
