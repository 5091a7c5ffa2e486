// ==========================================
// 航班数据分析系统 - 数据质量校验器
// ==========================================
// 职责: 必填校验(ERROR) / 范围校验(WARNING) / 一致性校验(INFO)
// 阈值: 由配置层注入（延误异常阈值、最大合理航距）
// ==========================================

use crate::domain::flight::{DqLevel, DqViolation, RawFlightRecord};
use crate::domain::types::CancellationReason;
use crate::importer::flight_importer_trait::DqValidator;

// ==========================================
// FlightDqValidator 实现
// ==========================================
pub struct FlightDqValidator {
    /// 延误异常阈值（分钟），超过视为可疑数据
    delay_anomaly_threshold_minutes: f64,
    /// 最大合理航距（英里），美国国内航线口径
    max_reasonable_distance_miles: f64,
}

impl FlightDqValidator {
    pub fn new(delay_anomaly_threshold_minutes: f64, max_reasonable_distance_miles: f64) -> Self {
        Self {
            delay_anomaly_threshold_minutes,
            max_reasonable_distance_miles,
        }
    }

    fn violation(
        record: &RawFlightRecord,
        level: DqLevel,
        field: &str,
        message: String,
    ) -> DqViolation {
        DqViolation {
            row_number: record.row_number,
            flight_key: record.flight_key(),
            level,
            field: field.to_string(),
            message,
        }
    }

    /// HHMM 时刻合法性: 0..=2359 且分钟位 < 60（2400 视为非法）
    fn is_valid_hhmm(value: i32) -> bool {
        (0..=2359).contains(&value) && value % 100 < 60
    }

    fn check_hhmm(
        record: &RawFlightRecord,
        field: &str,
        value: Option<i32>,
        out: &mut Vec<DqViolation>,
    ) {
        if let Some(v) = value {
            if !Self::is_valid_hhmm(v) {
                out.push(Self::violation(
                    record,
                    DqLevel::Warning,
                    field,
                    format!("时刻 {} 不是有效 HHMM 值", v),
                ));
            }
        }
    }

    fn check_delay(
        &self,
        record: &RawFlightRecord,
        field: &str,
        value: Option<f64>,
        out: &mut Vec<DqViolation>,
    ) {
        if let Some(v) = value {
            if v.abs() > self.delay_anomaly_threshold_minutes {
                out.push(Self::violation(
                    record,
                    DqLevel::Warning,
                    field,
                    format!(
                        "延误 {} 分钟超出异常阈值 {} 分钟",
                        v, self.delay_anomaly_threshold_minutes
                    ),
                ));
            }
        }
    }
}

impl DqValidator for FlightDqValidator {
    fn validate_required_fields(&self, record: &RawFlightRecord) -> Vec<DqViolation> {
        let mut violations = Vec::new();

        if record.fl_date.is_none() {
            violations.push(Self::violation(
                record,
                DqLevel::Error,
                "fl_date",
                "航班日期缺失".to_string(),
            ));
        }
        if record.op_unique_carrier.is_none() {
            violations.push(Self::violation(
                record,
                DqLevel::Error,
                "op_unique_carrier",
                "承运人代码缺失".to_string(),
            ));
        }
        if record.origin.is_none() {
            violations.push(Self::violation(
                record,
                DqLevel::Error,
                "origin",
                "出发机场代码缺失".to_string(),
            ));
        }
        if record.dest.is_none() {
            violations.push(Self::violation(
                record,
                DqLevel::Error,
                "dest",
                "到达机场代码缺失".to_string(),
            ));
        }

        violations
    }

    fn validate_ranges(&self, record: &RawFlightRecord) -> Vec<DqViolation> {
        let mut violations = Vec::new();

        // ===== 日期维度 =====
        if let Some(month) = record.month {
            if !(1..=12).contains(&month) {
                violations.push(Self::violation(
                    record,
                    DqLevel::Warning,
                    "month",
                    format!("月份 {} 超出范围 [1, 12]", month),
                ));
            }
        }
        if let Some(dow) = record.day_of_week {
            if !(1..=7).contains(&dow) {
                violations.push(Self::violation(
                    record,
                    DqLevel::Warning,
                    "day_of_week",
                    format!("星期 {} 超出范围 [1, 7]", dow),
                ));
            }
        }

        // ===== HHMM 时刻 =====
        Self::check_hhmm(record, "crs_dep_time", record.crs_dep_time, &mut violations);
        Self::check_hhmm(record, "crs_arr_time", record.crs_arr_time, &mut violations);

        // ===== 延误阈值 =====
        self.check_delay(record, "dep_delay", record.dep_delay, &mut violations);
        self.check_delay(record, "arr_delay", record.arr_delay, &mut violations);

        // ===== 航距 =====
        if let Some(distance) = record.distance {
            if distance <= 0.0 {
                violations.push(Self::violation(
                    record,
                    DqLevel::Warning,
                    "distance",
                    format!("航距 {} 必须为正数", distance),
                ));
            } else if distance > self.max_reasonable_distance_miles {
                violations.push(Self::violation(
                    record,
                    DqLevel::Warning,
                    "distance",
                    format!(
                        "航距 {} 英里超出合理上限 {} 英里",
                        distance, self.max_reasonable_distance_miles
                    ),
                ));
            }
        }

        violations
    }

    fn validate_cancellation_consistency(&self, record: &RawFlightRecord) -> Vec<DqViolation> {
        let mut violations = Vec::new();

        let cancelled = record.cancelled.unwrap_or(false);
        let code = record.cancellation_code.as_deref();

        match (cancelled, code) {
            // 已取消但无取消代码: 允许导入，代码保持 NULL
            (true, None) => {
                violations.push(Self::violation(
                    record,
                    DqLevel::Info,
                    "cancellation_code",
                    "航班已取消但取消代码缺失".to_string(),
                ));
            }
            // 已取消但代码无法识别
            (true, Some(c)) => {
                match CancellationReason::from_code(c) {
                    None => {
                        violations.push(Self::violation(
                            record,
                            DqLevel::Warning,
                            "cancellation_code",
                            format!("无法识别的取消代码 '{}'", c),
                        ));
                    }
                    Some(CancellationReason::NotCancelled) => {
                        violations.push(Self::violation(
                            record,
                            DqLevel::Warning,
                            "cancellation_code",
                            "航班已取消但取消代码为 'Not Cancelled'".to_string(),
                        ));
                    }
                    Some(_) => {}
                }
            }
            // 未取消: 清洗阶段已填 "Not Cancelled"，其他值视为不一致
            (false, Some(c)) => {
                if CancellationReason::from_code(c) != Some(CancellationReason::NotCancelled) {
                    violations.push(Self::violation(
                        record,
                        DqLevel::Warning,
                        "cancellation_code",
                        format!("航班未取消但取消代码为 '{}'", c),
                    ));
                }
            }
            (false, None) => {}
        }

        violations
    }
}
