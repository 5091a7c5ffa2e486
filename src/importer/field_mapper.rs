// ==========================================
// 航班数据分析系统 - 字段映射器
// ==========================================
// 职责: 原始行记录 → RawFlightRecord（类型转换）
// 规则: 列名大小写不敏感，容忍历年导出的列名变体；
//       整数列容忍 "1430.0" 形式
// ==========================================

use crate::domain::flight::RawFlightRecord;
use crate::importer::error::ImportError;
use crate::importer::flight_importer_trait::FlightFieldMapper;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::error::Error;

/// BTS 历年导出的列名变体 → 规范列名
///
/// 旧版准点率数据集用 Reporting_Airline 系列命名，部分再导出工具
/// 会把前缀截掉，这里统一收敛到规范名。
const HEADER_ALIASES: &[(&str, &[&str])] = &[
    ("fl_date", &["flightdate", "flight_date"]),
    (
        "op_unique_carrier",
        &["op_carrier", "unique_carrier", "reporting_airline"],
    ),
    (
        "op_carrier_fl_num",
        &["fl_num", "flight_number_reporting_airline"],
    ),
    ("origin_city_name", &["origin_city"]),
    ("dest_city_name", &["dest_city"]),
    ("origin_state_nm", &["origin_state_name"]),
    ("dest_state_nm", &["dest_state_name"]),
];

// ==========================================
// FieldMapper 实现
// ==========================================
pub struct FieldMapper;

impl FieldMapper {
    pub fn new() -> Self {
        Self
    }

    /// 取字段值（解析器已将列名统一转小写；空白视为缺失）
    ///
    /// 规范列名取不到时回退查别名表。
    fn get_field(row: &HashMap<String, String>, field: &str) -> Option<String> {
        let value = row.get(field).or_else(|| {
            HEADER_ALIASES
                .iter()
                .find(|(canonical, _)| *canonical == field)
                .and_then(|(_, aliases)| aliases.iter().find_map(|alias| row.get(*alias)))
        });

        value
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// 解析浮点数
    fn parse_f64(
        row: &HashMap<String, String>,
        field: &str,
        row_number: usize,
    ) -> Result<Option<f64>, ImportError> {
        match Self::get_field(row, field) {
            None => Ok(None),
            Some(value) => value.parse::<f64>().map(Some).map_err(|e| {
                ImportError::TypeConversionError {
                    row: row_number,
                    field: field.to_string(),
                    message: format!("'{}' 不是有效浮点数: {}", value, e),
                }
            }),
        }
    }

    /// 解析整数（容忍 "1430.0" 这类带小数点的整值，pandas 导出常见）
    fn parse_i64(
        row: &HashMap<String, String>,
        field: &str,
        row_number: usize,
    ) -> Result<Option<i64>, ImportError> {
        match Self::get_field(row, field) {
            None => Ok(None),
            Some(value) => {
                if let Ok(v) = value.parse::<i64>() {
                    return Ok(Some(v));
                }
                // 回退: 按浮点解析后检查是否整值
                match value.parse::<f64>() {
                    Ok(f) if f.fract() == 0.0 => Ok(Some(f as i64)),
                    _ => Err(ImportError::TypeConversionError {
                        row: row_number,
                        field: field.to_string(),
                        message: format!("'{}' 不是有效整数", value),
                    }),
                }
            }
        }
    }

    fn parse_i32(
        row: &HashMap<String, String>,
        field: &str,
        row_number: usize,
    ) -> Result<Option<i32>, ImportError> {
        Ok(Self::parse_i64(row, field, row_number)?.map(|v| v as i32))
    }

    /// 解析日期（YYYY-MM-DD，回退 YYYYMMDD / MM/DD/YYYY）
    fn parse_date(
        row: &HashMap<String, String>,
        field: &str,
        row_number: usize,
    ) -> Result<Option<NaiveDate>, ImportError> {
        match Self::get_field(row, field) {
            None => Ok(None),
            Some(value) => {
                // 数据集导出有时附带时间部分（"2024-03-15 00:00:00"）
                let date_part = value.split_whitespace().next().unwrap_or(&value);
                for fmt in ["%Y-%m-%d", "%Y%m%d", "%m/%d/%Y"] {
                    if let Ok(d) = NaiveDate::parse_from_str(date_part, fmt) {
                        return Ok(Some(d));
                    }
                }
                Err(ImportError::DateFormatError {
                    row: row_number,
                    field: field.to_string(),
                    value,
                })
            }
        }
    }

    /// 解析 0/1 标志位（容忍 "1.0"/"true"）
    fn parse_bit(
        row: &HashMap<String, String>,
        field: &str,
        row_number: usize,
    ) -> Result<Option<bool>, ImportError> {
        match Self::get_field(row, field) {
            None => Ok(None),
            Some(value) => {
                let lower = value.trim().to_lowercase();
                match lower.as_str() {
                    "1" | "1.0" | "true" => Ok(Some(true)),
                    "0" | "0.0" | "false" => Ok(Some(false)),
                    _ => Err(ImportError::TypeConversionError {
                        row: row_number,
                        field: field.to_string(),
                        message: format!("'{}' 不是有效标志位（期望 0/1）", value),
                    }),
                }
            }
        }
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightFieldMapper for FieldMapper {
    fn map_to_raw_flight(
        &self,
        row: HashMap<String, String>,
        row_number: usize,
    ) -> Result<RawFlightRecord, Box<dyn Error>> {
        let record = RawFlightRecord {
            // 日期维度
            year: Self::parse_i32(&row, "year", row_number)?,
            month: Self::parse_i32(&row, "month", row_number)?,
            day_of_month: Self::parse_i32(&row, "day_of_month", row_number)?,
            day_of_week: Self::parse_i32(&row, "day_of_week", row_number)?,
            fl_date: Self::parse_date(&row, "fl_date", row_number)?,

            // 承运与航线
            op_unique_carrier: Self::get_field(&row, "op_unique_carrier"),
            op_carrier_fl_num: Self::parse_i64(&row, "op_carrier_fl_num", row_number)?,
            origin: Self::get_field(&row, "origin"),
            origin_city_name: Self::get_field(&row, "origin_city_name"),
            origin_state_nm: Self::get_field(&row, "origin_state_nm"),
            dest: Self::get_field(&row, "dest"),
            dest_city_name: Self::get_field(&row, "dest_city_name"),
            dest_state_nm: Self::get_field(&row, "dest_state_nm"),

            // 时刻
            crs_dep_time: Self::parse_i32(&row, "crs_dep_time", row_number)?,
            dep_time: Self::parse_f64(&row, "dep_time", row_number)?,
            dep_delay: Self::parse_f64(&row, "dep_delay", row_number)?,
            taxi_out: Self::parse_f64(&row, "taxi_out", row_number)?,
            wheels_off: Self::parse_f64(&row, "wheels_off", row_number)?,
            wheels_on: Self::parse_f64(&row, "wheels_on", row_number)?,
            taxi_in: Self::parse_f64(&row, "taxi_in", row_number)?,
            crs_arr_time: Self::parse_i32(&row, "crs_arr_time", row_number)?,
            arr_time: Self::parse_f64(&row, "arr_time", row_number)?,
            arr_delay: Self::parse_f64(&row, "arr_delay", row_number)?,

            // 取消/备降
            cancelled: Self::parse_bit(&row, "cancelled", row_number)?,
            cancellation_code: Self::get_field(&row, "cancellation_code"),
            diverted: Self::parse_bit(&row, "diverted", row_number)?,

            // 航程
            crs_elapsed_time: Self::parse_f64(&row, "crs_elapsed_time", row_number)?,
            actual_elapsed_time: Self::parse_f64(&row, "actual_elapsed_time", row_number)?,
            air_time: Self::parse_f64(&row, "air_time", row_number)?,
            distance: Self::parse_f64(&row, "distance", row_number)?,

            // 延误归因
            carrier_delay: Self::parse_i32(&row, "carrier_delay", row_number)?,
            weather_delay: Self::parse_i32(&row, "weather_delay", row_number)?,
            nas_delay: Self::parse_i32(&row, "nas_delay", row_number)?,
            security_delay: Self::parse_i32(&row, "security_delay", row_number)?,
            late_aircraft_delay: Self::parse_i32(&row, "late_aircraft_delay", row_number)?,

            row_number,
        };

        Ok(record)
    }
}
