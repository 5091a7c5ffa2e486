// ==========================================
// 航班数据分析系统 - 数据清洗器
// ==========================================
// 职责: 文本标准化 + 数据集清洗规则
// 规则来源: flight_data_2024 清洗口径
//   1. cancelled=0 且取消代码缺失 → "Not Cancelled"
//   2. 10 个可空数值列缺失 → 0
//   3. cancelled/diverted 缺失 → false
//   4. 机场/承运人代码统一大写
// ==========================================

use crate::domain::flight::RawFlightRecord;
use crate::domain::types::CancellationReason;
use crate::importer::flight_importer_trait::DataCleaner;

// ==========================================
// FlightDataCleaner 实现
// ==========================================
pub struct FlightDataCleaner;

impl FlightDataCleaner {
    pub fn new() -> Self {
        Self
    }

    /// 对 Option<f64> 缺失填 0，返回是否发生填充
    fn zero_fill_f64(value: &mut Option<f64>) -> bool {
        if value.is_none() {
            *value = Some(0.0);
            true
        } else {
            false
        }
    }

    /// 对 Option<i32> 缺失填 0，返回是否发生填充
    fn zero_fill_i32(value: &mut Option<i32>) -> bool {
        if value.is_none() {
            *value = Some(0);
            true
        } else {
            false
        }
    }
}

impl Default for FlightDataCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl DataCleaner for FlightDataCleaner {
    fn clean_text(&self, value: &str, uppercase: bool) -> String {
        let trimmed = value.trim();
        if uppercase {
            trimmed.to_uppercase()
        } else {
            trimmed.to_string()
        }
    }

    fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn clean_record(&self, record: &mut RawFlightRecord) -> (usize, bool) {
        let mut zero_filled = 0usize;
        let mut normalized = false;

        // ===== 文本标准化 =====
        record.op_unique_carrier = record
            .op_unique_carrier
            .take()
            .map(|v| self.clean_text(&v, true))
            .filter(|s| !s.is_empty());
        record.origin = record
            .origin
            .take()
            .map(|v| self.clean_text(&v, true))
            .filter(|s| !s.is_empty());
        record.dest = record
            .dest
            .take()
            .map(|v| self.clean_text(&v, true))
            .filter(|s| !s.is_empty());
        record.origin_city_name = self.normalize_null(record.origin_city_name.take());
        record.origin_state_nm = self.normalize_null(record.origin_state_nm.take());
        record.dest_city_name = self.normalize_null(record.dest_city_name.take());
        record.dest_state_nm = self.normalize_null(record.dest_state_nm.take());
        record.cancellation_code = self
            .normalize_null(record.cancellation_code.take())
            .map(|v| self.clean_text(&v, true));

        // ===== 标志位缺失 → false =====
        if record.cancelled.is_none() {
            record.cancelled = Some(false);
        }
        if record.diverted.is_none() {
            record.diverted = Some(false);
        }

        // ===== 未取消航班填充取消代码 =====
        if record.cancelled == Some(false) && record.cancellation_code.is_none() {
            record.cancellation_code =
                Some(CancellationReason::NotCancelled.as_code().to_string());
            normalized = true;
        }

        // ===== 10 个可空数值列缺失 → 0 =====
        if Self::zero_fill_f64(&mut record.dep_delay) {
            zero_filled += 1;
        }
        if Self::zero_fill_f64(&mut record.arr_delay) {
            zero_filled += 1;
        }
        if Self::zero_fill_f64(&mut record.air_time) {
            zero_filled += 1;
        }
        if Self::zero_fill_f64(&mut record.taxi_out) {
            zero_filled += 1;
        }
        if Self::zero_fill_f64(&mut record.taxi_in) {
            zero_filled += 1;
        }
        if Self::zero_fill_i32(&mut record.carrier_delay) {
            zero_filled += 1;
        }
        if Self::zero_fill_i32(&mut record.weather_delay) {
            zero_filled += 1;
        }
        if Self::zero_fill_i32(&mut record.nas_delay) {
            zero_filled += 1;
        }
        if Self::zero_fill_i32(&mut record.security_delay) {
            zero_filled += 1;
        }
        if Self::zero_fill_i32(&mut record.late_aircraft_delay) {
            zero_filled += 1;
        }

        (zero_filled, normalized)
    }
}
