// ==========================================
// 航班数据分析系统 - 重复航班检测器
// ==========================================
// 职责: 同批次 / 跨批次重复航班检测（按自然键）
// 自然键: fl_date|承运人|航班号|出发机场|计划起飞时刻
// ==========================================

use crate::domain::flight::RawFlightRecord;
use crate::importer::flight_importer_trait::ConflictHandler;
use std::collections::HashSet;

// ==========================================
// FlightConflictHandler 实现
// ==========================================
pub struct FlightConflictHandler;

impl FlightConflictHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FlightConflictHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ConflictHandler for FlightConflictHandler {
    fn detect_duplicates(&self, records: &[RawFlightRecord]) -> Vec<(usize, String)> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut duplicates = Vec::new();

        for record in records {
            // 键字段不全的记录由 DQ 校验处理，不参与重复检测
            let Some(key) = record.flight_key() else {
                continue;
            };

            // 保留首次出现的行，后续重复行进入冲突队列
            if !seen.insert(key.clone()) {
                duplicates.push((record.row_number, key));
            }
        }

        duplicates
    }

    fn detect_cross_batch_duplicates(
        &self,
        records: &[RawFlightRecord],
        existing_keys: &[String],
    ) -> Vec<(usize, String)> {
        let existing: HashSet<&str> = existing_keys.iter().map(|k| k.as_str()).collect();
        let mut duplicates = Vec::new();

        for record in records {
            let Some(key) = record.flight_key() else {
                continue;
            };

            if existing.contains(key.as_str()) {
                duplicates.push((record.row_number, key));
            }
        }

        duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(row_number: usize, fl_num: i64) -> RawFlightRecord {
        RawFlightRecord {
            year: Some(2024),
            month: Some(3),
            day_of_month: Some(15),
            day_of_week: Some(5),
            fl_date: NaiveDate::from_ymd_opt(2024, 3, 15),
            op_unique_carrier: Some("DL".to_string()),
            op_carrier_fl_num: Some(fl_num),
            origin: Some("ATL".to_string()),
            origin_city_name: None,
            origin_state_nm: None,
            dest: Some("JFK".to_string()),
            dest_city_name: None,
            dest_state_nm: None,
            crs_dep_time: Some(630),
            dep_time: None,
            dep_delay: None,
            taxi_out: None,
            wheels_off: None,
            wheels_on: None,
            taxi_in: None,
            crs_arr_time: Some(900),
            arr_time: None,
            arr_delay: None,
            cancelled: Some(false),
            cancellation_code: None,
            diverted: Some(false),
            crs_elapsed_time: None,
            actual_elapsed_time: None,
            air_time: None,
            distance: Some(760.0),
            carrier_delay: None,
            weather_delay: None,
            nas_delay: None,
            security_delay: None,
            late_aircraft_delay: None,
            row_number,
        }
    }

    #[test]
    fn test_detect_duplicates_keeps_first() {
        let handler = FlightConflictHandler::new();
        let records = vec![record(1, 100), record(2, 200), record(3, 100)];

        let duplicates = handler.detect_duplicates(&records);
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].0, 3);
    }

    #[test]
    fn test_detect_duplicates_skips_missing_key() {
        let handler = FlightConflictHandler::new();
        let mut r1 = record(1, 100);
        r1.op_carrier_fl_num = None;
        let mut r2 = record(2, 100);
        r2.op_carrier_fl_num = None;

        // 键不全的记录不算重复
        assert!(handler.detect_duplicates(&[r1, r2]).is_empty());
    }

    #[test]
    fn test_detect_cross_batch_duplicates() {
        let handler = FlightConflictHandler::new();
        let records = vec![record(1, 100), record(2, 200)];
        let existing = vec![record(0, 200).flight_key().unwrap()];

        let duplicates = handler.detect_cross_batch_duplicates(&records, &existing);
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].0, 2);
    }
}
