// ==========================================
// 测试数据构建器
// ==========================================
// 职责: 链式构造 FlightRecord / RawFlightRecord 测试数据
// ==========================================

use chrono::{NaiveDate, Utc};
use flight_analytics::domain::flight::{FlightRecord, RawFlightRecord};

/// 航班测试数据构建器
pub struct FlightBuilder {
    fl_date: NaiveDate,
    carrier: String,
    fl_num: i64,
    origin: String,
    dest: String,
    crs_dep_time: i32,
    dep_delay: f64,
    arr_delay: f64,
    cancelled: bool,
    cancellation_code: Option<String>,
    diverted: bool,
    distance: f64,
    month: Option<i32>,
    day_of_week: Option<i32>,
    carrier_delay: i32,
    weather_delay: i32,
    row_number: usize,
}

impl FlightBuilder {
    pub fn new() -> Self {
        Self {
            fl_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            carrier: "DL".to_string(),
            fl_num: 1000,
            origin: "ATL".to_string(),
            dest: "JFK".to_string(),
            crs_dep_time: 800,
            dep_delay: 0.0,
            arr_delay: 0.0,
            cancelled: false,
            cancellation_code: Some("Not Cancelled".to_string()),
            diverted: false,
            distance: 760.0,
            month: Some(3),
            day_of_week: Some(5),
            carrier_delay: 0,
            weather_delay: 0,
            row_number: 2,
        }
    }

    pub fn date(mut self, year: i32, month: u32, day: u32) -> Self {
        self.fl_date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        self.month = Some(month as i32);
        self
    }

    pub fn carrier(mut self, carrier: &str) -> Self {
        self.carrier = carrier.to_string();
        self
    }

    pub fn fl_num(mut self, fl_num: i64) -> Self {
        self.fl_num = fl_num;
        self
    }

    pub fn route(mut self, origin: &str, dest: &str) -> Self {
        self.origin = origin.to_string();
        self.dest = dest.to_string();
        self
    }

    pub fn crs_dep_time(mut self, hhmm: i32) -> Self {
        self.crs_dep_time = hhmm;
        self
    }

    pub fn delays(mut self, dep: f64, arr: f64) -> Self {
        self.dep_delay = dep;
        self.arr_delay = arr;
        self
    }

    pub fn cancelled(mut self, code: &str) -> Self {
        self.cancelled = true;
        self.cancellation_code = Some(code.to_string());
        self
    }

    pub fn diverted(mut self) -> Self {
        self.diverted = true;
        self
    }

    pub fn distance(mut self, miles: f64) -> Self {
        self.distance = miles;
        self
    }

    pub fn day_of_week(mut self, dow: i32) -> Self {
        self.day_of_week = Some(dow);
        self
    }

    pub fn delay_causes(mut self, carrier: i32, weather: i32) -> Self {
        self.carrier_delay = carrier;
        self.weather_delay = weather;
        self
    }

    pub fn row_number(mut self, row_number: usize) -> Self {
        self.row_number = row_number;
        self
    }

    /// 构造入库用 FlightRecord
    pub fn build(self) -> FlightRecord {
        let now = Utc::now();
        FlightRecord {
            year: Some(self.fl_date.format("%Y").to_string().parse().unwrap()),
            month: self.month,
            day_of_month: None,
            day_of_week: self.day_of_week,
            fl_date: self.fl_date,
            op_unique_carrier: self.carrier,
            op_carrier_fl_num: Some(self.fl_num),
            origin: self.origin,
            origin_city_name: None,
            origin_state_nm: None,
            dest: self.dest,
            dest_city_name: None,
            dest_state_nm: None,
            crs_dep_time: Some(self.crs_dep_time),
            dep_time: None,
            dep_delay: Some(self.dep_delay),
            taxi_out: Some(12.0),
            wheels_off: None,
            wheels_on: None,
            taxi_in: Some(6.0),
            crs_arr_time: None,
            arr_time: None,
            arr_delay: Some(self.arr_delay),
            cancelled: self.cancelled,
            cancellation_code: self.cancellation_code,
            diverted: self.diverted,
            crs_elapsed_time: None,
            actual_elapsed_time: None,
            air_time: Some(110.0),
            distance: Some(self.distance),
            carrier_delay: Some(self.carrier_delay),
            weather_delay: Some(self.weather_delay),
            nas_delay: Some(0),
            security_delay: Some(0),
            late_aircraft_delay: Some(0),
            created_at: now,
            updated_at: now,
        }
    }

    /// 构造导入中间态 RawFlightRecord
    pub fn build_raw(self) -> RawFlightRecord {
        let row_number = self.row_number;
        let record = self.build();
        RawFlightRecord {
            year: record.year,
            month: record.month,
            day_of_month: record.day_of_month,
            day_of_week: record.day_of_week,
            fl_date: Some(record.fl_date),
            op_unique_carrier: Some(record.op_unique_carrier),
            op_carrier_fl_num: record.op_carrier_fl_num,
            origin: Some(record.origin),
            origin_city_name: record.origin_city_name,
            origin_state_nm: record.origin_state_nm,
            dest: Some(record.dest),
            dest_city_name: record.dest_city_name,
            dest_state_nm: record.dest_state_nm,
            crs_dep_time: record.crs_dep_time,
            dep_time: record.dep_time,
            dep_delay: record.dep_delay,
            taxi_out: record.taxi_out,
            wheels_off: record.wheels_off,
            wheels_on: record.wheels_on,
            taxi_in: record.taxi_in,
            crs_arr_time: record.crs_arr_time,
            arr_time: record.arr_time,
            arr_delay: record.arr_delay,
            cancelled: Some(record.cancelled),
            cancellation_code: record.cancellation_code,
            diverted: Some(record.diverted),
            crs_elapsed_time: record.crs_elapsed_time,
            actual_elapsed_time: record.actual_elapsed_time,
            air_time: record.air_time,
            distance: record.distance,
            carrier_delay: record.carrier_delay,
            weather_delay: record.weather_delay,
            nas_delay: record.nas_delay,
            security_delay: record.security_delay,
            late_aircraft_delay: record.late_aircraft_delay,
            row_number,
        }
    }
}

impl Default for FlightBuilder {
    fn default() -> Self {
        Self::new()
    }
}
