// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成8个航班测试数据集CSV文件（BTS 原始导出格式）
// 输出: tests/fixtures/datasets/*.csv
// ==========================================

use csv::Writer;
use std::error::Error;
use std::fs::File;

// CSV 表头（BTS 原始列名）
const CSV_HEADER: &[&str] = &[
    "YEAR",
    "MONTH",
    "DAY_OF_MONTH",
    "DAY_OF_WEEK",
    "FL_DATE",
    "OP_UNIQUE_CARRIER",
    "OP_CARRIER_FL_NUM",
    "ORIGIN",
    "ORIGIN_CITY_NAME",
    "DEST",
    "DEST_CITY_NAME",
    "CRS_DEP_TIME",
    "DEP_TIME",
    "DEP_DELAY",
    "TAXI_OUT",
    "TAXI_IN",
    "CRS_ARR_TIME",
    "ARR_TIME",
    "ARR_DELAY",
    "CANCELLED",
    "CANCELLATION_CODE",
    "DIVERTED",
    "AIR_TIME",
    "DISTANCE",
    "CARRIER_DELAY",
    "WEATHER_DELAY",
    "NAS_DELAY",
    "SECURITY_DELAY",
    "LATE_AIRCRAFT_DELAY",
];

const CARRIERS: &[&str] = &["DL", "AA", "UA", "WN", "B6"];
const ROUTES: &[(&str, &str, &str, &str, f64)] = &[
    ("ATL", "Atlanta, GA", "JFK", "New York, NY", 760.0),
    ("DFW", "Dallas/Fort Worth, TX", "LAX", "Los Angeles, CA", 1235.0),
    ("ORD", "Chicago, IL", "DEN", "Denver, CO", 888.0),
    ("SEA", "Seattle, WA", "SFO", "San Francisco, CA", 679.0),
    ("MCO", "Orlando, FL", "EWR", "Newark, NJ", 937.0),
];

// 航班记录结构（全字符串，模拟 CSV 原始文本）
#[derive(Clone)]
struct FlightRow {
    year: String,
    month: String,
    day_of_month: String,
    day_of_week: String,
    fl_date: String,
    carrier: String,
    fl_num: String,
    origin: String,
    origin_city: String,
    dest: String,
    dest_city: String,
    crs_dep_time: String,
    dep_time: String,
    dep_delay: String,
    taxi_out: String,
    taxi_in: String,
    crs_arr_time: String,
    arr_time: String,
    arr_delay: String,
    cancelled: String,
    cancellation_code: String,
    diverted: String,
    air_time: String,
    distance: String,
    carrier_delay: String,
    weather_delay: String,
    nas_delay: String,
    security_delay: String,
    late_aircraft_delay: String,
}

impl FlightRow {
    fn to_row(&self) -> Vec<String> {
        vec![
            self.year.clone(),
            self.month.clone(),
            self.day_of_month.clone(),
            self.day_of_week.clone(),
            self.fl_date.clone(),
            self.carrier.clone(),
            self.fl_num.clone(),
            self.origin.clone(),
            self.origin_city.clone(),
            self.dest.clone(),
            self.dest_city.clone(),
            self.crs_dep_time.clone(),
            self.dep_time.clone(),
            self.dep_delay.clone(),
            self.taxi_out.clone(),
            self.taxi_in.clone(),
            self.crs_arr_time.clone(),
            self.arr_time.clone(),
            self.arr_delay.clone(),
            self.cancelled.clone(),
            self.cancellation_code.clone(),
            self.diverted.clone(),
            self.air_time.clone(),
            self.distance.clone(),
            self.carrier_delay.clone(),
            self.weather_delay.clone(),
            self.nas_delay.clone(),
            self.security_delay.clone(),
            self.late_aircraft_delay.clone(),
        ]
    }
}

// 生成正常航班记录
fn generate_normal_record(index: usize) -> FlightRow {
    let day = 1 + (index % 28);
    let day_of_week = 1 + (index % 7);
    let (origin, origin_city, dest, dest_city, distance) = ROUTES[index % ROUTES.len()];
    let crs_dep = 600 + (index % 16) * 100;
    let dep_delay = (index % 30) as f64 - 5.0;
    let arr_delay = dep_delay + (index % 7) as f64 - 3.0;

    FlightRow {
        year: "2024".to_string(),
        month: "3".to_string(),
        day_of_month: format!("{}", day),
        day_of_week: format!("{}", day_of_week),
        fl_date: format!("2024-03-{:02}", day),
        carrier: CARRIERS[index % CARRIERS.len()].to_string(),
        fl_num: format!("{}", 1000 + index),
        origin: origin.to_string(),
        origin_city: origin_city.to_string(),
        dest: dest.to_string(),
        dest_city: dest_city.to_string(),
        crs_dep_time: format!("{}", crs_dep),
        dep_time: format!("{}", crs_dep + 5),
        dep_delay: format!("{:.1}", dep_delay),
        taxi_out: format!("{:.1}", 10.0 + (index % 20) as f64),
        taxi_in: format!("{:.1}", 4.0 + (index % 10) as f64),
        crs_arr_time: format!("{}", (crs_dep + 300) % 2400),
        arr_time: format!("{}", (crs_dep + 310) % 2400),
        arr_delay: format!("{:.1}", arr_delay),
        cancelled: "0.0".to_string(),
        cancellation_code: "".to_string(),
        diverted: "0.0".to_string(),
        air_time: format!("{:.1}", 90.0 + (index % 60) as f64),
        distance: format!("{:.1}", distance),
        carrier_delay: "0.0".to_string(),
        weather_delay: "0.0".to_string(),
        nas_delay: "0.0".to_string(),
        security_delay: "0.0".to_string(),
        late_aircraft_delay: "0.0".to_string(),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("开始生成航班测试数据集...");

    // 1. 生成正常数据 (100条)
    generate_normal_data()?;

    // 2. 生成大数据集 (1000条)
    generate_large_dataset()?;

    // 3. 生成批次内重复数据
    generate_duplicate_within_batch()?;

    // 4. 生成缺失必填字段数据
    generate_missing_required_fields()?;

    // 5. 生成数据类型错误数据
    generate_invalid_data_types()?;

    // 6. 生成含取消/备降的数据
    generate_cancelled_and_diverted()?;

    // 7. 生成数值超出范围数据
    generate_out_of_range_values()?;

    // 8. 生成混合问题数据
    generate_mixed_issues()?;

    println!("✓ 所有测试数据集生成完成！");
    Ok(())
}

fn generate_normal_data() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/01_normal_data.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(CSV_HEADER)?;

    for i in 0..100 {
        let record = generate_normal_record(i);
        wtr.write_record(&record.to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 01_normal_data.csv (100条)");
    Ok(())
}

fn generate_large_dataset() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/02_large_dataset.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(CSV_HEADER)?;

    for i in 0..1000 {
        let record = generate_normal_record(i + 10000); // 航班号避开其他数据集
        wtr.write_record(&record.to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 02_large_dataset.csv (1000条)");
    Ok(())
}

fn generate_duplicate_within_batch() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/03_duplicate_within_batch.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(CSV_HEADER)?;

    // 生成15条记录，再追加5条自然键重复的记录
    for i in 0..15 {
        let record = generate_normal_record(i + 20000);
        wtr.write_record(&record.to_row())?;
    }

    for i in [0, 3, 6, 9, 12] {
        let mut record = generate_normal_record(i + 20000);
        record.arr_delay = "99.0".to_string(); // 同键不同值，验证保留首条
        wtr.write_record(&record.to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 03_duplicate_within_batch.csv (20条，包含5组重复)");
    Ok(())
}

fn generate_missing_required_fields() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/04_missing_required_fields.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(CSV_HEADER)?;

    // 缺失航班日期
    for i in 0..3 {
        let mut record = generate_normal_record(i + 30000);
        record.fl_date = "".to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 缺失承运人
    for i in 0..3 {
        let mut record = generate_normal_record(i + 30003);
        record.carrier = "".to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 缺失出发机场
    for i in 0..3 {
        let mut record = generate_normal_record(i + 30006);
        record.origin = "".to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 缺失到达机场
    for i in 0..3 {
        let mut record = generate_normal_record(i + 30009);
        record.dest = "".to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 缺失航班号（自然键不全，进冲突队列）
    for i in 0..3 {
        let mut record = generate_normal_record(i + 30012);
        record.fl_num = "".to_string();
        wtr.write_record(&record.to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 04_missing_required_fields.csv (15条，缺失必填字段)");
    Ok(())
}

fn generate_invalid_data_types() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/05_invalid_data_types.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(CSV_HEADER)?;

    // 距离非数值
    for i in 0..3 {
        let mut record = generate_normal_record(i + 40000);
        record.distance = "ABC".to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 延误非数值
    for i in 0..3 {
        let mut record = generate_normal_record(i + 40003);
        record.arr_delay = "NOT_A_NUMBER".to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 日期格式错误
    for i in 0..3 {
        let mut record = generate_normal_record(i + 40006);
        record.fl_date = "15/03/2024T00:00".to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 航班号非整数
    for i in 0..3 {
        let mut record = generate_normal_record(i + 40009);
        record.fl_num = "12.5".to_string();
        wtr.write_record(&record.to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 05_invalid_data_types.csv (12条，数据类型错误)");
    Ok(())
}

fn generate_cancelled_and_diverted() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/06_cancelled_and_diverted.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(CSV_HEADER)?;

    // 四种取消原因各3条（取消航班延误字段为空）
    for (offset, code) in ["A", "B", "C", "D"].iter().enumerate() {
        for i in 0..3 {
            let mut record = generate_normal_record(i + 50000 + offset * 3);
            record.cancelled = "1.0".to_string();
            record.cancellation_code = code.to_string();
            record.dep_time = "".to_string();
            record.dep_delay = "".to_string();
            record.arr_time = "".to_string();
            record.arr_delay = "".to_string();
            record.air_time = "".to_string();
            wtr.write_record(&record.to_row())?;
        }
    }

    // 取消但无取消代码（INFO 级校验）
    for i in 0..2 {
        let mut record = generate_normal_record(i + 50012);
        record.cancelled = "1.0".to_string();
        record.cancellation_code = "".to_string();
        record.arr_delay = "".to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 备降航班
    for i in 0..3 {
        let mut record = generate_normal_record(i + 50014);
        record.diverted = "1.0".to_string();
        record.arr_delay = "".to_string();
        wtr.write_record(&record.to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 06_cancelled_and_diverted.csv (17条，取消/备降)");
    Ok(())
}

fn generate_out_of_range_values() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/07_out_of_range_values.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(CSV_HEADER)?;

    // 延误超过异常阈值（默认48小时）
    for i in 0..3 {
        let mut record = generate_normal_record(i + 60000);
        record.arr_delay = "3000.0".to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 距离为负数
    for i in 0..2 {
        let mut record = generate_normal_record(i + 60003);
        record.distance = "-100.0".to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 距离超出合理上限
    for i in 0..2 {
        let mut record = generate_normal_record(i + 60005);
        record.distance = "9999.0".to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 计划起飞时刻非法（分钟位 >= 60 / 超过 2359）
    for i in 0..3 {
        let mut record = generate_normal_record(i + 60007);
        record.crs_dep_time = ["1675", "2560", "870"][i].to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 月份/星期越界
    for i in 0..2 {
        let mut record = generate_normal_record(i + 60010);
        record.month = "13".to_string();
        record.day_of_week = "8".to_string();
        wtr.write_record(&record.to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 07_out_of_range_values.csv (12条，数值超出范围)");
    Ok(())
}

fn generate_mixed_issues() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/08_mixed_issues.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(CSV_HEADER)?;

    // 正常数据 (10条)
    for i in 0..10 {
        let record = generate_normal_record(i + 70000);
        wtr.write_record(&record.to_row())?;
    }

    // 重复数据 (5条)
    for i in [0, 2, 4, 6, 8] {
        let record = generate_normal_record(i + 70000);
        wtr.write_record(&record.to_row())?;
    }

    // 缺失必填字段 (5条)
    for i in 0..5 {
        let mut record = generate_normal_record(i + 70010);
        record.dest = "".to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 数据类型错误 (5条)
    for i in 0..5 {
        let mut record = generate_normal_record(i + 70015);
        record.distance = "INVALID".to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 数值超出范围 (5条)
    for i in 0..5 {
        let mut record = generate_normal_record(i + 70020);
        record.dep_delay = "4000.0".to_string();
        wtr.write_record(&record.to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 08_mixed_issues.csv (30条，混合问题)");
    Ok(())
}
