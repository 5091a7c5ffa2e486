// ==========================================
// 航班数据分析系统 - CSV 清洗器（阶段一）
// ==========================================
// 职责: 原始 CSV → 清洗后 CSV（标准 35 列顺序）
// 规则: 与 DataCleaner 同口径；日期不可解析的行丢弃
// 用途: 独立的 clean 命令，产物可直接进入 load 阶段
// ==========================================

use crate::domain::flight::{CleanSummary, RawFlightRecord};
use crate::importer::data_cleaner::FlightDataCleaner;
use crate::importer::error::ImportError;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::flight_importer_trait::{DataCleaner, FlightFieldMapper};
use csv::WriterBuilder;
use std::path::Path;
use tracing::{info, warn};

/// 清洗后 CSV 的标准列顺序（35 列）
pub const CLEANED_COLUMNS: [&str; 35] = [
    "year",
    "month",
    "day_of_month",
    "day_of_week",
    "fl_date",
    "op_unique_carrier",
    "op_carrier_fl_num",
    "origin",
    "origin_city_name",
    "origin_state_nm",
    "dest",
    "dest_city_name",
    "dest_state_nm",
    "crs_dep_time",
    "dep_time",
    "dep_delay",
    "taxi_out",
    "wheels_off",
    "wheels_on",
    "taxi_in",
    "crs_arr_time",
    "arr_time",
    "arr_delay",
    "cancelled",
    "cancellation_code",
    "diverted",
    "crs_elapsed_time",
    "actual_elapsed_time",
    "air_time",
    "distance",
    "carrier_delay",
    "weather_delay",
    "nas_delay",
    "security_delay",
    "late_aircraft_delay",
];

// ==========================================
// CsvCleaner 实现
// ==========================================
pub struct CsvCleaner {
    mapper: FieldMapper,
    cleaner: FlightDataCleaner,
}

impl CsvCleaner {
    pub fn new() -> Self {
        Self {
            mapper: FieldMapper::new(),
            cleaner: FlightDataCleaner::new(),
        }
    }

    /// 清洗文件: input → output（CSV，标准列顺序）
    ///
    /// # 返回
    /// - CleanSummary: 行数 / 丢弃数 / 填 0 单元格数 / 填充取消代码数
    pub fn clean_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<CleanSummary, ImportError> {
        let input = input.as_ref();
        let output = output.as_ref();

        info!(input = %input.display(), "开始清洗航班 CSV");

        // 阶段 0: 文件解析
        let parser = UniversalFileParser;
        let rows = parser
            .parse(input)
            .map_err(|e| ImportError::FileReadError(e.to_string()))?;
        let total_rows = rows.len();

        // 阶段 1+2: 字段映射 + 清洗
        let mut cleaned_records: Vec<RawFlightRecord> = Vec::with_capacity(total_rows);
        let mut dropped_rows = 0usize;
        let mut zero_filled_cells = 0usize;
        let mut normalized_codes = 0usize;

        for (idx, row) in rows.into_iter().enumerate() {
            let row_number = idx + 2; // 行号含表头

            let mut record = match self.mapper.map_to_raw_flight(row, row_number) {
                Ok(r) => r,
                Err(e) => {
                    warn!(row = row_number, error = %e, "清洗阶段丢弃行（类型转换失败）");
                    dropped_rows += 1;
                    continue;
                }
            };

            // 日期不可解析或缺失的行无法参与任何统计，直接丢弃
            if record.fl_date.is_none() {
                warn!(row = row_number, "清洗阶段丢弃行（航班日期缺失）");
                dropped_rows += 1;
                continue;
            }

            let (zero_filled, normalized) = self.cleaner.clean_record(&mut record);
            zero_filled_cells += zero_filled;
            if normalized {
                normalized_codes += 1;
            }

            cleaned_records.push(record);
        }

        // 写出清洗后 CSV
        let written_rows = self.write_cleaned_csv(output, &cleaned_records)?;

        let summary = CleanSummary {
            total_rows,
            written_rows,
            dropped_rows,
            zero_filled_cells,
            normalized_codes,
        };

        info!(
            total = summary.total_rows,
            written = summary.written_rows,
            dropped = summary.dropped_rows,
            zero_filled = summary.zero_filled_cells,
            "清洗完成"
        );

        Ok(summary)
    }

    fn write_cleaned_csv(
        &self,
        output: &Path,
        records: &[RawFlightRecord],
    ) -> Result<usize, ImportError> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(output)
            .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;

        writer
            .write_record(CLEANED_COLUMNS)
            .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;

        for record in records {
            let row = [
                fmt_i32(record.year),
                fmt_i32(record.month),
                fmt_i32(record.day_of_month),
                fmt_i32(record.day_of_week),
                record
                    .fl_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                record.op_unique_carrier.clone().unwrap_or_default(),
                record
                    .op_carrier_fl_num
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
                record.origin.clone().unwrap_or_default(),
                record.origin_city_name.clone().unwrap_or_default(),
                record.origin_state_nm.clone().unwrap_or_default(),
                record.dest.clone().unwrap_or_default(),
                record.dest_city_name.clone().unwrap_or_default(),
                record.dest_state_nm.clone().unwrap_or_default(),
                fmt_i32(record.crs_dep_time),
                fmt_f64(record.dep_time),
                fmt_f64(record.dep_delay),
                fmt_f64(record.taxi_out),
                fmt_f64(record.wheels_off),
                fmt_f64(record.wheels_on),
                fmt_f64(record.taxi_in),
                fmt_i32(record.crs_arr_time),
                fmt_f64(record.arr_time),
                fmt_f64(record.arr_delay),
                fmt_bit(record.cancelled),
                record.cancellation_code.clone().unwrap_or_default(),
                fmt_bit(record.diverted),
                fmt_f64(record.crs_elapsed_time),
                fmt_f64(record.actual_elapsed_time),
                fmt_f64(record.air_time),
                fmt_f64(record.distance),
                fmt_i32(record.carrier_delay),
                fmt_i32(record.weather_delay),
                fmt_i32(record.nas_delay),
                fmt_i32(record.security_delay),
                fmt_i32(record.late_aircraft_delay),
            ];
            writer
                .write_record(&row)
                .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;
        }

        writer
            .flush()
            .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;

        Ok(records.len())
    }
}

impl Default for CsvCleaner {
    fn default() -> Self {
        Self::new()
    }
}

fn fmt_i32(value: Option<i32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn fmt_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn fmt_bit(value: Option<bool>) -> String {
    match value {
        Some(true) => "1".to_string(),
        Some(false) => "0".to_string(),
        None => String::new(),
    }
}
