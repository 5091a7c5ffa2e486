// ==========================================
// 航班数据分析系统 - 导入层
// ==========================================
// 职责: 文件解析 → 字段映射 → 清洗 → DQ 校验 → 重复检测 → 落库
// ==========================================

pub mod conflict_handler;
pub mod csv_cleaner;
pub mod data_cleaner;
pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod flight_importer_impl;
pub mod flight_importer_trait;

pub use conflict_handler::FlightConflictHandler;
pub use csv_cleaner::{CsvCleaner, CLEANED_COLUMNS};
pub use data_cleaner::FlightDataCleaner;
pub use dq_validator::FlightDqValidator;
pub use error::ImportError;
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use flight_importer_impl::FlightImporterImpl;
pub use flight_importer_trait::{
    ConflictHandler, DataCleaner, DqValidator, FileParser, FlightFieldMapper, FlightImporter,
};
