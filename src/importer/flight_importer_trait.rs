// ==========================================
// 航班数据分析系统 - 航班导入 Trait
// ==========================================
// 职责: 定义航班导入接口（不包含实现）
// ==========================================

use crate::domain::flight::{DqViolation, ImportResult, RawFlightRecord};
use async_trait::async_trait;
use std::error::Error;
use std::path::Path;

// ==========================================
// FlightImporter Trait
// ==========================================
// 用途: 航班导入主接口
// 实现者: FlightImporterImpl
#[async_trait]
pub trait FlightImporter: Send + Sync {
    /// 从 CSV/Excel 文件导入航班数据
    ///
    /// # 参数
    /// - file_path: 文件路径（.csv/.xlsx/.xls）
    ///
    /// # 返回
    /// - Ok(ImportResult): 导入结果（批次信息、DQ 报告、汇总统计）
    /// - Err: 文件读取错误、数据库错误等
    ///
    /// # 导入流程
    /// 1. 文件读取与解析
    /// 2. 字段映射与类型转换（失败行进入冲突队列）
    /// 3. 数据清洗（TRIM/NULL 标准化 + 数据集清洗规则）
    /// 4. DQ 校验（必填/范围/一致性）
    /// 5. 重复航班检测（同批次 + 跨批次）
    /// 6. 分块事务落库 + 批次记录
    async fn import_from_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> Result<ImportResult, Box<dyn Error>>;

    /// 批量导入多个文件（并发执行）
    ///
    /// # 说明
    /// - 使用 tokio 并发执行多个文件的导入
    /// - 每个文件的导入是独立的，互不影响
    /// - 如果某个文件导入失败，不影响其他文件
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Result<Vec<Result<ImportResult, String>>, Box<dyn Error>>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录（HashMap<列名, 值>）
    fn parse_to_raw_records(
        &self,
        file_path: &Path,
    ) -> Result<Vec<std::collections::HashMap<String, String>>, Box<dyn Error>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 字段映射接口（阶段 1）
// 实现者: FieldMapper
pub trait FlightFieldMapper: Send + Sync {
    /// 将原始行记录映射为 RawFlightRecord
    ///
    /// # 参数
    /// - row: 原始行记录（HashMap<列名, 值>）
    /// - row_number: 行号（用于 DQ 报告）
    fn map_to_raw_flight(
        &self,
        row: std::collections::HashMap<String, String>,
        row_number: usize,
    ) -> Result<RawFlightRecord, Box<dyn Error>>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 数据清洗接口（阶段 2）
// 实现者: FlightDataCleaner
pub trait DataCleaner: Send + Sync {
    /// 清洗文本字段（TRIM + 可选 UPPER）
    fn clean_text(&self, value: &str, uppercase: bool) -> String;

    /// 标准化 NULL 值（空字符串/空白 → None）
    fn normalize_null(&self, value: Option<String>) -> Option<String>;

    /// 清洗单条航班记录（数据集清洗规则全集）
    ///
    /// # 规则
    /// 1. cancelled=0 → cancellation_code = "Not Cancelled"
    /// 2. 10 个可空数值列缺失 → 0
    /// 3. cancelled/diverted 缺失 → false
    /// 4. 文本列 TRIM，机场/承运人代码 UPPER
    ///
    /// # 返回
    /// - (zero_filled, normalized): 填 0 单元格数 / 是否填充了取消代码
    fn clean_record(&self, record: &mut RawFlightRecord) -> (usize, bool);
}

// ==========================================
// DqValidator Trait
// ==========================================
// 用途: 数据质量校验接口（阶段 3）
// 实现者: FlightDqValidator
pub trait DqValidator: Send + Sync {
    /// 校验必填字段（fl_date / op_unique_carrier / origin / dest）
    fn validate_required_fields(&self, record: &RawFlightRecord) -> Vec<DqViolation>;

    /// 校验数值范围（延误阈值 / 航距 / HHMM 时刻 / 日期维度）
    fn validate_ranges(&self, record: &RawFlightRecord) -> Vec<DqViolation>;

    /// 校验取消标志与取消代码的一致性
    fn validate_cancellation_consistency(&self, record: &RawFlightRecord) -> Vec<DqViolation>;
}

// ==========================================
// ConflictHandler Trait
// ==========================================
// 用途: 重复航班检测接口
// 实现者: FlightConflictHandler
pub trait ConflictHandler: Send + Sync {
    /// 检测同批次内重复航班（按自然键）
    ///
    /// # 返回
    /// - Vec<(行号, flight_key)>: 重复记录列表（保留首次出现的行）
    fn detect_duplicates(&self, records: &[RawFlightRecord]) -> Vec<(usize, String)>;

    /// 检测跨批次重复航班
    ///
    /// # 参数
    /// - records: 待检测记录列表
    /// - existing_keys: 数据库中已存在的 flight_key 列表
    fn detect_cross_batch_duplicates(
        &self,
        records: &[RawFlightRecord],
        existing_keys: &[String],
    ) -> Vec<(usize, String)>;
}
