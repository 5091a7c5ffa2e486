// ==========================================
// 航班数据分析系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入/统计流程需要的配置读取接口（不包含实现）
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// LoaderConfigReader Trait
// ==========================================
// 用途: 导入器与统计层读取配置
// 实现者: ConfigManager
#[async_trait]
pub trait LoaderConfigReader: Send + Sync {
    // ===== 入库配置 =====

    /// 分块大小（每个事务提交的行数）
    ///
    /// 默认 10000。SQLite 单文件库下过大的事务会放大回滚成本，
    /// 过小则提交开销占比上升，按数据量调优。
    async fn get_load_chunk_size(&self) -> Result<usize, Box<dyn Error>>;

    /// 入库前是否清空 flight 表
    ///
    /// 默认 true（整库刷新场景）。
    async fn get_truncate_before_load(&self) -> Result<bool, Box<dyn Error>>;

    // ===== 数据质量配置 =====

    /// 延误异常阈值（分钟，绝对值）
    ///
    /// 超出 [-threshold, threshold] 的 dep_delay/arr_delay 记 WARNING。
    async fn get_delay_anomaly_threshold_minutes(&self) -> Result<f64, Box<dyn Error>>;

    /// 航距合理上限（英里）
    ///
    /// 超出的 distance 记 WARNING（美国国内航线不应超过该值）。
    async fn get_max_reasonable_distance_miles(&self) -> Result<f64, Box<dyn Error>>;

    // ===== 统计口径配置 =====

    /// 准点判定阈值（分钟）
    ///
    /// arr_delay <= 阈值视为准点，默认 15（DOT 口径）。
    async fn get_on_time_threshold_minutes(&self) -> Result<i32, Box<dyn Error>>;

    // ===== 批次保留 =====

    /// 导入批次记录保留天数
    async fn get_batch_retention_days(&self) -> Result<i32, Box<dyn Error>>;
}
