// ==========================================
// 航班数据分析系统 - 航班导入仓储 Trait
// ==========================================
// 职责: 定义航班/批次/冲突的持久化接口
// ==========================================

use crate::domain::flight::{FlightRecord, ImportBatch, ImportConflict};
use crate::repository::error::RepoResult;
use async_trait::async_trait;

// ==========================================
// FlightImportRepository Trait
// ==========================================
// 实现者: FlightImportRepositoryImpl (SQLite)
#[async_trait]
pub trait FlightImportRepository: Send + Sync {
    // ===== 航班主表 =====

    /// 清空航班主表（全量重载模式）
    ///
    /// # 返回
    /// - 删除的行数
    async fn truncate_flights(&self) -> RepoResult<usize>;

    /// 分块事务批量写入航班记录
    ///
    /// # 参数
    /// - records: 待写入记录
    /// - chunk_size: 每个事务块的行数
    ///
    /// # 语义
    /// - 每块一个事务: 块内任一行失败则整块回滚，不影响已提交块
    /// - INSERT OR REPLACE: 自然键冲突时覆盖旧行（幂等重载）
    ///
    /// # 返回
    /// - (写入行数, 提交块数)
    async fn batch_insert_flights(
        &self,
        records: &[FlightRecord],
        chunk_size: usize,
    ) -> RepoResult<(usize, usize)>;

    /// 航班总行数
    async fn count_flights(&self) -> RepoResult<i64>;

    /// 批量检查自然键是否已存在
    ///
    /// # 返回
    /// - 已存在于库中的 flight_key 子集
    async fn batch_check_exists(&self, flight_keys: &[String]) -> RepoResult<Vec<String>>;

    // ===== 导入批次 =====

    /// 写入批次记录
    async fn insert_batch(&self, batch: &ImportBatch) -> RepoResult<()>;

    /// 查询最近的导入批次（按导入时间倒序）
    async fn get_recent_batches(&self, limit: usize) -> RepoResult<Vec<ImportBatch>>;

    // ===== 冲突队列 =====

    /// 批量写入冲突记录
    async fn insert_conflicts(&self, conflicts: &[ImportConflict]) -> RepoResult<()>;

    /// 查询冲突记录（可按批次 / 是否已处理过滤）
    async fn list_conflicts(
        &self,
        batch_id: Option<&str>,
        resolved: Option<bool>,
    ) -> RepoResult<Vec<ImportConflict>>;

    /// 冲突记录计数（同过滤条件）
    async fn count_conflicts(
        &self,
        batch_id: Option<&str>,
        resolved: Option<bool>,
    ) -> RepoResult<i64>;

    /// 标记冲突已处理
    async fn resolve_conflict(&self, conflict_id: &str) -> RepoResult<()>;
}
