// ==========================================
// 航班数据分析系统 - 仓储层错误类型
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("数据库连接失败: {0}")]
    ConnectionError(String),

    #[error("锁获取失败: {0}")]
    LockError(String),

    #[error("SQL 执行失败: {0}")]
    SqlError(#[from] rusqlite::Error),

    #[error("事务失败 (块 {chunk_index}, 行 {row_from}-{row_to}): {message}")]
    ChunkTransactionError {
        chunk_index: usize,
        row_from: usize,
        row_to: usize,
        message: String,
    },

    #[error("记录不存在: {0}")]
    NotFound(String),

    #[error("序列化失败: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type RepoResult<T> = Result<T, RepositoryError>;
