// ==========================================
// 航班数据分析系统 - API 层错误类型
// ==========================================
// 职责: 将仓储/导入层的技术错误转换为用户可读的业务错误
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 业务规则错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ===== 数据访问错误 =====
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ===== 导入/导出错误 =====
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("导出失败: {0}")]
    ExportError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => ApiError::NotFound(msg),
            RepositoryError::ConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::ChunkTransactionError { .. } => {
                ApiError::DatabaseTransactionError(err.to_string())
            }
            RepositoryError::SqlError(e) => ApiError::DatabaseError(e.to_string()),
            RepositoryError::SerializationError(e) => ApiError::InternalError(e.to_string()),
            RepositoryError::Other(e) => ApiError::Other(e),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
