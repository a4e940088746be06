// ==========================================
// 采购分析系统 - API层错误类型
// ==========================================
// 职责: 将 Repository 层技术错误转换为调用方可理解的错误
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 数据源错误（整次分析失败，不重试）
    // ==========================================
    #[error("数据源不可用: {0}")]
    DataSourceUnavailable(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 调用方错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 通用错误
    // ==========================================
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
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DataSourceUnavailable(msg),
            RepositoryError::MissingTable { table } => {
                ApiError::DataSourceUnavailable(format!("数据表不存在: {}", table))
            }
            RepositoryError::FileNotFound { path } => {
                ApiError::DataSourceUnavailable(format!("数据文件不存在: {}", path))
            }
            RepositoryError::IoError(msg) => ApiError::DataSourceUnavailable(msg),
            RepositoryError::LockError(msg) => {
                ApiError::InternalError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::CsvReadError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
