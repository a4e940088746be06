// ==========================================
// 采购分析系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 仅上游数据源故障为错误；行级脏数据由清洗阶段剔除
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("数据表不存在: {table}")]
    MissingTable { table: String },

    // ===== 文件错误 =====
    #[error("数据文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("CSV 读取失败: {0}")]
    CsvReadError(String),

    #[error("文件读写失败: {0}")]
    IoError(String),

    // ===== 数据质量错误 =====
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, _)
                if matches!(
                    code.code,
                    rusqlite::ErrorCode::CannotOpen | rusqlite::ErrorCode::NotADatabase
                ) =>
            {
                RepositoryError::DatabaseConnectionError(err.to_string())
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if let Some(table) = msg.strip_prefix("no such table: ") {
                    RepositoryError::MissingTable {
                        table: table.trim().to_string(),
                    }
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

impl From<csv::Error> for RepositoryError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            RepositoryError::IoError(err.to_string())
        } else {
            RepositoryError::CsvReadError(err.to_string())
        }
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        RepositoryError::IoError(err.to_string())
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_no_such_table_maps_to_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        let err: RepositoryError = conn
            .prepare("SELECT * FROM orders")
            .map(|_| ())
            .unwrap_err()
            .into();
        match err {
            RepositoryError::MissingTable { table } => assert_eq!(table, "orders"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(RepositoryError::from(io), RepositoryError::IoError(_)));
    }
}
