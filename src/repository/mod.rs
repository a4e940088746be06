// ==========================================
// 采购分析系统 - 仓储层
// ==========================================
// 职责: 原始数据只读访问
// 红线: Repository 不含业务逻辑
// ==========================================

pub mod csv_source;
pub mod error;
pub mod procurement_repo;
pub mod source;

pub use csv_source::CsvProcurementSource;
pub use error::{RepositoryError, RepositoryResult};
pub use procurement_repo::SqliteProcurementRepository;
pub use source::ProcurementSource;
