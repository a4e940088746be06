// ==========================================
// 采购分析系统 - 领域模型层
// ==========================================
// 职责: 定义原始行、清洗后实体与值类型
// 红线: 不含数据访问逻辑,不含聚合逻辑
// ==========================================

pub mod article;
pub mod dataset;
pub mod order;
pub mod request;
pub mod supplier;
pub mod types;

// 重导出核心类型
pub use article::{Article, RawArticle};
pub use dataset::RawDataset;
pub use order::{EnrichedOrder, Order, RawOrder};
pub use request::{MaterialRequest, RawMaterialRequest};
pub use supplier::{RawSupplierLink, SupplierArticleLink};
pub use types::{AnalysisFilter, Period, PeriodGrain, StockStatus};
