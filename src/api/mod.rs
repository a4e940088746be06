// ==========================================
// 采购分析系统 - API 层
// ==========================================
// 职责: 展示层调用边界，错误转换与结果缓存
// ==========================================

pub mod cache;
pub mod dashboard_api;
pub mod error;

pub use cache::AnalysisCache;
pub use dashboard_api::{ArticleDetail, DashboardApi};
pub use error::{ApiError, ApiResult};
