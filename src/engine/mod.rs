// ==========================================
// 采购分析系统 - 引擎层
// ==========================================
// 职责: 清洗、关联、汇总、对账；全部为纯函数
// 红线: Engine 不拼 SQL，不做 IO
// ==========================================

pub mod catalog;
pub mod data_cleaner;
pub mod filter;
pub mod kpi;
pub mod normalize;
pub mod period;
pub mod pipeline;
pub mod reconcile;
pub mod supplier;
pub mod volatility;

// 重导出核心函数与结果类型
pub use catalog::{aggregate_by_article, join_with_catalog, ArticleAggregate, ArticleRollup, OrderedArticle};
pub use data_cleaner::DataCleaner;
pub use filter::{apply_filter, available_suppliers, available_years, filter_orders};
pub use kpi::{compute_kpis, ArticleHighlight, DashboardKpis, PurchaseTypeShare};
pub use normalize::{normalize, normalize_tables, CleanedTables, NormalizeReport};
pub use period::{aggregate_by_period, ArticlePeriodAggregate, PeriodAggregate, TimeSeries};
pub use pipeline::{run, FilterOptions, Rankings, ReconciliationOutput, RunMeta};
pub use reconcile::{
    deficit_articles, reconcile_with_requests, request_coverage, surplus_articles,
    ReconciledArticle, RequestCoverage,
};
pub use supplier::{aggregate_by_supplier, SupplierAggregate, SupplierDiversity, SupplierRollup};
pub use volatility::{most_volatile, sample_std_dev, volatility, ArticleVolatility};
