// ==========================================
// 采购分析系统 - 核心库
// ==========================================
// 职责: 采购订单/物料目录/供应商关系/物料需求 对账与驾驶舱聚合
// 技术栈: Rust + SQLite（只读）
// 系统定位: 分析支持系统，不写上游数据
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 清洗、关联、汇总
pub mod engine;

// 配置层 - 分析参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// API 层 - 展示层调用边界
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AnalysisFilter, Period, PeriodGrain, StockStatus};

// 领域实体
pub use domain::{
    Article, EnrichedOrder, MaterialRequest, Order, RawArticle, RawDataset, RawMaterialRequest,
    RawOrder, RawSupplierLink, SupplierArticleLink,
};

// 引擎
pub use engine::{run, DataCleaner, ReconciliationOutput};

// 数据源
pub use repository::{CsvProcurementSource, ProcurementSource, SqliteProcurementRepository};

// 配置
pub use config::{AnalysisConfig, ConfigManager};

// API
pub use api::{ApiError, ApiResult, DashboardApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "采购分析系统";
