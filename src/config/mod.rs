// ==========================================
// 采购分析系统 - 配置层
// ==========================================
// 职责: 分析参数默认值与覆写
// 存储: config_kv 表（可选）
// ==========================================

pub mod analysis_config;
pub mod config_manager;

pub use analysis_config::AnalysisConfig;
pub use config_manager::{config_keys, ConfigManager};
