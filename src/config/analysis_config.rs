// ==========================================
// 采购分析系统 - 分析参数
// ==========================================
// 职责: 缓存时效与各类排行榜长度
// 来源: 默认值 + config_kv 覆写（见 ConfigManager）
// ==========================================

use serde::{Deserialize, Serialize};

/// 默认缓存时效（秒）
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
/// 默认物料排行长度
pub const DEFAULT_TOP_N: usize = 10;
/// 默认供应商排行长度
pub const DEFAULT_SUPPLIER_TOP_N: usize = 5;
/// 默认波动率排行长度
pub const DEFAULT_VOLATILITY_TOP_N: usize = 5;

/// 分析参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub cache_ttl_secs: u64,     // 驾驶舱结果缓存时效，0 = 每次重算
    pub top_n: usize,            // 金额/超订/欠订排行长度
    pub supplier_top_n: usize,   // 供应商排行长度
    pub volatility_top_n: usize, // 波动率排行长度
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            top_n: DEFAULT_TOP_N,
            supplier_top_n: DEFAULT_SUPPLIER_TOP_N,
            volatility_top_n: DEFAULT_VOLATILITY_TOP_N,
        }
    }
}

impl AnalysisConfig {
    pub fn with_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = secs;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.cache_ttl_secs, 3600);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.supplier_top_n, 5);
        assert_eq!(config.volatility_top_n, 5);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: AnalysisConfig = serde_json::from_str(r#"{"top_n": 3}"#).unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.cache_ttl_secs, DEFAULT_CACHE_TTL_SECS);
    }
}
