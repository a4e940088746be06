// ==========================================
// 采购分析系统 - 驾驶舱 API
// ==========================================
// 职责: 供展示层调用的查询边界；按筛选条件缓存完整分析结果
// 架构: API 层 → Repository（ProcurementSource）+ Engine（run）
// ==========================================

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::cache::AnalysisCache;
use crate::api::error::{ApiError, ApiResult};
use crate::config::{AnalysisConfig, ConfigManager};
use crate::domain::AnalysisFilter;
use crate::engine::{
    self, ArticlePeriodAggregate, ArticleVolatility, FilterOptions, OrderedArticle,
    ReconciledArticle, ReconciliationOutput,
};
use crate::repository::{ProcurementSource, SqliteProcurementRepository};

/// 单物料钻取视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDetail {
    pub article_id: String,
    pub summary: Option<OrderedArticle>,
    pub reconciliation: Option<ReconciledArticle>,
    pub yearly: Vec<ArticlePeriodAggregate>,
    pub monthly: Vec<ArticlePeriodAggregate>,
    pub supplier_count: usize,
    pub volatility: Option<ArticleVolatility>,
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    source: Arc<dyn ProcurementSource>,
    config: AnalysisConfig,
    cache: AnalysisCache,
}

impl DashboardApi {
    /// 创建新的DashboardApi实例
    ///
    /// # 参数
    /// - source: 采购数据源
    /// - config: 分析参数（缓存时效、排行长度）
    pub fn new(source: Arc<dyn ProcurementSource>, config: AnalysisConfig) -> Self {
        let cache = AnalysisCache::new(config.cache_ttl());
        Self {
            source,
            config,
            cache,
        }
    }

    /// 基于 SQLite 采购库创建，分析参数从同库 config_kv 读取
    ///
    /// # 返回
    /// - Err(DataSourceUnavailable): 数据库无法打开
    pub fn from_sqlite(db_path: &str) -> ApiResult<Self> {
        let repo = SqliteProcurementRepository::new(db_path)?;
        let config = Self::load_config(repo.connection());
        Ok(Self::new(Arc::new(repo), config))
    }

    /// 读取分析参数；读取失败时降级为默认值
    fn load_config(conn: Arc<Mutex<rusqlite::Connection>>) -> AnalysisConfig {
        match ConfigManager::from_connection(conn).load_analysis_config() {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "分析参数读取失败，使用默认值");
                AnalysisConfig::default()
            }
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    // ==========================================
    // 驾驶舱查询
    // ==========================================

    /// 获取完整分析结果
    ///
    /// # 参数
    /// - filter: 年份/供应商筛选（供应商去空白，空串视为不限）
    ///
    /// # 返回
    /// - Ok(Arc<ReconciliationOutput>): 缓存命中时返回同一份结果
    /// - Err(ApiError): 数据源读取失败
    pub fn get_dashboard(&self, filter: &AnalysisFilter) -> ApiResult<Arc<ReconciliationOutput>> {
        let key = filter.normalized();

        if let Some(hit) = self.cache.get(&key) {
            debug!(year = ?key.year, supplier = ?key.supplier_id, run_id = %hit.meta.run_id, "缓存命中");
            return Ok(hit);
        }

        // 缓存外计算，完成后整体发布
        let dataset = self.source.load_dataset()?;
        let output = Arc::new(engine::run(&dataset, &key, &self.config));

        info!(
            source = %self.source.describe(),
            year = ?key.year,
            supplier = ?key.supplier_id,
            run_id = %output.meta.run_id,
            has_data = output.has_data(),
            "驾驶舱结果已刷新"
        );

        self.cache.insert(key, Arc::clone(&output));
        Ok(output)
    }

    /// 获取筛选项（年份全集 + 所选年份下的供应商）
    pub fn get_filter_options(&self, year: Option<i32>) -> ApiResult<FilterOptions> {
        let filter = AnalysisFilter {
            year,
            supplier_id: None,
        };
        Ok(self.get_dashboard(&filter)?.filter_options.clone())
    }

    /// 单物料钻取
    ///
    /// # 返回
    /// - Err(InvalidInput): article_id 为空
    /// - Ok(ArticleDetail): 物料在当前筛选下无订单时各项为空
    pub fn get_article_detail(
        &self,
        filter: &AnalysisFilter,
        article_id: &str,
    ) -> ApiResult<ArticleDetail> {
        let article_id = article_id.trim();
        if article_id.is_empty() {
            return Err(ApiError::InvalidInput("物料号不能为空".to_string()));
        }

        let output = self.get_dashboard(filter)?;

        Ok(ArticleDetail {
            article_id: article_id.to_string(),
            summary: output
                .articles
                .ordered
                .iter()
                .find(|a| a.article_id == article_id)
                .cloned(),
            reconciliation: output
                .reconciled
                .iter()
                .find(|r| r.article_id == article_id)
                .cloned(),
            yearly: output
                .yearly
                .article_history(article_id)
                .into_iter()
                .cloned()
                .collect(),
            monthly: output
                .monthly
                .article_history(article_id)
                .into_iter()
                .cloned()
                .collect(),
            supplier_count: output.suppliers.supplier_count_of(article_id),
            volatility: output
                .volatility
                .iter()
                .find(|v| v.article_id == article_id)
                .cloned(),
        })
    }

    /// 清空缓存（上游数据刷新后调用）
    pub fn invalidate_cache(&self) -> ApiResult<usize> {
        let removed = self.cache.clear();
        info!(removed, "驾驶舱缓存已清空");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RawDataset, RawOrder};

    fn memory_api(ttl_secs: u64) -> DashboardApi {
        let dataset = RawDataset {
            orders: vec![RawOrder {
                order_id: Some("1".to_string()),
                order_date: Some("2023-01-15".to_string()),
                quantity: Some("5".to_string()),
                supplier_id: Some("S1".to_string()),
                article_id: Some("A1".to_string()),
                order_amount: Some("100".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        DashboardApi::new(
            Arc::new(dataset),
            AnalysisConfig::default().with_cache_ttl_secs(ttl_secs),
        )
    }

    #[test]
    fn test_cache_key_is_normalized() {
        let api = memory_api(3600);
        let a = api.get_dashboard(&AnalysisFilter::for_supplier(" S1 ")).unwrap();
        let b = api.get_dashboard(&AnalysisFilter::for_supplier("S1")).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_article_detail_requires_id() {
        let api = memory_api(3600);
        let result = api.get_article_detail(&AnalysisFilter::all(), "  ");
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }
}
