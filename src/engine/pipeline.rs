// ==========================================
// 采购分析系统 - 对账流水线
// ==========================================
// 流程: normalize → filter → join_with_catalog → 各维度汇总 → KPI
// 红线: 纯函数，不写任何数据；空结果是合法终态
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::AnalysisConfig;
use crate::domain::{AnalysisFilter, Article, EnrichedOrder, PeriodGrain, RawDataset};
use crate::engine::catalog::{aggregate_by_article, join_with_catalog, ArticleRollup, OrderedArticle};
use crate::engine::filter::{apply_filter, available_suppliers, available_years};
use crate::engine::kpi::{compute_kpis, DashboardKpis};
use crate::engine::normalize::{normalize, NormalizeReport};
use crate::engine::period::{aggregate_by_period, TimeSeries};
use crate::engine::reconcile::{
    deficit_articles, reconcile_with_requests, request_coverage, surplus_articles,
    ReconciledArticle,
};
use crate::engine::supplier::{aggregate_by_supplier, SupplierAggregate, SupplierRollup};
use crate::engine::volatility::{most_volatile, volatility, ArticleVolatility};
use crate::perf::PerfGuard;

/// 运行元信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    pub run_id: String,
    pub run_at: DateTime<Utc>,
    pub filter: AnalysisFilter,
    pub engine_version: String,
}

/// 驾驶舱筛选项
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    /// 已按所选年份过滤
    pub suppliers: Vec<String>,
}

/// 排行榜视图（长度由配置决定）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rankings {
    pub top_articles: Vec<OrderedArticle>,
    pub top_suppliers: Vec<SupplierAggregate>,
    pub top_surplus: Vec<ReconciledArticle>,
    pub top_deficit: Vec<ReconciledArticle>,
    pub most_volatile: Vec<ArticleVolatility>,
}

/// 一次分析的全部结果表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationOutput {
    pub meta: RunMeta,
    pub normalize_report: NormalizeReport,
    pub filter_options: FilterOptions,
    pub orders: Vec<EnrichedOrder>,
    pub articles: ArticleRollup,
    pub reconciled: Vec<ReconciledArticle>,
    pub yearly: TimeSeries,
    pub monthly: TimeSeries,
    pub suppliers: SupplierRollup,
    pub volatility: Vec<ArticleVolatility>,
    pub kpis: DashboardKpis,
    pub rankings: Rankings,
}

impl ReconciliationOutput {
    /// 过滤后是否仍有订单
    pub fn has_data(&self) -> bool {
        !self.orders.is_empty()
    }

    pub fn surplus(&self) -> Vec<&ReconciledArticle> {
        surplus_articles(&self.reconciled)
    }

    pub fn deficit(&self) -> Vec<&ReconciledArticle> {
        deficit_articles(&self.reconciled)
    }

    pub fn never_ordered(&self) -> &[Article] {
        &self.articles.never_ordered
    }

    /// 订单明细（按供应商、下单日期升序；无供应商的订单排在最后）
    pub fn order_detail(&self) -> Vec<&EnrichedOrder> {
        let mut rows: Vec<&EnrichedOrder> = self.orders.iter().collect();
        rows.sort_by(|a, b| {
            let key = |r: &EnrichedOrder| (r.supplier_id().is_none(), r.supplier_id().map(str::to_string));
            key(a)
                .cmp(&key(b))
                .then_with(|| a.order.order_date.cmp(&b.order.order_date))
        });
        rows
    }
}

/// 执行一次完整分析
#[instrument(skip_all, fields(year = ?filter.year, supplier = ?filter.supplier_id))]
pub fn run(raw: &RawDataset, filter: &AnalysisFilter, config: &AnalysisConfig) -> ReconciliationOutput {
    let mut perf = PerfGuard::new("reconciliation_run");
    let filter = filter.normalized();

    let (tables, normalize_report) = normalize(raw);

    let filter_options = FilterOptions {
        years: available_years(&tables.orders),
        suppliers: available_suppliers(&tables.orders, filter.year),
    };

    let filtered = apply_filter(&tables.orders, &filter);
    let enriched = join_with_catalog(&filtered, &tables.articles, &tables.supplier_links);

    let articles = aggregate_by_article(&enriched, &tables.articles);
    let reconciled = reconcile_with_requests(&articles.ordered, &tables.requests);
    let yearly = aggregate_by_period(&enriched, PeriodGrain::Year);
    let monthly = aggregate_by_period(&enriched, PeriodGrain::Month);
    let suppliers = aggregate_by_supplier(&enriched, &tables.supplier_links);
    let volatility = volatility(&enriched);

    let coverage = request_coverage(&reconciled);
    let kpis = compute_kpis(
        &tables.articles,
        &enriched,
        &articles,
        yearly.busiest_period(),
        coverage,
    );

    let rankings = Rankings {
        top_articles: articles.top_by_amount(config.top_n).to_vec(),
        top_suppliers: suppliers.top_suppliers(config.supplier_top_n).to_vec(),
        top_surplus: surplus_articles(&reconciled)
            .into_iter()
            .take(config.top_n)
            .cloned()
            .collect(),
        top_deficit: deficit_articles(&reconciled)
            .into_iter()
            .take(config.top_n)
            .cloned()
            .collect(),
        most_volatile: most_volatile(&volatility, config.volatility_top_n)
            .into_iter()
            .cloned()
            .collect(),
    };

    let meta = RunMeta {
        run_id: Uuid::new_v4().to_string(),
        run_at: Utc::now(),
        filter,
        engine_version: crate::VERSION.to_string(),
    };

    info!(
        run_id = %meta.run_id,
        orders = enriched.len(),
        ordered_articles = articles.ordered.len(),
        never_ordered = articles.never_ordered.len(),
        suppliers = suppliers.per_supplier.len(),
        dropped = normalize_report.orders_dropped_total(),
        "分析完成"
    );

    perf.record_rows(enriched.len());

    ReconciliationOutput {
        meta,
        normalize_report,
        filter_options,
        orders: enriched,
        articles,
        reconciled,
        yearly,
        monthly,
        suppliers,
        volatility,
        kpis,
        rankings,
    }
}
