// ==========================================
// 采购分析系统 - 驾驶舱 KPI
// ==========================================
// 职责: 基于已汇总结果计算驾驶舱头部指标
// 约束: 不重新扫描原始数据之外的任何来源
// ==========================================

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Article, EnrichedOrder, Period};
use crate::engine::catalog::ArticleRollup;
use crate::engine::reconcile::RequestCoverage;

/// 指标中引用的物料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleHighlight {
    pub article_id: String,
    pub designation: Option<String>,
    pub value: f64,
}

/// 采购类型金额占比
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseTypeShare {
    /// 缺失采购类型记为 None
    pub purchase_type: Option<String>,
    pub total_amount: f64,
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardKpis {
    pub total_catalog_articles: usize,
    /// 目录库存数量合计（缺失值不计）
    pub total_stock_quantity: f64,
    /// 目录库存金额合计（缺失值不计）
    pub total_stock_value: f64,
    pub ordered_article_count: usize,
    pub never_ordered_count: usize,
    pub order_count: usize,
    pub total_amount: f64,
    pub total_quantity: f64,
    pub most_ordered_article: Option<ArticleHighlight>,
    pub most_expensive_article: Option<ArticleHighlight>,
    pub busiest_year: Option<i32>,
    /// Σ金额 / Σ数量；数量合计 ≤ 0 时为 None
    pub mean_unit_price: Option<f64>,
    pub purchase_types: Vec<PurchaseTypeShare>,
    pub request_coverage: RequestCoverage,
}

/// 计算 KPI
pub fn compute_kpis(
    catalog: &[Article],
    enriched: &[EnrichedOrder],
    articles: &ArticleRollup,
    busiest_year: Option<Period>,
    request_coverage: RequestCoverage,
) -> DashboardKpis {
    let total_amount: f64 = enriched.iter().map(|r| r.order.order_amount).sum();
    let total_quantity: f64 = enriched.iter().map(|r| r.order.quantity).sum();

    let mean_unit_price = if total_quantity > 0.0 {
        Some(total_amount / total_quantity)
    } else {
        None
    };

    DashboardKpis {
        total_catalog_articles: catalog.len(),
        total_stock_quantity: catalog.iter().filter_map(|a| a.stock_quantity).sum(),
        total_stock_value: catalog.iter().filter_map(|a| a.stock_value).sum(),
        ordered_article_count: articles.ordered.len(),
        never_ordered_count: articles.never_ordered.len(),
        order_count: enriched.len(),
        total_amount,
        total_quantity,
        most_ordered_article: articles.most_ordered().map(|a| ArticleHighlight {
            article_id: a.article_id.clone(),
            designation: a.designation.clone(),
            value: a.total_ordered_quantity,
        }),
        most_expensive_article: articles.most_expensive().map(|a| ArticleHighlight {
            article_id: a.article_id.clone(),
            designation: a.designation.clone(),
            value: a.total_paid_amount,
        }),
        busiest_year: busiest_year.map(|p| p.year),
        mean_unit_price,
        purchase_types: purchase_type_breakdown(enriched, total_amount),
        request_coverage,
    }
}

/// 采购类型金额分布（金额降序）
pub fn purchase_type_breakdown(enriched: &[EnrichedOrder], total_amount: f64) -> Vec<PurchaseTypeShare> {
    let mut groups: HashMap<Option<&str>, f64> = HashMap::new();
    for row in enriched {
        *groups.entry(row.order.purchase_type.as_deref()).or_insert(0.0) += row.order.order_amount;
    }

    let mut shares: Vec<PurchaseTypeShare> = groups
        .into_iter()
        .map(|(purchase_type, amount)| PurchaseTypeShare {
            purchase_type: purchase_type.map(str::to_string),
            total_amount: amount,
            share_pct: if total_amount != 0.0 {
                amount / total_amount * 100.0
            } else {
                0.0
            },
        })
        .collect();
    shares.sort_by(|a, b| {
        b.total_amount
            .total_cmp(&a.total_amount)
            .then_with(|| a.purchase_type.cmp(&b.purchase_type))
    });
    shares
}
