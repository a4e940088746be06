// ==========================================
// 采购分析系统 - 订购量 / 物料需求对账
// ==========================================
// 口径: stock_variance = 累计订购量 - 累计需求量
// 红线: 无物料需求的物料 variance 为 None（不按 0 处理），
//       因此不会被计入超订或欠订
// ==========================================

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{MaterialRequest, StockStatus};
use crate::engine::catalog::OrderedArticle;

/// 对账后的物料记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledArticle {
    pub article_id: String,
    pub designation: Option<String>,
    pub total_ordered_quantity: f64,
    pub total_paid_amount: f64,
    pub total_requested_quantity: Option<f64>,
    pub stock_variance: Option<f64>,
}

impl ReconciledArticle {
    pub fn status(&self) -> StockStatus {
        StockStatus::from_variance(self.stock_variance)
    }

    pub fn is_surplus(&self) -> bool {
        self.status() == StockStatus::Surplus
    }

    pub fn is_deficit(&self) -> bool {
        self.status() == StockStatus::Deficit
    }
}

/// 物料需求覆盖情况
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestCoverage {
    pub ordered_articles: usize,
    pub covered_articles: usize,
    /// 有物料需求的已订物料占比（%），无已订物料时为 0
    pub coverage_pct: f64,
    /// 覆盖物料的 Σ订购量 / Σ需求量；需求合计为 0 时为 None
    pub order_request_ratio: Option<f64>,
    pub surplus_count: usize,
    pub deficit_count: usize,
    pub balanced_count: usize,
}

/// 按物料汇总物料需求量
pub fn sum_requests(requests: &[MaterialRequest]) -> HashMap<&str, f64> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for r in requests {
        *totals.entry(r.article_id.as_str()).or_insert(0.0) += r.quantity;
    }
    totals
}

/// 已订物料 LEFT JOIN 物料需求汇总
///
/// 输出保持输入顺序
pub fn reconcile_with_requests(
    ordered: &[OrderedArticle],
    requests: &[MaterialRequest],
) -> Vec<ReconciledArticle> {
    let requested = sum_requests(requests);

    ordered
        .iter()
        .map(|a| {
            let total_requested_quantity = requested.get(a.article_id.as_str()).copied();
            ReconciledArticle {
                article_id: a.article_id.clone(),
                designation: a.designation.clone(),
                total_ordered_quantity: a.total_ordered_quantity,
                total_paid_amount: a.total_paid_amount,
                total_requested_quantity,
                stock_variance: total_requested_quantity.map(|r| a.total_ordered_quantity - r),
            }
        })
        .collect()
}

/// 超订物料，差异降序
pub fn surplus_articles(reconciled: &[ReconciledArticle]) -> Vec<&ReconciledArticle> {
    let mut rows: Vec<&ReconciledArticle> = reconciled.iter().filter(|r| r.is_surplus()).collect();
    rows.sort_by(|a, b| variance_of(b).total_cmp(&variance_of(a)));
    rows
}

/// 欠订物料，差异升序（缺口最大在前）
pub fn deficit_articles(reconciled: &[ReconciledArticle]) -> Vec<&ReconciledArticle> {
    let mut rows: Vec<&ReconciledArticle> = reconciled.iter().filter(|r| r.is_deficit()).collect();
    rows.sort_by(|a, b| variance_of(a).total_cmp(&variance_of(b)));
    rows
}

fn variance_of(r: &ReconciledArticle) -> f64 {
    r.stock_variance.unwrap_or(0.0)
}

/// 统计物料需求覆盖率与订购/需求比
pub fn request_coverage(reconciled: &[ReconciledArticle]) -> RequestCoverage {
    let covered: Vec<&ReconciledArticle> = reconciled
        .iter()
        .filter(|r| r.total_requested_quantity.is_some())
        .collect();

    let coverage_pct = if reconciled.is_empty() {
        0.0
    } else {
        covered.len() as f64 / reconciled.len() as f64 * 100.0
    };

    let total_ordered: f64 = covered.iter().map(|r| r.total_ordered_quantity).sum();
    let total_requested: f64 = covered
        .iter()
        .filter_map(|r| r.total_requested_quantity)
        .sum();
    let order_request_ratio = if total_requested != 0.0 {
        Some(total_ordered / total_requested)
    } else {
        None
    };

    let count = |status: StockStatus| reconciled.iter().filter(|r| r.status() == status).count();

    RequestCoverage {
        ordered_articles: reconciled.len(),
        covered_articles: covered.len(),
        coverage_pct,
        order_request_ratio,
        surplus_count: count(StockStatus::Surplus),
        deficit_count: count(StockStatus::Deficit),
        balanced_count: count(StockStatus::Balanced),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordered(id: &str, qty: f64) -> OrderedArticle {
        OrderedArticle {
            article_id: id.to_string(),
            designation: None,
            family: None,
            total_ordered_quantity: qty,
            total_paid_amount: qty * 10.0,
            order_count: 1,
        }
    }

    fn request(id: &str, qty: f64) -> MaterialRequest {
        MaterialRequest {
            request_id: None,
            article_id: id.to_string(),
            quantity: qty,
            requesting_unit: None,
        }
    }

    #[test]
    fn test_variance_sign() {
        let rows = reconcile_with_requests(
            &[ordered("A1", 50.0), ordered("A2", 10.0)],
            &[request("A1", 30.0), request("A2", 25.0), request("A2", 15.0)],
        );

        assert_eq!(rows[0].stock_variance, Some(20.0));
        assert_eq!(rows[0].status(), StockStatus::Surplus);
        assert_eq!(rows[1].total_requested_quantity, Some(40.0));
        assert_eq!(rows[1].stock_variance, Some(-30.0));
        assert_eq!(rows[1].status(), StockStatus::Deficit);
    }

    #[test]
    fn test_uncovered_article_has_no_variance() {
        let rows = reconcile_with_requests(&[ordered("A1", 5.0)], &[request("A9", 1.0)]);
        assert_eq!(rows[0].total_requested_quantity, None);
        assert_eq!(rows[0].stock_variance, None);
        assert_eq!(rows[0].status(), StockStatus::Uncovered);
        assert!(surplus_articles(&rows).is_empty());
        assert!(deficit_articles(&rows).is_empty());
    }

    #[test]
    fn test_surplus_and_deficit_ordering() {
        let rows = reconcile_with_requests(
            &[
                ordered("A1", 10.0),
                ordered("A2", 50.0),
                ordered("A3", 1.0),
                ordered("A4", 2.0),
                ordered("A5", 7.0),
            ],
            &[
                request("A1", 5.0),
                request("A2", 5.0),
                request("A3", 10.0),
                request("A4", 40.0),
                request("A5", 7.0),
            ],
        );

        let surplus: Vec<&str> = surplus_articles(&rows).iter().map(|r| r.article_id.as_str()).collect();
        let deficit: Vec<&str> = deficit_articles(&rows).iter().map(|r| r.article_id.as_str()).collect();
        assert_eq!(surplus, vec!["A2", "A1"]);
        assert_eq!(deficit, vec!["A4", "A3"]);
        assert_eq!(rows[4].status(), StockStatus::Balanced);
    }

    #[test]
    fn test_request_coverage() {
        let rows = reconcile_with_requests(
            &[ordered("A1", 50.0), ordered("A2", 10.0), ordered("A3", 4.0), ordered("A4", 1.0)],
            &[request("A1", 30.0), request("A2", 40.0)],
        );
        let coverage = request_coverage(&rows);

        assert_eq!(coverage.ordered_articles, 4);
        assert_eq!(coverage.covered_articles, 2);
        assert_eq!(coverage.coverage_pct, 50.0);
        assert_eq!(coverage.order_request_ratio, Some(60.0 / 70.0));
        assert_eq!(coverage.surplus_count, 1);
        assert_eq!(coverage.deficit_count, 1);
    }

    #[test]
    fn test_request_coverage_empty() {
        let coverage = request_coverage(&[]);
        assert_eq!(coverage.coverage_pct, 0.0);
        assert_eq!(coverage.order_request_ratio, None);
    }
}
