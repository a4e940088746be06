// ==========================================
// 采购分析系统 - 月度订购量波动
// ==========================================
// 口径: 先按 (物料, 月) 汇总数量，再求各月汇总的样本标准差 (n-1)
// 红线: 只有一个观测月的物料波动为 None（保留在表中，不计为 0）
// ==========================================

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{EnrichedOrder, PeriodGrain};
use crate::engine::period::aggregate_by_period;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleVolatility {
    pub article_id: String,
    pub designation: Option<String>,
    pub observed_months: usize,
    pub volatility: Option<f64>,
}

/// 样本标准差；少于 2 个观测值返回 None
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(var.sqrt())
}

/// 计算每个物料的月度订购量波动（按物料号升序）
pub fn volatility(enriched: &[EnrichedOrder]) -> Vec<ArticleVolatility> {
    let monthly = aggregate_by_period(enriched, PeriodGrain::Month);

    let mut per_article: BTreeMap<&str, (Option<&str>, Vec<f64>)> = BTreeMap::new();
    for row in &monthly.by_article {
        let entry = per_article
            .entry(row.article_id.as_str())
            .or_insert_with(|| (row.designation.as_deref(), Vec::new()));
        entry.1.push(row.total_quantity);
    }

    per_article
        .into_iter()
        .map(|(article_id, (designation, sums))| ArticleVolatility {
            article_id: article_id.to_string(),
            designation: designation.map(str::to_string),
            observed_months: sums.len(),
            volatility: sample_std_dev(&sums),
        })
        .collect()
}

/// 波动最大的前 N 个物料（跳过无法计算的物料）
pub fn most_volatile(rows: &[ArticleVolatility], n: usize) -> Vec<&ArticleVolatility> {
    let mut ranked: Vec<&ArticleVolatility> = rows.iter().filter(|r| r.volatility.is_some()).collect();
    ranked.sort_by(|a, b| {
        let (va, vb) = (a.volatility.unwrap_or(0.0), b.volatility.unwrap_or(0.0));
        vb.total_cmp(&va)
    });
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Order;
    use chrono::NaiveDate;

    fn row(art: &str, m: u32, d: u32, qty: f64) -> EnrichedOrder {
        EnrichedOrder {
            order: Order {
                order_id: None,
                order_date: NaiveDate::from_ymd_opt(2023, m, d).unwrap(),
                quantity: qty,
                supplier_id: None,
                article_id: art.to_string(),
                article_label: None,
                purchase_type: None,
                order_amount: 1.0,
            },
            designation: None,
            family: None,
            supplier_link_known: false,
        }
    }

    #[test]
    fn test_sample_std_dev() {
        assert_eq!(sample_std_dev(&[]), None);
        assert_eq!(sample_std_dev(&[4.0]), None);
        assert_eq!(sample_std_dev(&[2.0, 2.0]), Some(0.0));
        // 均值 5，偏差平方和 32，n-1 = 7
        let sd = sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_volatility_uses_monthly_sums() {
        let rows = vec![
            row("A1", 1, 3, 5.0),
            row("A1", 1, 20, 5.0), // 1 月合计 10
            row("A1", 2, 1, 4.0),  // 2 月合计 4
            row("A2", 3, 1, 7.0),
        ];
        let result = volatility(&rows);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].article_id, "A1");
        assert_eq!(result[0].observed_months, 2);
        let expected = (18.0f64).sqrt(); // [10, 4]: 均值 7，方差 (9+9)/1
        assert!((result[0].volatility.unwrap() - expected).abs() < 1e-12);

        assert_eq!(result[1].observed_months, 1);
        assert_eq!(result[1].volatility, None);
    }

    #[test]
    fn test_most_volatile_skips_undefined() {
        let rows = vec![
            row("A1", 1, 1, 10.0),
            row("A1", 2, 1, 0.0),
            row("A2", 1, 1, 3.0),
            row("A2", 2, 1, 4.0),
            row("A3", 1, 1, 100.0),
        ];
        let result = volatility(&rows);
        let top: Vec<&str> = most_volatile(&result, 5).iter().map(|r| r.article_id.as_str()).collect();
        assert_eq!(top, vec!["A1", "A2"]);
        assert_eq!(most_volatile(&result, 1).len(), 1);
    }
}
