// ==========================================
// 采购分析系统 - 按周期汇总
// ==========================================
// 分组: (物料, 周期) 与 (周期) 两套口径，一次遍历完成
// ==========================================

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::{EnrichedOrder, Period, PeriodGrain};

/// 单物料单周期汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticlePeriodAggregate {
    pub article_id: String,
    pub designation: Option<String>,
    pub period: Period,
    pub total_quantity: f64,
    pub total_amount: f64,
}

/// 全局单周期汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodAggregate {
    pub period: Period,
    pub total_quantity: f64,
    pub total_amount: f64,
}

/// 时间序列（均按物料号、周期升序）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub grain: PeriodGrain,
    pub by_article: Vec<ArticlePeriodAggregate>,
    pub global: Vec<PeriodAggregate>,
}

impl TimeSeries {
    /// 单个物料的时间序列
    pub fn article_history(&self, article_id: &str) -> Vec<&ArticlePeriodAggregate> {
        let article_id = article_id.trim();
        self.by_article
            .iter()
            .filter(|row| row.article_id == article_id)
            .collect()
    }

    /// 金额最高的周期（并列取最早）
    pub fn busiest_period(&self) -> Option<Period> {
        self.global
            .iter()
            .fold(None, |best: Option<&PeriodAggregate>, p| match best {
                Some(b) if b.total_amount >= p.total_amount => Some(b),
                _ => Some(p),
            })
            .map(|p| p.period)
    }
}

/// 按周期汇总订单数量与金额
pub fn aggregate_by_period(enriched: &[EnrichedOrder], grain: PeriodGrain) -> TimeSeries {
    let mut by_article: BTreeMap<(&str, Period), (f64, f64)> = BTreeMap::new();
    let mut global: BTreeMap<Period, (f64, f64)> = BTreeMap::new();
    let mut designations: HashMap<&str, Option<&str>> = HashMap::new();

    for row in enriched {
        let period = grain.period_of(row.order.order_date);
        let qty = row.order.quantity;
        let amount = row.order.order_amount;

        let entry = by_article.entry((row.article_id(), period)).or_insert((0.0, 0.0));
        entry.0 += qty;
        entry.1 += amount;

        let entry = global.entry(period).or_insert((0.0, 0.0));
        entry.0 += qty;
        entry.1 += amount;

        designations
            .entry(row.article_id())
            .or_insert_with(|| row.designation.as_deref());
    }

    TimeSeries {
        grain,
        by_article: by_article
            .into_iter()
            .map(|((article_id, period), (qty, amount))| ArticlePeriodAggregate {
                article_id: article_id.to_string(),
                designation: designations
                    .get(article_id)
                    .copied()
                    .flatten()
                    .map(str::to_string),
                period,
                total_quantity: qty,
                total_amount: amount,
            })
            .collect(),
        global: global
            .into_iter()
            .map(|(period, (qty, amount))| PeriodAggregate {
                period,
                total_quantity: qty,
                total_amount: amount,
            })
            .collect(),
    }
}
