// ==========================================
// 采购分析系统 - 目录关联与物料汇总
// ==========================================
// join_with_catalog: 订单 LEFT JOIN 物料目录（行数不变）
// aggregate_by_article: 按物料汇总 → 已订物料 / 未订物料
// ==========================================

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::{Article, EnrichedOrder, Order, SupplierArticleLink};

/// 物料汇总（全部订单物料，不论是否在目录中）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleAggregate {
    pub article_id: String,
    pub total_ordered_quantity: f64,
    pub total_paid_amount: f64,
    pub order_count: usize,
}

/// 已订物料（汇总 INNER JOIN 目录）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedArticle {
    pub article_id: String,
    pub designation: Option<String>,
    pub family: Option<String>,
    pub total_ordered_quantity: f64,
    pub total_paid_amount: f64,
    pub order_count: usize,
}

/// 物料维度汇总结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleRollup {
    /// 按物料号升序
    pub per_article: Vec<ArticleAggregate>,
    /// 按累计金额降序
    pub ordered: Vec<OrderedArticle>,
    /// 目录中无任何订单的物料，保持目录顺序
    pub never_ordered: Vec<Article>,
}

impl ArticleRollup {
    /// 金额前 N 的已订物料
    pub fn top_by_amount(&self, n: usize) -> &[OrderedArticle] {
        &self.ordered[..n.min(self.ordered.len())]
    }

    /// 订购数量最多的物料
    pub fn most_ordered(&self) -> Option<&OrderedArticle> {
        self.ordered.iter().fold(None, |best: Option<&OrderedArticle>, a| match best {
            Some(b) if b.total_ordered_quantity >= a.total_ordered_quantity => Some(b),
            _ => Some(a),
        })
    }

    /// 累计金额最高的物料
    pub fn most_expensive(&self) -> Option<&OrderedArticle> {
        self.ordered.first()
    }
}

// ==========================================
// join_with_catalog
// ==========================================

/// 订单关联物料目录与供货关系
///
/// 目录缺失的订单保留，designation/family 为 None
pub fn join_with_catalog(
    orders: &[Order],
    articles: &[Article],
    links: &[SupplierArticleLink],
) -> Vec<EnrichedOrder> {
    let catalog: HashMap<&str, &Article> = articles
        .iter()
        .map(|a| (a.article_id.as_str(), a))
        .collect();
    let known_pairs: HashSet<(&str, &str)> = links
        .iter()
        .map(|l| (l.supplier_id.as_str(), l.article_id.as_str()))
        .collect();

    orders
        .iter()
        .map(|order| {
            let article = catalog.get(order.article_id.as_str());
            let supplier_link_known = order
                .supplier_id
                .as_deref()
                .map_or(false, |s| known_pairs.contains(&(s, order.article_id.as_str())));

            EnrichedOrder {
                order: order.clone(),
                designation: article.and_then(|a| a.designation.clone()),
                family: article.and_then(|a| a.family.clone()),
                supplier_link_known,
            }
        })
        .collect()
}

// ==========================================
// aggregate_by_article
// ==========================================

/// 按物料汇总并切分已订/未订视图
pub fn aggregate_by_article(enriched: &[EnrichedOrder], catalog: &[Article]) -> ArticleRollup {
    let per_article = sum_per_article(enriched);

    let totals: HashMap<&str, &ArticleAggregate> = per_article
        .iter()
        .map(|a| (a.article_id.as_str(), a))
        .collect();

    let mut ordered = Vec::new();
    let mut never_ordered = Vec::new();
    for article in catalog {
        match totals.get(article.article_id.as_str()) {
            Some(agg) => ordered.push(OrderedArticle {
                article_id: article.article_id.clone(),
                designation: article.designation.clone(),
                family: article.family.clone(),
                total_ordered_quantity: agg.total_ordered_quantity,
                total_paid_amount: agg.total_paid_amount,
                order_count: agg.order_count,
            }),
            None => never_ordered.push(article.clone()),
        }
    }

    // 稳定排序: 金额相同保持目录顺序
    ordered.sort_by(|a, b| b.total_paid_amount.total_cmp(&a.total_paid_amount));

    ArticleRollup {
        per_article,
        ordered,
        never_ordered,
    }
}

fn sum_per_article(enriched: &[EnrichedOrder]) -> Vec<ArticleAggregate> {
    let mut groups: BTreeMap<&str, (f64, f64, usize)> = BTreeMap::new();
    for row in enriched {
        let entry = groups.entry(row.article_id()).or_insert((0.0, 0.0, 0));
        entry.0 += row.order.quantity;
        entry.1 += row.order.order_amount;
        entry.2 += 1;
    }

    groups
        .into_iter()
        .map(|(article_id, (quantity, amount, count))| ArticleAggregate {
            article_id: article_id.to_string(),
            total_ordered_quantity: quantity,
            total_paid_amount: amount,
            order_count: count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn order(art: &str, sup: Option<&str>, qty: f64, amt: f64) -> Order {
        Order {
            order_id: None,
            order_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            quantity: qty,
            supplier_id: sup.map(str::to_string),
            article_id: art.to_string(),
            article_label: None,
            purchase_type: None,
            order_amount: amt,
        }
    }

    fn catalog() -> Vec<Article> {
        vec![
            Article::bare("A1").with_designation("Boulon"),
            Article::bare("A2").with_designation("Rail"),
            Article::bare("A3").with_designation("Traverse"),
        ]
    }

    #[test]
    fn test_left_join_keeps_all_rows() {
        let orders = vec![
            order("A1", Some("S1"), 1.0, 10.0),
            order("ZZ", Some("S1"), 1.0, 10.0),
            order("A2", None, 1.0, 10.0),
        ];
        let enriched = join_with_catalog(&orders, &catalog(), &[]);

        assert_eq!(enriched.len(), orders.len());
        assert_eq!(enriched[0].designation.as_deref(), Some("Boulon"));
        assert_eq!(enriched[1].designation, None);
        assert_eq!(enriched[1].article_id(), "ZZ");
    }

    #[test]
    fn test_join_marks_known_supplier_links() {
        let orders = vec![
            order("A1", Some("S1"), 1.0, 10.0),
            order("A1", Some("S9"), 1.0, 10.0),
            order("A1", None, 1.0, 10.0),
        ];
        let links = vec![SupplierArticleLink {
            family: None,
            supplier_id: "S1".to_string(),
            article_id: "A1".to_string(),
        }];
        let enriched = join_with_catalog(&orders, &catalog(), &links);
        let flags: Vec<bool> = enriched.iter().map(|e| e.supplier_link_known).collect();
        assert_eq!(flags, vec![true, false, false]);
    }

    #[test]
    fn test_aggregate_by_article_sums_and_splits() {
        let orders = vec![
            order("A1", Some("S1"), 5.0, 100.0),
            order("A1", Some("S2"), 3.0, 60.0),
            order("A2", Some("S1"), 1.0, 500.0),
            order("ZZ", Some("S1"), 2.0, 7.0),
        ];
        let enriched = join_with_catalog(&orders, &catalog(), &[]);
        let rollup = aggregate_by_article(&enriched, &catalog());

        // per_article 含目录外物料，金额守恒
        assert_eq!(rollup.per_article.len(), 3);
        let total: f64 = rollup.per_article.iter().map(|a| a.total_paid_amount).sum();
        assert_eq!(total, 667.0);

        // ordered 仅目录内，金额降序
        let ordered_ids: Vec<&str> = rollup.ordered.iter().map(|a| a.article_id.as_str()).collect();
        assert_eq!(ordered_ids, vec!["A2", "A1"]);
        assert_eq!(rollup.ordered[1].total_ordered_quantity, 8.0);
        assert_eq!(rollup.ordered[1].total_paid_amount, 160.0);
        assert_eq!(rollup.ordered[1].order_count, 2);

        // never_ordered
        assert_eq!(rollup.never_ordered.len(), 1);
        assert_eq!(rollup.never_ordered[0].article_id, "A3");

        assert_eq!(rollup.most_expensive().map(|a| a.article_id.as_str()), Some("A2"));
        assert_eq!(rollup.most_ordered().map(|a| a.article_id.as_str()), Some("A1"));
        assert_eq!(rollup.top_by_amount(1).len(), 1);
        assert_eq!(rollup.top_by_amount(10).len(), 2);
    }

    #[test]
    fn test_empty_orders_all_never_ordered() {
        let rollup = aggregate_by_article(&[], &catalog());
        assert!(rollup.per_article.is_empty());
        assert!(rollup.ordered.is_empty());
        assert_eq!(rollup.never_ordered.len(), 3);
        assert!(rollup.most_ordered().is_none());
    }
}
