// ==========================================
// 采购分析系统 - 供应商维度汇总
// ==========================================
// 1. 按供应商汇总金额/数量/订单数
// 2. 每个物料的不同供应商数（供应商多样性）
// 3. 平均供应商数、多供应商物料占比
// ==========================================

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::{EnrichedOrder, SupplierArticleLink};

/// 单供应商汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierAggregate {
    pub supplier_id: String,
    pub total_amount: f64,
    pub total_quantity: f64,
    pub order_count: usize,
    /// 供货关系表中登记的物料数
    pub linked_article_count: usize,
}

/// 物料的供应商多样性
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierDiversity {
    pub article_id: String,
    pub supplier_count: usize,
}

/// 供应商维度汇总结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierRollup {
    /// 按金额降序
    pub per_supplier: Vec<SupplierAggregate>,
    /// 按物料号升序；仅含至少有一个供应商的物料
    pub diversity: Vec<SupplierDiversity>,
    pub mean_supplier_count: Option<f64>,
    pub multi_supplier_pct: Option<f64>,
}

impl SupplierRollup {
    pub fn top_suppliers(&self, n: usize) -> &[SupplierAggregate] {
        &self.per_supplier[..n.min(self.per_supplier.len())]
    }

    pub fn supplier_count_of(&self, article_id: &str) -> usize {
        self.diversity
            .iter()
            .find(|d| d.article_id == article_id)
            .map_or(0, |d| d.supplier_count)
    }
}

/// 按供应商汇总
///
/// 缺少供应商的订单不计入任何供应商，也不计入多样性
pub fn aggregate_by_supplier(
    enriched: &[EnrichedOrder],
    links: &[SupplierArticleLink],
) -> SupplierRollup {
    let mut totals: HashMap<&str, (f64, f64, usize)> = HashMap::new();
    let mut suppliers_per_article: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for row in enriched {
        let Some(supplier_id) = row.supplier_id() else {
            continue;
        };
        let entry = totals.entry(supplier_id).or_insert((0.0, 0.0, 0));
        entry.0 += row.order.order_amount;
        entry.1 += row.order.quantity;
        entry.2 += 1;

        suppliers_per_article
            .entry(row.article_id())
            .or_default()
            .insert(supplier_id);
    }

    let mut linked: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for link in links {
        linked
            .entry(link.supplier_id.as_str())
            .or_default()
            .insert(link.article_id.as_str());
    }

    let mut per_supplier: Vec<SupplierAggregate> = totals
        .into_iter()
        .map(|(supplier_id, (amount, qty, count))| SupplierAggregate {
            supplier_id: supplier_id.to_string(),
            total_amount: amount,
            total_quantity: qty,
            order_count: count,
            linked_article_count: linked.get(supplier_id).map_or(0, |s| s.len()),
        })
        .collect();
    // 金额降序，并列按供应商号保证输出稳定
    per_supplier.sort_by(|a, b| {
        b.total_amount
            .total_cmp(&a.total_amount)
            .then_with(|| a.supplier_id.cmp(&b.supplier_id))
    });

    let diversity: Vec<SupplierDiversity> = suppliers_per_article
        .into_iter()
        .map(|(article_id, suppliers)| SupplierDiversity {
            article_id: article_id.to_string(),
            supplier_count: suppliers.len(),
        })
        .collect();

    let (mean_supplier_count, multi_supplier_pct) = if diversity.is_empty() {
        (None, None)
    } else {
        let n = diversity.len() as f64;
        let sum: usize = diversity.iter().map(|d| d.supplier_count).sum();
        let multi = diversity.iter().filter(|d| d.supplier_count > 1).count();
        (Some(sum as f64 / n), Some(multi as f64 / n * 100.0))
    };

    SupplierRollup {
        per_supplier,
        diversity,
        mean_supplier_count,
        multi_supplier_pct,
    }
}
