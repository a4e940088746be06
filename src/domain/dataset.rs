// ==========================================
// 采购分析系统 - 原始数据集
// ==========================================
// 用途: 一次分析所需的四张原始表，由存储层一次性提供
// ==========================================

use crate::domain::article::RawArticle;
use crate::domain::order::RawOrder;
use crate::domain::request::RawMaterialRequest;
use crate::domain::supplier::RawSupplierLink;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDataset {
    pub orders: Vec<RawOrder>,
    pub articles: Vec<RawArticle>,
    pub supplier_links: Vec<RawSupplierLink>,
    pub requests: Vec<RawMaterialRequest>,
}

impl RawDataset {
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
            && self.articles.is_empty()
            && self.supplier_links.is_empty()
            && self.requests.is_empty()
    }

    /// 各表行数（日志用）
    pub fn row_counts(&self) -> (usize, usize, usize, usize) {
        (
            self.orders.len(),
            self.articles.len(),
            self.supplier_links.len(),
            self.requests.len(),
        )
    }
}
