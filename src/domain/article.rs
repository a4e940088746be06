// ==========================================
// 采购分析系统 - 物料目录领域模型
// ==========================================

use serde::{Deserialize, Serialize};

/// 物料目录原始行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawArticle {
    pub article_id: Option<String>,
    pub designation: Option<String>,
    pub family: Option<String>,
    pub purchase_type: Option<String>,
    pub prev_year_unit_price: Option<String>,
    pub current_year_unit_price: Option<String>,
    pub last_purchase_unit_cost: Option<String>,
    pub stock_value: Option<String>,
    pub stock_quantity: Option<String>,
}

// ==========================================
// Article - 物料目录条目
// ==========================================
// 约束: article_id 在目录内唯一（清洗阶段按首条保留）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub article_id: String,
    pub designation: Option<String>,             // 物料名称
    pub family: Option<String>,                  // 物料族
    pub purchase_type: Option<String>,           // 采购类型
    pub prev_year_unit_price: Option<f64>,       // 上年单价
    pub current_year_unit_price: Option<f64>,    // 本年单价
    pub last_purchase_unit_cost: Option<f64>,    // 最近一次采购单价
    pub stock_value: Option<f64>,                // 库存金额
    pub stock_quantity: Option<f64>,             // 库存数量
}

impl Article {
    /// 仅有物料号的目录条目（测试与占位使用）
    pub fn bare(article_id: impl Into<String>) -> Self {
        Self {
            article_id: article_id.into(),
            designation: None,
            family: None,
            purchase_type: None,
            prev_year_unit_price: None,
            current_year_unit_price: None,
            last_purchase_unit_cost: None,
            stock_value: None,
            stock_quantity: None,
        }
    }

    pub fn with_designation(mut self, designation: impl Into<String>) -> Self {
        self.designation = Some(designation.into());
        self
    }

    pub fn with_stock(mut self, quantity: f64, value: f64) -> Self {
        self.stock_quantity = Some(quantity);
        self.stock_value = Some(value);
        self
    }
}
