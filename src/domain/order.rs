// ==========================================
// 采购分析系统 - 订单领域模型
// ==========================================
// 来源: 上游采购系统 orders 表（本系统只读）
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// RawOrder - 订单原始行
// ==========================================
// 用途: 存储层读出的未清洗数据，所有字段保持文本
// 生命周期: 仅在 normalize 之前
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOrder {
    pub order_id: Option<String>,
    pub order_date: Option<String>,
    pub quantity: Option<String>,
    pub supplier_id: Option<String>,
    pub article_id: Option<String>,
    pub article_label: Option<String>,
    pub purchase_type: Option<String>,
    pub order_amount: Option<String>,
}

// ==========================================
// Order - 清洗后的订单
// ==========================================
// 红线: 金额/数量/日期均已解析成功，否则该行在清洗阶段被剔除
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: Option<String>,      // 订单号
    pub order_date: NaiveDate,         // 下单日期
    pub quantity: f64,                 // 订购数量
    pub supplier_id: Option<String>,   // 供应商（已 TRIM）
    pub article_id: String,            // 物料号（已 TRIM，关联键）
    pub article_label: Option<String>, // 订单上的物料描述
    pub purchase_type: Option<String>, // 采购类型
    pub order_amount: f64,             // 订单金额
}

// ==========================================
// EnrichedOrder - 关联物料目录后的订单
// ==========================================
// 左连接结果: 目录缺失时 designation/family 为 None，行不丢失
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedOrder {
    #[serde(flatten)]
    pub order: Order,
    pub designation: Option<String>,
    pub family: Option<String>,
    pub supplier_link_known: bool, // (供应商, 物料) 是否存在于供货关系表
}

impl EnrichedOrder {
    pub fn article_id(&self) -> &str {
        &self.order.article_id
    }

    pub fn supplier_id(&self) -> Option<&str> {
        self.order.supplier_id.as_deref()
    }
}
