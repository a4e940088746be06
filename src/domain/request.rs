// ==========================================
// 采购分析系统 - 物料需求领域模型
// ==========================================
// 物料需求（内部领用需求），与采购订单相互独立
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMaterialRequest {
    pub request_id: Option<String>,
    pub article_id: Option<String>,
    pub quantity: Option<String>,
    pub requesting_unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRequest {
    pub request_id: Option<String>,
    pub article_id: String,
    pub quantity: f64,
    pub requesting_unit: Option<String>, // 需求单位（部门）
}
