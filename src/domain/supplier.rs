// ==========================================
// 采购分析系统 - 供货关系领域模型
// ==========================================
// 供应商 × 物料 多对多关联，无附加属性
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSupplierLink {
    pub family: Option<String>,
    pub supplier_id: Option<String>,
    pub article_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupplierArticleLink {
    pub family: Option<String>,
    pub supplier_id: String,
    pub article_id: String,
}
