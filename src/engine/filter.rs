// ==========================================
// 采购分析系统 - 订单过滤
// ==========================================
// 规则: 年份 AND 供应商；未给出的条件不限制
// 性质: 幂等、与应用顺序无关
// ==========================================

use std::collections::BTreeSet;

use chrono::Datelike;

use crate::domain::{AnalysisFilter, Order};

/// 按年份/供应商过滤订单（保持原始顺序）
pub fn filter_orders(orders: &[Order], year: Option<i32>, supplier_id: Option<&str>) -> Vec<Order> {
    let supplier_id = supplier_id.map(str::trim).filter(|s| !s.is_empty());

    orders
        .iter()
        .filter(|o| year.map_or(true, |y| o.order_date.year() == y))
        .filter(|o| supplier_id.map_or(true, |s| o.supplier_id.as_deref() == Some(s)))
        .cloned()
        .collect()
}

/// 按 AnalysisFilter 过滤
pub fn apply_filter(orders: &[Order], filter: &AnalysisFilter) -> Vec<Order> {
    filter_orders(orders, filter.year, filter.supplier_id.as_deref())
}

/// 可选年份（升序）
pub fn available_years(orders: &[Order]) -> Vec<i32> {
    orders
        .iter()
        .map(|o| o.order_date.year())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 可选供应商（升序）
///
/// 供应商下拉框取自已按年份过滤的订单
pub fn available_suppliers(orders: &[Order], year: Option<i32>) -> Vec<String> {
    orders
        .iter()
        .filter(|o| year.map_or(true, |y| o.order_date.year() == y))
        .filter_map(|o| o.supplier_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
