// ==========================================
// 采购分析系统 - 领域类型定义
// ==========================================
// 职责: 过滤条件、统计周期、库存状态等值类型
// ==========================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// AnalysisFilter - 分析过滤条件
// ==========================================
// 用途: 驾驶舱侧边栏的年份/供应商筛选
// 缓存: (year, supplier_id) 即缓存键
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisFilter {
    pub year: Option<i32>,           // 订单年份（None = 不限）
    pub supplier_id: Option<String>, // 供应商（None = 不限）
}

impl AnalysisFilter {
    /// 不限条件
    pub fn all() -> Self {
        Self::default()
    }

    /// 仅按年份
    pub fn for_year(year: i32) -> Self {
        Self {
            year: Some(year),
            supplier_id: None,
        }
    }

    /// 仅按供应商
    pub fn for_supplier(supplier_id: impl Into<String>) -> Self {
        Self {
            year: None,
            supplier_id: Some(supplier_id.into()),
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_supplier(mut self, supplier_id: impl Into<String>) -> Self {
        self.supplier_id = Some(supplier_id.into());
        self
    }

    /// 规范化: 供应商去空白，空字符串视为不限
    ///
    /// 与订单侧的 supplier_id TRIM 保持一致，保证缓存键唯一
    pub fn normalized(&self) -> Self {
        Self {
            year: self.year,
            supplier_id: self
                .supplier_id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.year.is_none() && self.supplier_id.is_none()
    }
}

// ==========================================
// PeriodGrain - 时间粒度
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodGrain {
    Year,
    Month,
}

impl PeriodGrain {
    /// 将日期折算为统计周期
    pub fn period_of(&self, date: NaiveDate) -> Period {
        match self {
            PeriodGrain::Year => Period::year(date.year()),
            PeriodGrain::Month => Period::month(date.year(), date.month()),
        }
    }
}

// ==========================================
// Period - 统计周期（年 或 年-月）
// ==========================================
// 排序: 先年后月，年粒度的 month 恒为 None
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: Option<u32>,
}

impl Period {
    pub fn year(year: i32) -> Self {
        Self { year, month: None }
    }

    pub fn month(year: i32, month: u32) -> Self {
        Self {
            year,
            month: Some(month),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month {
            Some(m) => write!(f, "{:04}-{:02}", self.year, m),
            None => write!(f, "{:04}", self.year),
        }
    }
}

// ==========================================
// StockStatus - 订购/需求差异分类
// ==========================================
// 口径: stock_variance = 订购量 - 需求量
// 无物料需求覆盖的物料为 Uncovered，不按 0 处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    Surplus,   // 超订（差异 > 0）
    Deficit,   // 欠订（差异 < 0）
    Balanced,  // 持平（差异 = 0）
    Uncovered, // 无物料需求
}

impl StockStatus {
    pub fn from_variance(variance: Option<f64>) -> Self {
        match variance {
            None => StockStatus::Uncovered,
            Some(v) if v > 0.0 => StockStatus::Surplus,
            Some(v) if v < 0.0 => StockStatus::Deficit,
            Some(_) => StockStatus::Balanced,
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::Surplus => write!(f, "SURPLUS"),
            StockStatus::Deficit => write!(f, "DEFICIT"),
            StockStatus::Balanced => write!(f, "BALANCED"),
            StockStatus::Uncovered => write!(f, "UNCOVERED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_normalized_trims_supplier() {
        let filter = AnalysisFilter::for_supplier("  S1 ").with_year(2023);
        let normalized = filter.normalized();
        assert_eq!(normalized.supplier_id.as_deref(), Some("S1"));
        assert_eq!(normalized.year, Some(2023));

        let blank = AnalysisFilter::for_supplier("   ").normalized();
        assert!(blank.is_unrestricted());
    }

    #[test]
    fn test_period_display_and_order() {
        let d = NaiveDate::from_ymd_opt(2023, 2, 14).unwrap();
        assert_eq!(PeriodGrain::Year.period_of(d).to_string(), "2023");
        assert_eq!(PeriodGrain::Month.period_of(d).to_string(), "2023-02");

        assert!(Period::month(2022, 12) < Period::month(2023, 1));
        assert!(Period::year(2022) < Period::year(2023));
    }

    #[test]
    fn test_stock_status_from_variance() {
        assert_eq!(StockStatus::from_variance(Some(20.0)), StockStatus::Surplus);
        assert_eq!(StockStatus::from_variance(Some(-30.0)), StockStatus::Deficit);
        assert_eq!(StockStatus::from_variance(Some(0.0)), StockStatus::Balanced);
        assert_eq!(StockStatus::from_variance(None), StockStatus::Uncovered);
    }
}
