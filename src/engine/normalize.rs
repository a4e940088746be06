// ==========================================
// 采购分析系统 - 数据清洗与去重
// ==========================================
// 流程: 原始四表 → NULL 标准化 / TRIM 关联键 / 数值与日期解析
//       → 剔除无效订单 → 按业务字段全量去重（保留首条）
// 红线: 单行数据错误只剔除该行，并计入 NormalizeReport
// ==========================================

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{
    Article, MaterialRequest, Order, RawArticle, RawDataset, RawMaterialRequest, RawOrder,
    RawSupplierLink, SupplierArticleLink,
};
use crate::engine::data_cleaner::DataCleaner;

// ==========================================
// CleanedTables - 清洗后的四张表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanedTables {
    pub orders: Vec<Order>,
    pub articles: Vec<Article>,
    pub supplier_links: Vec<SupplierArticleLink>,
    pub requests: Vec<MaterialRequest>,
}

// ==========================================
// NormalizeReport - 清洗统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeReport {
    pub order_rows_in: usize,
    pub orders_missing_amount: usize,
    pub orders_missing_quantity: usize,
    pub orders_missing_date: usize,
    pub orders_dropped_invalid: usize,     // 金额/数量/日期任一缺失的行数（按行计）
    pub orders_dropped_no_article: usize,  // 缺少物料号
    pub orders_duplicates_removed: usize,
    pub orders_retained: usize,

    pub article_rows_in: usize,
    pub articles_dropped_no_key: usize,
    pub articles_duplicates_removed: usize,

    pub link_rows_in: usize,
    pub links_dropped_incomplete: usize,
    pub links_duplicates_removed: usize,

    pub request_rows_in: usize,
    pub requests_dropped_no_article: usize,
    pub requests_dropped_no_quantity: usize,
}

impl NormalizeReport {
    /// 被剔除的订单总数（无效 + 无物料号 + 重复）
    pub fn orders_dropped_total(&self) -> usize {
        self.orders_dropped_invalid + self.orders_dropped_no_article + self.orders_duplicates_removed
    }
}

/// 订单业务去重键
///
/// 浮点按位比较；-0.0 先归一为 0.0
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct OrderKey {
    order_id: Option<String>,
    order_date: chrono::NaiveDate,
    quantity_bits: u64,
    supplier_id: Option<String>,
    article_id: String,
    article_label: Option<String>,
    purchase_type: Option<String>,
    amount_bits: u64,
}

impl OrderKey {
    fn of(order: &Order) -> Self {
        Self {
            order_id: order.order_id.clone(),
            order_date: order.order_date,
            quantity_bits: (order.quantity + 0.0).to_bits(),
            supplier_id: order.supplier_id.clone(),
            article_id: order.article_id.clone(),
            article_label: order.article_label.clone(),
            purchase_type: order.purchase_type.clone(),
            amount_bits: (order.order_amount + 0.0).to_bits(),
        }
    }
}

// ==========================================
// 清洗入口
// ==========================================

/// 清洗整套原始数据
pub fn normalize(raw: &RawDataset) -> (CleanedTables, NormalizeReport) {
    normalize_tables(&raw.orders, &raw.articles, &raw.supplier_links, &raw.requests)
}

/// 清洗四张原始表
pub fn normalize_tables(
    raw_orders: &[RawOrder],
    raw_articles: &[RawArticle],
    raw_links: &[RawSupplierLink],
    raw_requests: &[RawMaterialRequest],
) -> (CleanedTables, NormalizeReport) {
    let cleaner = DataCleaner;
    let mut report = NormalizeReport::default();

    let orders = clean_orders(&cleaner, raw_orders, &mut report);
    let articles = clean_articles(&cleaner, raw_articles, &mut report);
    let supplier_links = clean_links(&cleaner, raw_links, &mut report);
    let requests = clean_requests(&cleaner, raw_requests, &mut report);

    if report.orders_dropped_invalid > 0 || report.orders_dropped_no_article > 0 {
        warn!(
            dropped_invalid = report.orders_dropped_invalid,
            missing_amount = report.orders_missing_amount,
            missing_quantity = report.orders_missing_quantity,
            missing_date = report.orders_missing_date,
            dropped_no_article = report.orders_dropped_no_article,
            "订单行被剔除"
        );
    }
    debug!(
        orders = orders.len(),
        duplicates = report.orders_duplicates_removed,
        articles = articles.len(),
        links = supplier_links.len(),
        requests = requests.len(),
        "清洗完成"
    );

    (
        CleanedTables {
            orders,
            articles,
            supplier_links,
            requests,
        },
        report,
    )
}

fn clean_orders(cleaner: &DataCleaner, rows: &[RawOrder], report: &mut NormalizeReport) -> Vec<Order> {
    report.order_rows_in = rows.len();

    let mut seen: HashSet<OrderKey> = HashSet::with_capacity(rows.len());
    let mut orders = Vec::with_capacity(rows.len());

    for row in rows {
        let amount = cleaner.parse_decimal(row.order_amount.as_deref());
        let quantity = cleaner.parse_decimal(row.quantity.as_deref());
        let date = cleaner.parse_date(row.order_date.as_deref());

        if amount.is_none() {
            report.orders_missing_amount += 1;
        }
        if quantity.is_none() {
            report.orders_missing_quantity += 1;
        }
        if date.is_none() {
            report.orders_missing_date += 1;
        }

        let (order_amount, quantity, order_date) = match (amount, quantity, date) {
            (Some(a), Some(q), Some(d)) => (a, q, d),
            _ => {
                report.orders_dropped_invalid += 1;
                continue;
            }
        };

        let article_id = match cleaner.normalize_null(row.article_id.as_deref()) {
            Some(id) => id,
            None => {
                report.orders_dropped_no_article += 1;
                continue;
            }
        };

        let order = Order {
            order_id: cleaner.normalize_null(row.order_id.as_deref()),
            order_date,
            quantity,
            supplier_id: cleaner.normalize_null(row.supplier_id.as_deref()),
            article_id,
            article_label: cleaner.normalize_null(row.article_label.as_deref()),
            purchase_type: cleaner.normalize_null(row.purchase_type.as_deref()),
            order_amount,
        };

        if seen.insert(OrderKey::of(&order)) {
            orders.push(order);
        } else {
            report.orders_duplicates_removed += 1;
        }
    }

    report.orders_retained = orders.len();
    orders
}

fn clean_articles(
    cleaner: &DataCleaner,
    rows: &[RawArticle],
    report: &mut NormalizeReport,
) -> Vec<Article> {
    report.article_rows_in = rows.len();

    let mut seen: HashSet<String> = HashSet::with_capacity(rows.len());
    let mut articles = Vec::with_capacity(rows.len());

    for row in rows {
        let Some(article_id) = cleaner.normalize_null(row.article_id.as_deref()) else {
            report.articles_dropped_no_key += 1;
            continue;
        };
        // 目录按物料号唯一，保证左连接不放大订单行
        if !seen.insert(article_id.clone()) {
            report.articles_duplicates_removed += 1;
            continue;
        }

        articles.push(Article {
            article_id,
            designation: cleaner.normalize_null(row.designation.as_deref()),
            family: cleaner.normalize_null(row.family.as_deref()),
            purchase_type: cleaner.normalize_null(row.purchase_type.as_deref()),
            prev_year_unit_price: cleaner.parse_decimal(row.prev_year_unit_price.as_deref()),
            current_year_unit_price: cleaner.parse_decimal(row.current_year_unit_price.as_deref()),
            last_purchase_unit_cost: cleaner.parse_decimal(row.last_purchase_unit_cost.as_deref()),
            stock_value: cleaner.parse_decimal(row.stock_value.as_deref()),
            stock_quantity: cleaner.parse_decimal(row.stock_quantity.as_deref()),
        });
    }

    articles
}

fn clean_links(
    cleaner: &DataCleaner,
    rows: &[RawSupplierLink],
    report: &mut NormalizeReport,
) -> Vec<SupplierArticleLink> {
    report.link_rows_in = rows.len();

    let mut seen: HashSet<SupplierArticleLink> = HashSet::with_capacity(rows.len());
    let mut links = Vec::with_capacity(rows.len());

    for row in rows {
        let supplier_id = cleaner.normalize_null(row.supplier_id.as_deref());
        let article_id = cleaner.normalize_null(row.article_id.as_deref());
        let (Some(supplier_id), Some(article_id)) = (supplier_id, article_id) else {
            report.links_dropped_incomplete += 1;
            continue;
        };

        let link = SupplierArticleLink {
            family: cleaner.normalize_null(row.family.as_deref()),
            supplier_id,
            article_id,
        };
        if seen.insert(link.clone()) {
            links.push(link);
        } else {
            report.links_duplicates_removed += 1;
        }
    }

    links
}

fn clean_requests(
    cleaner: &DataCleaner,
    rows: &[RawMaterialRequest],
    report: &mut NormalizeReport,
) -> Vec<MaterialRequest> {
    report.request_rows_in = rows.len();

    let mut requests = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(article_id) = cleaner.normalize_null(row.article_id.as_deref()) else {
            report.requests_dropped_no_article += 1;
            continue;
        };
        let Some(quantity) = cleaner.parse_decimal(row.quantity.as_deref()) else {
            report.requests_dropped_no_quantity += 1;
            continue;
        };

        requests.push(MaterialRequest {
            request_id: cleaner.normalize_null(row.request_id.as_deref()),
            article_id,
            quantity,
            requesting_unit: cleaner.normalize_null(row.requesting_unit.as_deref()),
        });
    }

    requests
}

// ==========================================
// 回写为原始行（幂等性校验使用）
// ==========================================

impl From<&Order> for RawOrder {
    fn from(order: &Order) -> Self {
        RawOrder {
            order_id: order.order_id.clone(),
            order_date: Some(order.order_date.format("%Y-%m-%d").to_string()),
            quantity: Some(order.quantity.to_string()),
            supplier_id: order.supplier_id.clone(),
            article_id: Some(order.article_id.clone()),
            article_label: order.article_label.clone(),
            purchase_type: order.purchase_type.clone(),
            order_amount: Some(order.order_amount.to_string()),
        }
    }
}

impl From<&Article> for RawArticle {
    fn from(article: &Article) -> Self {
        let num = |v: Option<f64>| v.map(|x| x.to_string());
        RawArticle {
            article_id: Some(article.article_id.clone()),
            designation: article.designation.clone(),
            family: article.family.clone(),
            purchase_type: article.purchase_type.clone(),
            prev_year_unit_price: num(article.prev_year_unit_price),
            current_year_unit_price: num(article.current_year_unit_price),
            last_purchase_unit_cost: num(article.last_purchase_unit_cost),
            stock_value: num(article.stock_value),
            stock_quantity: num(article.stock_quantity),
        }
    }
}

impl From<&SupplierArticleLink> for RawSupplierLink {
    fn from(link: &SupplierArticleLink) -> Self {
        RawSupplierLink {
            family: link.family.clone(),
            supplier_id: Some(link.supplier_id.clone()),
            article_id: Some(link.article_id.clone()),
        }
    }
}

impl From<&MaterialRequest> for RawMaterialRequest {
    fn from(request: &MaterialRequest) -> Self {
        RawMaterialRequest {
            request_id: request.request_id.clone(),
            article_id: Some(request.article_id.clone()),
            quantity: Some(request.quantity.to_string()),
            requesting_unit: request.requesting_unit.clone(),
        }
    }
}

impl CleanedTables {
    /// 转回原始行形式
    pub fn to_raw(&self) -> RawDataset {
        RawDataset {
            orders: self.orders.iter().map(RawOrder::from).collect(),
            articles: self.articles.iter().map(RawArticle::from).collect(),
            supplier_links: self.supplier_links.iter().map(RawSupplierLink::from).collect(),
            requests: self.requests.iter().map(RawMaterialRequest::from).collect(),
        }
    }
}
