// ==========================================
// 采购分析系统 - CSV 导出文件数据源
// ==========================================
// 目录约定: articles.csv / orders.csv / supplier_links.csv / material_requests.csv
// 说明: 只读适配器，按表头名取列，缺列视为空值
// ==========================================

use crate::domain::{RawArticle, RawMaterialRequest, RawOrder, RawSupplierLink};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::source::ProcurementSource;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ORDERS_FILE: &str = "orders.csv";
pub const ARTICLES_FILE: &str = "articles.csv";
pub const SUPPLIER_LINKS_FILE: &str = "supplier_links.csv";
pub const REQUESTS_FILE: &str = "material_requests.csv";

type CsvRow = HashMap<String, String>;

// ==========================================
// CsvProcurementSource
// ==========================================
pub struct CsvProcurementSource {
    dir: PathBuf,
    delimiter: u8,
}

impl CsvProcurementSource {
    /// # 参数
    /// - dir: 四个导出文件所在目录
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            delimiter: b',',
        }
    }

    /// 指定分隔符（部分导出使用 ';'）
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn read_rows(&self, file_name: &str) -> RepositoryResult<Vec<CsvRow>> {
        let path = self.dir.join(file_name);
        if !path.exists() {
            return Err(RepositoryError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let rows = read_csv_rows(&path, self.delimiter)?;
        debug!(file = %path.display(), rows = rows.len(), "CSV 读取完成");
        Ok(rows)
    }
}

/// 读取 CSV 为 表头 → 值 映射
///
/// 表头去空白与 BOM；完全空白的行跳过
fn read_csv_rows(path: &Path, delimiter: u8) -> RepositoryResult<Vec<CsvRow>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row = HashMap::new();
        for (col_idx, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                row.insert(header.clone(), value.to_string());
            }
        }

        if row.values().all(|v| v.trim().is_empty()) {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

/// 取列值，空串视为缺失
fn field(row: &CsvRow, column: &str) -> Option<String> {
    row.get(column)
        .filter(|v| !v.trim().is_empty())
        .cloned()
}

impl ProcurementSource for CsvProcurementSource {
    fn describe(&self) -> String {
        format!("csv:{}", self.dir.display())
    }

    fn load_orders(&self) -> RepositoryResult<Vec<RawOrder>> {
        Ok(self
            .read_rows(ORDERS_FILE)?
            .iter()
            .map(|row| RawOrder {
                order_id: field(row, "order_id"),
                order_date: field(row, "order_date"),
                quantity: field(row, "quantity"),
                supplier_id: field(row, "supplier_id"),
                article_id: field(row, "article_id"),
                article_label: field(row, "article_label"),
                purchase_type: field(row, "purchase_type"),
                order_amount: field(row, "order_amount"),
            })
            .collect())
    }

    fn load_articles(&self) -> RepositoryResult<Vec<RawArticle>> {
        Ok(self
            .read_rows(ARTICLES_FILE)?
            .iter()
            .map(|row| RawArticle {
                article_id: field(row, "article_id"),
                designation: field(row, "designation"),
                family: field(row, "family"),
                purchase_type: field(row, "purchase_type"),
                prev_year_unit_price: field(row, "prev_year_unit_price"),
                current_year_unit_price: field(row, "current_year_unit_price"),
                last_purchase_unit_cost: field(row, "last_purchase_unit_cost"),
                stock_value: field(row, "stock_value"),
                stock_quantity: field(row, "stock_quantity"),
            })
            .collect())
    }

    fn load_supplier_links(&self) -> RepositoryResult<Vec<RawSupplierLink>> {
        Ok(self
            .read_rows(SUPPLIER_LINKS_FILE)?
            .iter()
            .map(|row| RawSupplierLink {
                family: field(row, "family"),
                supplier_id: field(row, "supplier_id"),
                article_id: field(row, "article_id"),
            })
            .collect())
    }

    fn load_requests(&self) -> RepositoryResult<Vec<RawMaterialRequest>> {
        Ok(self
            .read_rows(REQUESTS_FILE)?
            .iter()
            .map(|row| RawMaterialRequest {
                request_id: field(row, "request_id"),
                article_id: field(row, "article_id"),
                quantity: field(row, "quantity"),
                requesting_unit: field(row, "requesting_unit"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_read_orders_by_header_name() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            ORDERS_FILE,
            "\u{feff}article_id, order_date ,quantity,order_amount,supplier_id\nA1,2023-02-14,5,100,S1\n,,,,\nA2,2023-03-01,3\n",
        );

        let source = CsvProcurementSource::new(dir.path());
        let orders = source.load_orders().unwrap();

        // 空白行被跳过
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].article_id.as_deref(), Some("A1"));
        assert_eq!(orders[0].order_date.as_deref(), Some("2023-02-14"));
        assert_eq!(orders[0].supplier_id.as_deref(), Some("S1"));
        // 缺列 → None
        assert_eq!(orders[0].order_id, None);
        assert_eq!(orders[1].order_amount, None);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            REQUESTS_FILE,
            "request_id;article_id;quantity\nR1;A1;12,5\n",
        );

        let source = CsvProcurementSource::new(dir.path()).with_delimiter(b';');
        let requests = source.load_requests().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].quantity.as_deref(), Some("12,5"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvProcurementSource::new(dir.path());
        assert!(matches!(
            source.load_articles(),
            Err(RepositoryError::FileNotFound { .. })
        ));
        assert!(source.load_dataset().is_err());
    }
}
