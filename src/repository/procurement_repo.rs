// ==========================================
// 采购分析系统 - SQLite 采购数据仓储
// ==========================================
// 职责: 只读访问 orders / articles / supplier_links / material_requests
// 红线: Repository 不含业务逻辑，列值一律按文本读出，由清洗阶段解析
// ==========================================

use crate::db::{open_sqlite_connection, table_exists};
use crate::domain::{RawArticle, RawMaterialRequest, RawOrder, RawSupplierLink};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::source::ProcurementSource;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Row};
use std::sync::{Arc, Mutex};

pub const ORDERS_TABLE: &str = "orders";
pub const ARTICLES_TABLE: &str = "articles";
pub const SUPPLIER_LINKS_TABLE: &str = "supplier_links";
pub const REQUESTS_TABLE: &str = "material_requests";

// ==========================================
// SqliteProcurementRepository
// ==========================================
pub struct SqliteProcurementRepository {
    conn: Arc<Mutex<Connection>>,
    db_path: String,
}

impl SqliteProcurementRepository {
    /// 创建新的仓储实例（只读连接）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Err(DatabaseConnectionError): 文件不存在或不是 SQLite 库
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path).map_err(|e| {
            RepositoryError::DatabaseConnectionError(format!("{}: {}", db_path, e))
        })?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: db_path.to_string(),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            db_path: ":shared:".to_string(),
        }
    }

    /// 共享连接（供 ConfigManager 复用）
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取整表，逐行映射
    fn load_table<T>(
        &self,
        table: &str,
        columns: &[&str],
        map_row: impl Fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> RepositoryResult<Vec<T>> {
        let conn = self.get_conn()?;

        if !table_exists(&conn, table)? {
            return Err(RepositoryError::MissingTable {
                table: table.to_string(),
            });
        }

        let sql = format!("SELECT {} FROM {} ORDER BY rowid", columns.join(", "), table);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| map_row(row))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

/// 按动态类型读取列值并转为文本
///
/// NULL → None；INTEGER/REAL → 十进制文本；TEXT/BLOB → UTF-8（有损）
fn text_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    let value = match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    };
    Ok(value)
}

impl ProcurementSource for SqliteProcurementRepository {
    fn describe(&self) -> String {
        format!("sqlite:{}", self.db_path)
    }

    fn load_orders(&self) -> RepositoryResult<Vec<RawOrder>> {
        self.load_table(
            ORDERS_TABLE,
            &[
                "order_id",
                "order_date",
                "quantity",
                "supplier_id",
                "article_id",
                "article_label",
                "purchase_type",
                "order_amount",
            ],
            |row| {
                Ok(RawOrder {
                    order_id: text_at(row, 0)?,
                    order_date: text_at(row, 1)?,
                    quantity: text_at(row, 2)?,
                    supplier_id: text_at(row, 3)?,
                    article_id: text_at(row, 4)?,
                    article_label: text_at(row, 5)?,
                    purchase_type: text_at(row, 6)?,
                    order_amount: text_at(row, 7)?,
                })
            },
        )
    }

    fn load_articles(&self) -> RepositoryResult<Vec<RawArticle>> {
        self.load_table(
            ARTICLES_TABLE,
            &[
                "article_id",
                "designation",
                "family",
                "purchase_type",
                "prev_year_unit_price",
                "current_year_unit_price",
                "last_purchase_unit_cost",
                "stock_value",
                "stock_quantity",
            ],
            |row| {
                Ok(RawArticle {
                    article_id: text_at(row, 0)?,
                    designation: text_at(row, 1)?,
                    family: text_at(row, 2)?,
                    purchase_type: text_at(row, 3)?,
                    prev_year_unit_price: text_at(row, 4)?,
                    current_year_unit_price: text_at(row, 5)?,
                    last_purchase_unit_cost: text_at(row, 6)?,
                    stock_value: text_at(row, 7)?,
                    stock_quantity: text_at(row, 8)?,
                })
            },
        )
    }

    fn load_supplier_links(&self) -> RepositoryResult<Vec<RawSupplierLink>> {
        self.load_table(
            SUPPLIER_LINKS_TABLE,
            &["family", "supplier_id", "article_id"],
            |row| {
                Ok(RawSupplierLink {
                    family: text_at(row, 0)?,
                    supplier_id: text_at(row, 1)?,
                    article_id: text_at(row, 2)?,
                })
            },
        )
    }

    fn load_requests(&self) -> RepositoryResult<Vec<RawMaterialRequest>> {
        self.load_table(
            REQUESTS_TABLE,
            &["request_id", "article_id", "quantity", "requesting_unit"],
            |row| {
                Ok(RawMaterialRequest {
                    request_id: text_at(row, 0)?,
                    article_id: text_at(row, 1)?,
                    quantity: text_at(row, 2)?,
                    requesting_unit: text_at(row, 3)?,
                })
            },
        )
    }
}
