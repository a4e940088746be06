// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时采购库初始化、夹具数据写入
// ==========================================

#![allow(dead_code)]

use rusqlite::{params, Connection};
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = Connection::open(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 创建临时测试数据库并写入示例数据
pub fn create_seeded_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let (temp_file, db_path) = create_test_db()?;
    let conn = Connection::open(&db_path)?;
    seed_sample_data(&conn)?;
    Ok((temp_file, db_path))
}

/// 初始化数据库 schema（上游 ETL 建表的最小复刻）
fn init_schema(conn: &Connection) -> Result<(), Box<dyn Error>> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            order_id TEXT,
            order_date TEXT,
            quantity REAL,
            supplier_id TEXT,
            article_id TEXT,
            article_label TEXT,
            purchase_type TEXT,
            order_amount REAL
        );

        CREATE TABLE IF NOT EXISTS articles (
            article_id TEXT,
            designation TEXT,
            family TEXT,
            purchase_type TEXT,
            prev_year_unit_price REAL,
            current_year_unit_price REAL,
            last_purchase_unit_cost REAL,
            stock_value REAL,
            stock_quantity REAL
        );

        CREATE TABLE IF NOT EXISTS supplier_links (
            family TEXT,
            supplier_id TEXT,
            article_id TEXT
        );

        CREATE TABLE IF NOT EXISTS material_requests (
            request_id TEXT,
            article_id TEXT,
            quantity REAL,
            requesting_unit TEXT
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )?;
    Ok(())
}

/// 写入一条订单（文本列按原样写入，便于构造脏数据）
pub fn insert_order(
    conn: &Connection,
    order_id: &str,
    order_date: &str,
    quantity: &str,
    supplier_id: &str,
    article_id: &str,
    order_amount: &str,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO orders (order_id, order_date, quantity, supplier_id, article_id, order_amount)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![order_id, order_date, quantity, supplier_id, article_id, order_amount],
    )?;
    Ok(())
}

pub fn insert_article(
    conn: &Connection,
    article_id: &str,
    designation: &str,
    family: &str,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO articles (article_id, designation, family) VALUES (?1, ?2, ?3)",
        params![article_id, designation, family],
    )?;
    Ok(())
}

pub fn insert_supplier_link(
    conn: &Connection,
    family: &str,
    supplier_id: &str,
    article_id: &str,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO supplier_links (family, supplier_id, article_id) VALUES (?1, ?2, ?3)",
        params![family, supplier_id, article_id],
    )?;
    Ok(())
}

pub fn insert_request(
    conn: &Connection,
    request_id: &str,
    article_id: &str,
    quantity: f64,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO material_requests (request_id, article_id, quantity, requesting_unit)
         VALUES (?1, ?2, ?3, 'ATELIER')",
        params![request_id, article_id, quantity],
    )?;
    Ok(())
}

pub fn set_config(conn: &Connection, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
         ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
        params![key, value],
    )?;
    Ok(())
}

/// 示例数据
///
/// - A1: 2023-01 S1 5件/100，2023-02 S2 3件/60，需求 6
/// - A2: 2022-06 S1 10件/40，需求 40
/// - A3: 目录中存在但从未订购
/// - 脏数据: 重复订单 1 行、金额缺失 1 行、无物料号 1 行
pub fn seed_sample_data(conn: &Connection) -> Result<(), Box<dyn Error>> {
    insert_article(conn, "A1", "Boulon", "QUINCAILLERIE")?;
    insert_article(conn, "A2", "Rail", "VOIE")?;
    insert_article(conn, "A3", "Traverse", "VOIE")?;

    insert_order(conn, "1", "2023-01-15", "5", "S1", "A1", "100")?;
    insert_order(conn, "2", "2023-02-15", "3", "S2", " A1 ", "60")?;
    insert_order(conn, "3", "15/06/2022", "10", "S1", "A2", "40,0")?;
    insert_order(conn, "1", "2023-01-15", "5", "S1", "A1", "100")?;
    insert_order(conn, "4", "2023-03-01", "1", "S1", "A1", "NaN")?;
    insert_order(conn, "5", "2023-03-01", "1", "S1", "", "10")?;

    insert_supplier_link(conn, "QUINCAILLERIE", "S1", "A1")?;
    insert_supplier_link(conn, "QUINCAILLERIE", "S2", "A1")?;
    insert_supplier_link(conn, "VOIE", "S1", "A2")?;

    insert_request(conn, "D1", "A1", 6.0)?;
    insert_request(conn, "D2", "A2", 40.0)?;
    Ok(())
}
