// ==========================================
// 采购分析系统 - 配置管理器
// ==========================================
// 职责: 从 config_kv 表加载分析参数覆写
// 存储: config_kv(scope_id, key, value)，仅读取 scope_id='global'
// 降级: 表不存在/键不存在 → 默认值；值非法 → 告警并忽略
// ==========================================

use crate::config::analysis_config::AnalysisConfig;
use crate::db::{open_sqlite_connection, table_exists};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const CACHE_TTL_SECS: &str = "analysis.cache_ttl_secs";
    pub const TOP_N: &str = "analysis.top_n";
    pub const SUPPLIER_TOP_N: &str = "analysis.supplier_top_n";
    pub const VOLATILITY_TOP_N: &str = "analysis.volatility_top_n";
}

const CONFIG_TABLE: &str = "config_kv";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的全部配置
    ///
    /// # 返回
    /// - 表不存在时返回空 Map
    pub fn load_global_values(&self) -> RepositoryResult<HashMap<String, String>> {
        let conn = self.get_conn()?;

        if !table_exists(&conn, CONFIG_TABLE)? {
            debug!("config_kv 表不存在，使用默认分析参数");
            return Ok(HashMap::new());
        }

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut values = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            values.insert(key, value);
        }
        Ok(values)
    }

    /// 读取单个 global 配置值
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        if !table_exists(&conn, CONFIG_TABLE)? {
            return Ok(None);
        }

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 加载分析参数（默认值 + config_kv 覆写）
    pub fn load_analysis_config(&self) -> RepositoryResult<AnalysisConfig> {
        let values = self.load_global_values()?;
        Ok(Self::apply_overrides(AnalysisConfig::default(), &values))
    }

    /// 从 JSON 快照加载分析参数
    ///
    /// # 参数
    /// - snapshot_json: {"analysis.top_n": "20", ...}，值可为字符串或数字
    pub fn from_json_snapshot(snapshot_json: &str) -> RepositoryResult<AnalysisConfig> {
        let raw: HashMap<String, serde_json::Value> = serde_json::from_str(snapshot_json)
            .map_err(|e| RepositoryError::ValidationError(format!("配置快照解析失败: {}", e)))?;

        let values: HashMap<String, String> = raw
            .into_iter()
            .map(|(k, v)| {
                let text = match v {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, text)
            })
            .collect();

        Ok(Self::apply_overrides(AnalysisConfig::default(), &values))
    }

    fn apply_overrides(mut config: AnalysisConfig, values: &HashMap<String, String>) -> AnalysisConfig {
        if let Some(v) = parse_override::<u64>(values, config_keys::CACHE_TTL_SECS) {
            config.cache_ttl_secs = v;
        }
        if let Some(v) = parse_override::<usize>(values, config_keys::TOP_N) {
            config.top_n = v;
        }
        if let Some(v) = parse_override::<usize>(values, config_keys::SUPPLIER_TOP_N) {
            config.supplier_top_n = v;
        }
        if let Some(v) = parse_override::<usize>(values, config_keys::VOLATILITY_TOP_N) {
            config.volatility_top_n = v;
        }
        config
    }
}

fn parse_override<T: FromStr>(values: &HashMap<String, String>, key: &str) -> Option<T> {
    let raw = values.get(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key = key, value = %raw, "配置值非法，已忽略");
            None
        }
    }
}
