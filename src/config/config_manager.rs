// ==========================================
// 线缆车间生产报工 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::entry_config_trait::EntryConfigReader;
use crate::db::open_sqlite_connection;
use crate::engine::rules::{
    DEFAULT_METRE_UNIT_LABEL, DEFAULT_PRE_INVOICE_MAX_LEN, DEFAULT_UNIT_NORMALIZE_THRESHOLD,
};
use crate::engine::quantity_filter::DEFAULT_MIN_ORDER_QUANTITY;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

const GLOBAL_SCOPE: &str = "global";

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
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        let manager = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        manager.ensure_table()?;
        Ok(manager)
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        let manager = Self { conn };
        manager.ensure_table()?;
        Ok(manager)
    }

    fn ensure_table(&self) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS config_kv (
                scope_id TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (scope_id, key)
            );
            "#,
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let key = key.trim();
        if key.is_empty() {
            return Err("配置键不能为空".into());
        }

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;

        info!(config_key = key, value, "配置已更新");
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 读取数值配置；格式错误时告警并回退默认值
    fn get_f64_or_default(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
        let value = self.get_config_or_default(key, &default.to_string())?;
        match value.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => {
                warn!(config_key = key, raw_value = %value, "配置格式错误，使用默认值");
                Ok(default)
            }
        }
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 此方法会覆盖同名的 global 配置，快照之外的键保持不变
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, Box<dyn Error>> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
                params![GLOBAL_SCOPE, key, value],
            )?;
        }

        tx.commit()?;
        info!(count, "配置快照已恢复");
        Ok(count)
    }
}

// ==========================================
// EntryConfigReader Trait 实现
// ==========================================
impl EntryConfigReader for ConfigManager {
    fn get_min_order_quantity(&self) -> Result<f64, Box<dyn Error>> {
        self.get_f64_or_default(config_keys::MIN_ORDER_QUANTITY, DEFAULT_MIN_ORDER_QUANTITY)
    }

    fn get_unit_normalize_threshold(&self) -> Result<f64, Box<dyn Error>> {
        self.get_f64_or_default(
            config_keys::UNIT_NORMALIZE_THRESHOLD,
            DEFAULT_UNIT_NORMALIZE_THRESHOLD,
        )
    }

    fn get_pre_invoice_max_len(&self) -> Result<usize, Box<dyn Error>> {
        let value = self.get_config_or_default(
            config_keys::PRE_INVOICE_MAX_LEN,
            &DEFAULT_PRE_INVOICE_MAX_LEN.to_string(),
        )?;
        Ok(value
            .trim()
            .parse::<usize>()
            .unwrap_or(DEFAULT_PRE_INVOICE_MAX_LEN))
    }

    fn get_metre_unit_label(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::METRE_UNIT_LABEL, DEFAULT_METRE_UNIT_LABEL)?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Ok(DEFAULT_METRE_UNIT_LABEL.to_string())
        } else {
            Ok(trimmed.to_string())
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 分摊
    pub const MIN_ORDER_QUANTITY: &str = "min_order_quantity";

    // 单位折算
    pub const UNIT_NORMALIZE_THRESHOLD: &str = "unit_normalize_threshold";
    pub const METRE_UNIT_LABEL: &str = "metre_unit_label";

    // 提交
    pub const PRE_INVOICE_MAX_LEN: &str = "pre_invoice_max_len";

    pub const ALL: [&str; 4] = [
        MIN_ORDER_QUANTITY,
        UNIT_NORMALIZE_THRESHOLD,
        METRE_UNIT_LABEL,
        PRE_INVOICE_MAX_LEN,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rules::EntryRules;

    fn create_test_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_table_empty() {
        let manager = create_test_manager();
        assert_eq!(manager.load_rules().unwrap(), EntryRules::default());
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let manager = create_test_manager();
        manager
            .set_global_config_value(config_keys::MIN_ORDER_QUANTITY, "25")
            .unwrap();
        manager
            .set_global_config_value(config_keys::UNIT_NORMALIZE_THRESHOLD, "not-a-number")
            .unwrap();

        let rules = manager.load_rules().unwrap();
        assert_eq!(rules.min_order_quantity, 25.0);
        assert_eq!(rules.unit_normalize_threshold, 1000.0);
    }

    #[test]
    fn test_snapshot_and_restore() {
        let manager = create_test_manager();
        manager
            .set_global_config_value(config_keys::PRE_INVOICE_MAX_LEN, "100")
            .unwrap();
        let snapshot = manager.get_config_snapshot().unwrap();

        manager
            .set_global_config_value(config_keys::PRE_INVOICE_MAX_LEN, "5")
            .unwrap();
        assert_eq!(manager.get_pre_invoice_max_len().unwrap(), 5);

        let restored = manager.restore_config_from_snapshot(&snapshot).unwrap();
        assert_eq!(restored, 1);
        assert_eq!(manager.get_pre_invoice_max_len().unwrap(), 100);
    }

    #[test]
    fn test_empty_key_rejected() {
        let manager = create_test_manager();
        assert!(manager.set_global_config_value("  ", "1").is_err());
    }
}
