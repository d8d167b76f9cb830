// ==========================================
// 线缆车间生产报工 - 配置管理 API
// ==========================================
// 职责: 配置查询、更新、快照管理
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::{config_keys, ConfigManager};
use crate::config::entry_config_trait::EntryConfigReader;
use crate::engine::rules::EntryRules;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// 配置项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub key: String,
    pub value: Option<String>, // None: 未设置，使用默认值
}

// ==========================================
// ConfigApi - 配置管理 API
// ==========================================
pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 查询全部已知配置项
    pub fn list_configs(&self) -> ApiResult<Vec<ConfigItem>> {
        config_keys::ALL
            .iter()
            .map(|key| self.get_config(key))
            .collect()
    }

    /// 查询单个配置
    pub fn get_config(&self, key: &str) -> ApiResult<ConfigItem> {
        let value = self
            .config_manager
            .get_global_config_value(key)
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        Ok(ConfigItem {
            key: key.to_string(),
            value,
        })
    }

    /// 更新配置
    ///
    /// 仅接受已知配置键；数值键必须可解析
    pub fn update_config(&self, key: &str, value: &str) -> ApiResult<()> {
        let key = key.trim();
        validate_config_value(key, value)?;

        self.config_manager
            .set_global_config_value(key, value.trim())
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        info!(config_key = key, "配置更新完成");
        Ok(())
    }

    /// 当前生效的引擎参数
    pub fn effective_rules(&self) -> ApiResult<EntryRules> {
        self.config_manager
            .load_rules()
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    /// 导出配置快照（JSON）
    pub fn get_config_snapshot(&self) -> ApiResult<String> {
        self.config_manager
            .get_config_snapshot()
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    /// 从快照恢复配置
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ApiResult<usize> {
        self.config_manager
            .restore_config_from_snapshot(snapshot_json)
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }
}

fn validate_config_value(key: &str, value: &str) -> ApiResult<()> {
    let value = value.trim();
    let valid = match key {
        config_keys::MIN_ORDER_QUANTITY => value.parse::<f64>().map(|v| v >= 0.0).unwrap_or(false),
        config_keys::UNIT_NORMALIZE_THRESHOLD => {
            value.parse::<f64>().map(|v| v > 0.0).unwrap_or(false)
        }
        config_keys::PRE_INVOICE_MAX_LEN => value.parse::<usize>().map(|v| v > 0).unwrap_or(false),
        config_keys::METRE_UNIT_LABEL => !value.is_empty(),
        _ => return Err(ApiError::InvalidInput(format!("未知配置键: {}", key))),
    };

    if valid {
        Ok(())
    } else {
        Err(ApiError::InvalidInput(format!(
            "配置值无效: {}={}",
            key, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use std::sync::Mutex;

    fn create_test_api() -> ConfigApi {
        let conn = Connection::open_in_memory().unwrap();
        let manager = ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap();
        ConfigApi::new(Arc::new(manager))
    }

    #[test]
    fn test_update_and_effective_rules() {
        let api = create_test_api();
        api.update_config(config_keys::MIN_ORDER_QUANTITY, "0").unwrap();

        let rules = api.effective_rules().unwrap();
        assert_eq!(rules.min_order_quantity, 0.0);

        let items = api.list_configs().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(
            items
                .iter()
                .find(|i| i.key == config_keys::MIN_ORDER_QUANTITY)
                .and_then(|i| i.value.as_deref()),
            Some("0")
        );
    }

    #[test]
    fn test_invalid_updates_rejected() {
        let api = create_test_api();
        assert!(api.update_config("unknown_key", "1").is_err());
        assert!(api.update_config(config_keys::PRE_INVOICE_MAX_LEN, "-1").is_err());
        assert!(api.update_config(config_keys::UNIT_NORMALIZE_THRESHOLD, "0").is_err());
        assert!(api.get_config(config_keys::PRE_INVOICE_MAX_LEN).unwrap().value.is_none());
    }
}
