// ==========================================
// 线缆车间生产报工 - 配置层
// ==========================================
// 职责: 引擎参数的持久化配置
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod entry_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use entry_config_trait::EntryConfigReader;
