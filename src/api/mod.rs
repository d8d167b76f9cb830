// ==========================================
// 线缆车间生产报工 - API层
// ==========================================
// 职责: 输入校验、错误转换、串联导入/引擎/仓储
// ==========================================

pub mod config_api;
pub mod error;
pub mod production_entry_api;

// 重导出核心API
pub use config_api::{ConfigApi, ConfigItem};
pub use error::{ApiError, ApiResult};
pub use production_entry_api::{
    EntryData, EntrySources, ProductionEntryApi, ReportDetail, SubmitResponse,
};
