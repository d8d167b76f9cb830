// ==========================================
// 线缆车间生产报工 - 核心库
// ==========================================
// 职责: 产量/废料分摊、工序物料过滤、BOM 耗料计算、报工提交
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CopperKind, ProductionField};

// 领域实体
pub use domain::{
    FormState, MaterialPerStage, OrderRow, PlanDetail, ProductSpec, ProductionReport,
    ProductionReportRow,
};

// 引擎
pub use engine::{
    AllocationEngine, AllocationResult, EntryPreview, EntryRules, PrioritySorter,
    ProductionEntryService, QuantityFilter,
};

// API
pub use api::{ApiError, ApiResult, ConfigApi, ProductionEntryApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "线缆车间生产报工";
