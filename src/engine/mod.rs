// ==========================================
// 线缆车间生产报工 - 引擎层
// ==========================================
// 职责: 订单量过滤、优先级排序、分摊、BOM 计算、提交组装
// 红线: 引擎不访问存储，纯同步计算，异常输入退化为 0/空结果
// ==========================================

pub mod allocation;
pub mod bom;
pub mod material_filter;
pub mod orchestrator;
pub mod plan_detail;
pub mod priority;
pub mod quantity_filter;
pub mod rules;
pub mod stage;
pub mod submission;

// 重导出核心引擎
pub use allocation::{AllocationEngine, AllocationResult};
pub use bom::{
    actual_consumption, card_consumption_per_string, consumption_per_string, copper_split,
    material_weight_kg, planned_bom_consumption, total_bom_weight, CopperSplit,
};
pub use material_filter::filter_materials_by_stage;
pub use orchestrator::{EntryPreview, ProductionEntryService, Submission};
pub use plan_detail::{filter_plan_details, unique_colors, unique_design_codes, unique_stages};
pub use priority::PrioritySorter;
pub use quantity_filter::{filter_by_min_quantity, QuantityFilter};
pub use rules::EntryRules;
pub use stage::max_stage;
pub use submission::{
    reset_keys, resolve_actual_consumption, resolve_actual_production, resolve_waste,
    ReportHeaderInput, SubmissionBuilder,
};
