// ==========================================
// 线缆车间生产报工 - 领域模型层
// ==========================================
// 职责: 定义订单行、物料定额、卡片、报工单与表单状态
// 红线: 不含数据访问逻辑，不含引擎逻辑
// ==========================================

pub mod form;
pub mod material;
pub mod number;
pub mod order_row;
pub mod plan;
pub mod report;
pub mod types;

// 重导出核心类型
pub use form::FormState;
pub use material::{MaterialPerStage, ProductSpec};
pub use number::{format_fixed2, parse_number, parse_or_zero, round2};
pub use order_row::OrderRow;
pub use plan::PlanDetail;
pub use report::{ProductionReport, ProductionReportRow, ReelDirection, ReelEntry, ShiftInfo, StopInfo};
pub use types::{CopperKind, ProductionField};
