// ==========================================
// 线缆车间生产报工 - 引擎参数
// ==========================================
// 职责: 引擎可调参数的值对象（由 ConfigManager 装配）
// ==========================================

use crate::engine::quantity_filter::DEFAULT_MIN_ORDER_QUANTITY;
use serde::{Deserialize, Serialize};

pub const DEFAULT_UNIT_NORMALIZE_THRESHOLD: f64 = 1000.0;
pub const DEFAULT_PRE_INVOICE_MAX_LEN: usize = 65536;
pub const DEFAULT_METRE_UNIT_LABEL: &str = "متر";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRules {
    pub min_order_quantity: f64,       // 参与分摊的最小订单量
    pub unit_normalize_threshold: f64, // 超过该值的废料/耗料视为克，折算为 kg
    pub pre_invoice_max_len: usize,    // 订单行号汇总的最大长度（字符）
    pub metre_unit_label: String,      // 米制计量单位标签
}

impl Default for EntryRules {
    fn default() -> Self {
        Self {
            min_order_quantity: DEFAULT_MIN_ORDER_QUANTITY,
            unit_normalize_threshold: DEFAULT_UNIT_NORMALIZE_THRESHOLD,
            pre_invoice_max_len: DEFAULT_PRE_INVOICE_MAX_LEN,
            metre_unit_label: DEFAULT_METRE_UNIT_LABEL.to_string(),
        }
    }
}
