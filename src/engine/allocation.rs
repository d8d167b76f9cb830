// ==========================================
// 线缆车间生产报工 - 产量/废料分摊引擎
// ==========================================
// 职责: 将一个上报总量按优先级与订单量上限分摊到订单行
// 输入: 排序后订单行 + 总量文本
// 输出: AllocationResult（行号 → 两位小数文本）
// 红线: 无效总量不报错，返回空结果；废料复用同一规则
// ==========================================

use crate::domain::number::{format_fixed2, parse_number};
use crate::domain::order_row::OrderRow;
use crate::domain::types::ProductionField;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

// ==========================================
// AllocationResult - 分摊结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationResult {
    values: BTreeMap<String, String>,
}

impl AllocationResult {
    pub fn get(&self, row_key: &str) -> Option<&str> {
        self.values.get(row_key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 已分摊数值合计
    pub fn total(&self) -> f64 {
        self.values
            .values()
            .filter_map(|v| parse_number(v))
            .sum()
    }

    /// 转为表单写回项: ("<行号>.<字段>", 值)
    pub fn field_updates(&self, field: ProductionField) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(key, value)| (field.key_for(key), value.clone()))
            .collect()
    }

    fn set(&mut self, row_key: &str, value: String) {
        self.values.insert(row_key.to_string(), value);
    }
}

// ==========================================
// AllocationEngine - 分摊引擎
// ==========================================
pub struct AllocationEngine {
    // 无状态引擎,不需要注入依赖
}

impl AllocationEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 分摊总量
    ///
    /// 规则：
    /// 1) 总量无法解析、<= 0 或订单行为空 → 空结果
    /// 2) 所有有行号的订单行先置为 "0"
    /// 3) 没有任何有效优先级 → 总量 / 行数 平均分配（不受订单量上限约束）
    /// 4) 否则按优先级升序分组，组内保持出现顺序，
    ///    每行分配 min(订单量, 剩余量)，仅正值写入，剩余量 <= 0 即停止
    /// 5) 无行号的订单行跳过（平均分配时仍计入行数）
    ///
    /// # 参数
    /// - `sorted_rows`: 已按优先级排序的订单行
    /// - `total_text`: 上报总量（原始文本）
    /// - `field`: 分摊的字段（用于日志）
    #[instrument(skip(self, sorted_rows), fields(rows = sorted_rows.len(), field = %field))]
    pub fn allocate(
        &self,
        sorted_rows: &[OrderRow],
        total_text: &str,
        field: ProductionField,
    ) -> AllocationResult {
        let mut result = AllocationResult::default();

        let total = match parse_number(total_text) {
            Some(v) if v > 0.0 => v,
            _ => {
                debug!(total_text, "总量无效，跳过分摊");
                return result;
            }
        };
        if sorted_rows.is_empty() {
            return result;
        }

        for row in sorted_rows {
            if let Some(key) = row.row_key() {
                result.set(key, "0".to_string());
            }
        }

        let groups = group_by_priority(sorted_rows);

        if groups.is_empty() {
            let equal_value = format_fixed2(total / sorted_rows.len() as f64);
            for row in sorted_rows {
                if let Some(key) = row.row_key() {
                    result.set(key, equal_value.clone());
                }
            }
            debug!(equal_value = %equal_value, "无优先级，平均分配");
            return result;
        }

        let mut remaining = total;
        'groups: for (_, rows) in groups {
            for row in rows {
                if remaining <= 0.0 {
                    break 'groups;
                }
                let Some(key) = row.row_key() else {
                    continue;
                };

                let allocated = row.order_quantity_value().min(remaining);
                if allocated > 0.0 {
                    result.set(key, format_fixed2(allocated));
                    remaining -= allocated;
                }
            }
        }

        debug!(remaining, allocated_rows = result.len(), "按优先级分摊完成");
        result
    }
}

impl Default for AllocationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// 按优先级数值分组（升序），组内保持出现顺序
fn group_by_priority(rows: &[OrderRow]) -> Vec<(f64, Vec<&OrderRow>)> {
    let mut groups: Vec<(f64, Vec<&OrderRow>)> = Vec::new();

    for row in rows {
        let Some(priority) = row.priority_value() else {
            continue;
        };
        // 负零归一
        let priority = priority + 0.0;
        match groups.iter_mut().find(|(p, _)| *p == priority) {
            Some((_, members)) => members.push(row),
            None => groups.push((priority, vec![row])),
        }
    }

    groups.sort_by(|a, b| a.0.total_cmp(&b.0));
    groups
}
