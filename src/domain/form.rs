// ==========================================
// 线缆车间生产报工 - 表单状态
// ==========================================
// 职责: 显式的键值存储，承载操作员输入与引擎写回值
// 键格式: 表头字段名（如 "waste"）或 "<行号>.<字段>"
// ==========================================

use crate::domain::types::ProductionField;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// 表头字段
pub const FIELD_ACTUAL_AMOUNT_PRODUCTION: &str = "actualAmountProduction";
pub const FIELD_ACTUAL_WEIGHT: &str = "actualWeight";
pub const FIELD_WASTE: &str = "waste";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_STOP_TIME: &str = "stopTime";
// 计量单位；仅用于铜料拆分预览，提交后保留
pub const FIELD_PRODUCTION_UNIT: &str = "productionUnit";

pub const HEADER_FIELDS: [&str; 5] = [
    FIELD_ACTUAL_AMOUNT_PRODUCTION,
    FIELD_ACTUAL_WEIGHT,
    FIELD_WASTE,
    FIELD_DESCRIPTION,
    FIELD_STOP_TIME,
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState {
    values: BTreeMap<String, String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 原始值（可能为空串）
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// 有效值: 空串视为未填写
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// 订单行字段的有效值
    pub fn row_value(&self, row_key: &str, field: ProductionField) -> Option<&str> {
        self.value(&field.key_for(row_key))
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// 批量写回（引擎计算结果）
    pub fn apply<I>(&mut self, updates: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in updates {
            self.values.insert(key, value);
        }
    }

    /// 清空指定键（置为空串，保留键）
    pub fn clear_keys<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            self.values.insert(key.into(), String::new());
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for FormState {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
