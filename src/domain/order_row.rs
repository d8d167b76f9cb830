// ==========================================
// 线缆车间生产报工 - 订单行领域模型
// ==========================================
// 对应列表: Subproductionplan（子生产计划）
// 用途: 数据源写入，引擎只读；同一次报工内不可变
// ==========================================

use crate::domain::number::{lenient_text, parse_number, parse_or_zero};
use serde::{Deserialize, Serialize};

// ==========================================
// OrderRow - 子生产计划行
// ==========================================
// 字段保持原始文本，数值语义通过访问器解析
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    // ===== 主键 =====
    #[serde(rename = "shomareradiffactor", alias = "row_key", default)]
    pub row_key: Option<String>, // 发票行号（订单行唯一标识）

    // ===== 分摊输入 =====
    #[serde(
        rename = "meghdarkolesefaresh",
        alias = "order_quantity",
        default,
        deserialize_with = "lenient_text"
    )]
    pub order_quantity: Option<String>, // 订单总量（分摊上限）

    #[serde(rename = "Priority", alias = "priority", default, deserialize_with = "lenient_text")]
    pub priority: Option<String>, // 优先级（空 = 最低）

    // ===== BOM 匹配 =====
    #[serde(rename = "tarhetolid", alias = "design_code", default, deserialize_with = "lenient_text")]
    pub design_code: Option<String>, // 生产设计代码（匹配物料 Title）

    #[serde(
        rename = "shomaremarhale",
        alias = "stage_descriptor",
        default,
        deserialize_with = "lenient_text"
    )]
    pub stage_descriptor: Option<String>, // 工序号（单值或 ";" 分隔列表）

    // ===== 展示/提交字段 =====
    #[serde(rename = "codemahsol", alias = "product_code", default)]
    pub product_code: Option<String>, // 产品代码

    #[serde(rename = "mahsoletolidi", alias = "product_name", default)]
    pub product_name: Option<String>, // 产品名称

    #[serde(rename = "namemoshtari", alias = "customer", default)]
    pub customer: Option<String>, // 客户

    #[serde(rename = "shomarebarnamerizi", alias = "plan_number", default)]
    pub plan_number: Option<String>, // 计划号
}

impl OrderRow {
    /// 订单行主键（空串视为缺失）
    pub fn row_key(&self) -> Option<&str> {
        non_blank(self.row_key.as_deref())
    }

    /// 订单量数值（缺失/无法解析 → 0）
    pub fn order_quantity_value(&self) -> f64 {
        parse_or_zero(self.order_quantity.as_deref())
    }

    /// 优先级数值（缺失/无法解析 → None）
    pub fn priority_value(&self) -> Option<f64> {
        self.priority.as_deref().map(str::trim).and_then(parse_number)
    }

    /// 优先级原文（去空白，缺失为空串）
    pub fn priority_text(&self) -> String {
        self.priority
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }

    pub fn design_code(&self) -> Option<&str> {
        non_blank(self.design_code.as_deref())
    }

    pub fn stage_descriptor(&self) -> Option<&str> {
        self.stage_descriptor.as_deref()
    }

    pub fn product_code(&self) -> Option<&str> {
        non_blank(self.product_code.as_deref())
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_fallbacks() {
        let row = OrderRow {
            row_key: Some("".to_string()),
            order_quantity: Some("abc".to_string()),
            priority: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(row.row_key(), None);
        assert_eq!(row.order_quantity_value(), 0.0);
        assert_eq!(row.priority_value(), None);
        assert_eq!(row.priority_text(), "");
    }

    #[test]
    fn test_accessors_values() {
        let row = OrderRow {
            row_key: Some("1402-15".to_string()),
            order_quantity: Some("250".to_string()),
            priority: Some(" 2 ".to_string()),
            ..Default::default()
        };
        assert_eq!(row.row_key(), Some("1402-15"));
        assert_eq!(row.order_quantity_value(), 250.0);
        assert_eq!(row.priority_value(), Some(2.0));
        assert_eq!(row.priority_text(), "2");
    }

    #[test]
    fn test_deserialize_list_payload() {
        let json = r#"{
            "shomareradiffactor": "A-1",
            "meghdarkolesefaresh": 120,
            "Priority": "1",
            "tarhetolid": "5012",
            "shomaremarhale": "1;2;3",
            "codemahsol": "NYY 3x2.5",
            "namemoshtari": "Pars"
        }"#;
        let row: OrderRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.row_key(), Some("A-1"));
        assert_eq!(row.order_quantity_value(), 120.0);
        assert_eq!(row.priority_value(), Some(1.0));
        assert_eq!(row.design_code(), Some("5012"));
        assert_eq!(row.stage_descriptor(), Some("1;2;3"));
    }
}
