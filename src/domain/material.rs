// ==========================================
// 线缆车间生产报工 - 物料/BOM 领域模型
// ==========================================
// 对应列表: ProductMaterialPerStage（分工序物料定额）、Products（产品主数据）
// 用途: 数据源写入，引擎只读
// ==========================================

use crate::domain::number::{lenient_f64, lenient_text, parse_number};
use serde::{Deserialize, Serialize};

// ==========================================
// MaterialPerStage - 分工序物料定额（BOM 条目）
// ==========================================
// 红线: per_unit_consumption 单位为 克/单位产量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialPerStage {
    #[serde(rename = "Title", alias = "title", default)]
    pub title: Option<String>, // 标题（包含设计代码，用于子串匹配）

    #[serde(rename = "materialname", alias = "material_name", default)]
    pub material_name: Option<String>, // 物料名称（CU/TICU/…）

    #[serde(
        rename = "vahed",
        alias = "per_unit_consumption",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub per_unit_consumption: f64, // 单耗（克）

    #[serde(rename = "marhale", alias = "stage_descriptor", default, deserialize_with = "lenient_text")]
    pub stage_descriptor: Option<String>, // 适用工序（单值或 ";" 分隔列表）

    #[serde(rename = "faal", alias = "active", default = "default_active")]
    pub active: bool, // 是否启用（由数据源过滤，核心不使用）
}

fn default_active() -> bool {
    true
}

impl MaterialPerStage {
    pub fn new(title: &str, material_name: &str, per_unit_consumption: f64, stage: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            material_name: Some(material_name.to_string()),
            per_unit_consumption,
            stage_descriptor: Some(stage.to_string()),
            active: true,
        }
    }

    /// Title 是否包含指定设计代码（区分大小写的子串匹配）
    pub fn title_contains(&self, design_code: &str) -> bool {
        self.title
            .as_deref()
            .map(|t| t.contains(design_code))
            .unwrap_or(false)
    }
}

// ==========================================
// ProductSpec - 产品主数据（节选）
// ==========================================
// 仅保留计算每股耗料需要的字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSpec {
    #[serde(default, deserialize_with = "lenient_text")]
    pub code: Option<String>, // 产品编码（与设计代码数值相等即匹配）

    #[serde(rename = "String", alias = "string_count", default, deserialize_with = "lenient_text")]
    pub string_count: Option<String>, // 股数
}

impl ProductSpec {
    pub fn code_value(&self) -> Option<f64> {
        self.code.as_deref().and_then(parse_number)
    }

    /// 股数（仅正数有效）
    pub fn string_count_value(&self) -> Option<f64> {
        self.string_count
            .as_deref()
            .and_then(parse_number)
            .filter(|v| *v > 0.0)
    }

    /// 设计代码是否指向本产品（按数值比较）
    pub fn matches_design_code(&self, design_code: &str) -> bool {
        match (parse_number(design_code), self.code_value()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_material_numeric_stage() {
        let json = r#"{"Title":"5012-A","materialname":"CU","vahed":"500","marhale":2,"faal":true}"#;
        let m: MaterialPerStage = serde_json::from_str(json).unwrap();
        assert_eq!(m.per_unit_consumption, 500.0);
        assert_eq!(m.stage_descriptor.as_deref(), Some("2"));
        assert!(m.title_contains("5012"));
        assert!(!m.title_contains("5013"));
    }

    #[test]
    fn test_material_active_defaults_true() {
        let json = r#"{"Title":"X","vahed":1.5}"#;
        let m: MaterialPerStage = serde_json::from_str(json).unwrap();
        assert!(m.active);
        assert_eq!(m.stage_descriptor, None);
    }

    #[test]
    fn test_product_spec_matching() {
        let p = ProductSpec {
            code: Some("5012".to_string()),
            string_count: Some("7".to_string()),
        };
        assert!(p.matches_design_code("5012"));
        assert!(p.matches_design_code("5012.0"));
        assert!(!p.matches_design_code("abc"));
        assert_eq!(p.string_count_value(), Some(7.0));

        let zero = ProductSpec {
            code: Some("1".to_string()),
            string_count: Some("0".to_string()),
        };
        assert_eq!(zero.string_count_value(), None);
    }
}
