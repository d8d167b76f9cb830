// ==========================================
// 线缆车间生产报工 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 报工字段 (Production Field)
// ==========================================
// 表单中按订单行写回的三个字段，键格式 "<行号>.<字段>"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductionField {
    ActualProduction,          // 实际产量
    Waste,                     // 废料
    ActualMaterialConsumption, // 实际耗料（kg）
}

impl ProductionField {
    /// 字段后缀（与表单键一致）
    pub fn suffix(&self) -> &'static str {
        match self {
            ProductionField::ActualProduction => "actualProduction",
            ProductionField::Waste => "waste",
            ProductionField::ActualMaterialConsumption => "actualMaterialConsumption",
        }
    }

    /// 生成表单键: "<row_key>.<suffix>"
    pub fn key_for(&self, row_key: &str) -> String {
        format!("{}.{}", row_key, self.suffix())
    }

    pub fn all() -> [ProductionField; 3] {
        [
            ProductionField::ActualProduction,
            ProductionField::Waste,
            ProductionField::ActualMaterialConsumption,
        ]
    }
}

impl fmt::Display for ProductionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

// ==========================================
// 铜料类别 (Copper Kind)
// ==========================================
// 按物料名称识别（去空白、忽略大小写）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CopperKind {
    Cu,   // 裸铜
    Ticu, // 镀锡铜
}

impl CopperKind {
    pub fn from_material_name(name: Option<&str>) -> Option<Self> {
        let trimmed = name?.trim().to_uppercase();
        match trimmed.as_str() {
            "CU" => Some(CopperKind::Cu),
            "TICU" => Some(CopperKind::Ticu),
            _ => None,
        }
    }
}

impl fmt::Display for CopperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopperKind::Cu => write!(f, "CU"),
            CopperKind::Ticu => write!(f, "TICU"),
        }
    }
}
