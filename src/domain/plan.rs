// ==========================================
// 线缆车间生产报工 - 生产卡片（计划明细）
// ==========================================
// 对应列表: PrintTajmi（汇总打印卡片）
// 一张卡片对应 工序 × 颜色 × 机台，关联若干子计划号
// ==========================================

use crate::domain::number::lenient_text;
use crate::domain::order_row::non_blank;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanDetail {
    #[serde(rename = "Title", alias = "title", default)]
    pub title: Option<String>, // 卡片号

    #[serde(rename = "marhale", alias = "stage", default)]
    pub stage: Option<String>, // 工序名称

    #[serde(rename = "rang", alias = "color", default)]
    pub color: Option<String>, // 颜色

    #[serde(rename = "dasatghah", alias = "device", default)]
    pub device: Option<String>, // 机台

    #[serde(rename = "codemahsol", alias = "product_code", default)]
    pub product_code: Option<String>, // 产品代码

    #[serde(rename = "barnamerizi", alias = "planned_amount", default, deserialize_with = "lenient_text")]
    pub planned_amount: Option<String>, // 计划量

    #[serde(rename = "shomaretahshode", alias = "merged_plan_numbers", default)]
    pub merged_plan_numbers: Option<String>, // 合并后的计划号（逗号分隔，优先）

    #[serde(rename = "shomaretajshode", alias = "plan_numbers", default)]
    pub plan_numbers: Option<String>, // 汇总计划号（逗号分隔，回退）
}

impl PlanDetail {
    /// 卡片关联的子计划号列表
    ///
    /// 优先取合并计划号，其次汇总计划号；逗号分隔、去空白、去空项
    pub fn plan_numbers(&self) -> Vec<String> {
        let source = non_blank(self.merged_plan_numbers.as_deref())
            .or_else(|| non_blank(self.plan_numbers.as_deref()));

        match source {
            Some(text) => text
                .split(',')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn stage(&self) -> Option<&str> {
        non_blank(self.stage.as_deref())
    }

    pub fn color(&self) -> Option<&str> {
        non_blank(self.color.as_deref())
    }
}
