// ==========================================
// 线缆车间生产报工 - 卡片选择辅助
// ==========================================
// 职责: 工序/颜色候选项提取、卡片过滤、设计代码去重
// 红线: 结果保持首次出现顺序，空白项丢弃
// ==========================================

use crate::domain::order_row::{non_blank, OrderRow};
use crate::domain::plan::PlanDetail;

fn push_unique(values: &mut Vec<String>, candidate: &str) {
    if !values.iter().any(|v| v == candidate) {
        values.push(candidate.to_string());
    }
}

/// 卡片中出现过的工序（去重）
pub fn unique_stages(details: &[PlanDetail]) -> Vec<String> {
    let mut stages = Vec::new();
    for stage in details.iter().filter_map(PlanDetail::stage) {
        push_unique(&mut stages, stage);
    }
    stages
}

/// 指定工序下出现过的颜色（去重）；未选工序 → 空
pub fn unique_colors(details: &[PlanDetail], stage: Option<&str>) -> Vec<String> {
    let Some(stage) = stage.filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    let mut colors = Vec::new();
    for detail in details.iter().filter(|d| d.stage.as_deref() == Some(stage)) {
        if let Some(color) = detail.color() {
            push_unique(&mut colors, color);
        }
    }
    colors
}

/// 按工序/颜色过滤卡片
///
/// 规则：
/// 1) 未选工序 → 空
/// 2) 该工序存在颜色候选时必须选颜色，否则 → 空
pub fn filter_plan_details<'a>(
    details: &'a [PlanDetail],
    stage: Option<&str>,
    color: Option<&str>,
    unique_colors: &[String],
) -> Vec<&'a PlanDetail> {
    let Some(stage) = stage.filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    let by_stage = details.iter().filter(|d| d.stage.as_deref() == Some(stage));

    if unique_colors.is_empty() {
        return by_stage.collect();
    }
    match color.filter(|c| !c.is_empty()) {
        Some(color) => by_stage
            .filter(|d| d.color.as_deref() == Some(color))
            .collect(),
        None => Vec::new(),
    }
}

/// 订单行中出现过的设计代码（去重）
pub fn unique_design_codes(rows: &[OrderRow]) -> Vec<String> {
    let mut codes = Vec::new();
    for code in rows.iter().filter_map(|r| non_blank(r.design_code.as_deref())) {
        push_unique(&mut codes, code);
    }
    codes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_detail(stage: &str, color: Option<&str>) -> PlanDetail {
        PlanDetail {
            stage: Some(stage.to_string()),
            color: color.map(|c| c.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_unique_stages_first_seen_order() {
        let details = vec![
            create_test_detail("Drawing", None),
            create_test_detail("Insulation", None),
            create_test_detail("Drawing", None),
            create_test_detail(" ", None),
        ];
        assert_eq!(unique_stages(&details), vec!["Drawing", "Insulation"]);
    }

    #[test]
    fn test_unique_colors_requires_stage() {
        let details = vec![
            create_test_detail("Insulation", Some("Red")),
            create_test_detail("Insulation", Some("Blue")),
            create_test_detail("Insulation", Some("Red")),
            create_test_detail("Drawing", Some("Green")),
        ];
        assert!(unique_colors(&details, None).is_empty());
        assert_eq!(unique_colors(&details, Some("Insulation")), vec!["Red", "Blue"]);
    }

    #[test]
    fn test_filter_plan_details_color_gate() {
        let details = vec![
            create_test_detail("Insulation", Some("Red")),
            create_test_detail("Insulation", Some("Blue")),
            create_test_detail("Drawing", None),
        ];
        let colors = unique_colors(&details, Some("Insulation"));

        assert!(filter_plan_details(&details, Some("Insulation"), None, &colors).is_empty());
        assert_eq!(
            filter_plan_details(&details, Some("Insulation"), Some("Blue"), &colors).len(),
            1
        );
        assert_eq!(filter_plan_details(&details, Some("Drawing"), None, &[]).len(), 1);
        assert!(filter_plan_details(&details, None, None, &[]).is_empty());
    }

    #[test]
    fn test_unique_design_codes() {
        let rows = vec![
            OrderRow {
                design_code: Some("5012".to_string()),
                ..Default::default()
            },
            OrderRow {
                design_code: Some("".to_string()),
                ..Default::default()
            },
            OrderRow {
                design_code: Some("5012".to_string()),
                ..Default::default()
            },
            OrderRow {
                design_code: Some("6001".to_string()),
                ..Default::default()
            },
        ];
        assert_eq!(unique_design_codes(&rows), vec!["5012", "6001"]);
    }
}
