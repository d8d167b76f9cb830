// ==========================================
// 线缆车间生产报工 - 表单取值与提交数据组装
// ==========================================
// 职责: 合并人工输入与引擎计算值，组装报工主记录与明细
// 输入: 表单状态 + 分摊结果 + 物料定额 + 卡片
// 输出: ProductionReport / ProductionReportRow
// 红线: 人工输入优先于计算值；无行号的订单行不生成明细
// ==========================================

use crate::domain::form::{
    FormState, FIELD_ACTUAL_AMOUNT_PRODUCTION, FIELD_ACTUAL_WEIGHT, FIELD_DESCRIPTION,
    FIELD_STOP_TIME, FIELD_WASTE, HEADER_FIELDS,
};
use crate::domain::material::MaterialPerStage;
use crate::domain::number::{format_fixed2, parse_number};
use crate::domain::order_row::{non_blank, OrderRow};
use crate::domain::plan::PlanDetail;
use crate::domain::report::{ProductionReport, ProductionReportRow, ReelEntry, ShiftInfo, StopInfo};
use crate::domain::types::ProductionField;
use crate::engine::allocation::AllocationResult;
use crate::engine::bom::{actual_consumption, total_bom_weight};
use crate::engine::material_filter::filter_materials_by_stage;
use crate::engine::plan_detail::unique_design_codes;
use crate::engine::rules::EntryRules;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// 单字段取值
// ==========================================

/// 实际产量: 人工输入 → 分摊值 → 空串
pub fn resolve_actual_production(
    form: &FormState,
    row_key: &str,
    computed: &AllocationResult,
) -> String {
    form.row_value(row_key, ProductionField::ActualProduction)
        .or_else(|| computed.get(row_key))
        .unwrap_or_default()
        .to_string()
}

/// 废料: 人工输入 → 分摊值 → "0"
///
/// 数值 > 阈值视为克，折算为 kg；正数输出两位小数，否则 "0"
pub fn resolve_waste(
    form: &FormState,
    row_key: &str,
    computed: &AllocationResult,
    threshold: f64,
) -> String {
    let raw = form
        .row_value(row_key, ProductionField::Waste)
        .or_else(|| computed.get(row_key).filter(|v| !v.is_empty()))
        .unwrap_or("0");

    match parse_number(raw) {
        Some(value) if value > threshold => format_fixed2(value / 1000.0),
        Some(value) if value > 0.0 => format_fixed2(value),
        _ => "0".to_string(),
    }
}

/// 实际耗料（kg）
///
/// 规则：
/// 1) 人工输入为空或 "0" → 按 BOM 与实际产量重算（实际产量 > 0 时），两位小数
/// 2) 人工输入数值 > 阈值 → 视为克，折算为 kg
/// 3) 其他情况保持人工输入原文
pub fn resolve_actual_consumption(
    form: &FormState,
    row: &OrderRow,
    materials: &[MaterialPerStage],
    actual_production: &str,
    threshold: f64,
) -> String {
    let Some(row_key) = row.row_key() else {
        return "0".to_string();
    };
    let entered = form
        .row_value(row_key, ProductionField::ActualMaterialConsumption)
        .unwrap_or("0");

    if entered == "0" {
        return match parse_number(actual_production) {
            Some(actual) if actual > 0.0 => {
                let stage_materials = filter_materials_by_stage(materials, row);
                format_fixed2(actual_consumption(&stage_materials, row, actual))
            }
            _ => entered.to_string(),
        };
    }

    match parse_number(entered) {
        Some(value) if value > threshold => format_fixed2(value / 1000.0),
        _ => entered.to_string(),
    }
}

/// 订单行 BOM 重量（工序过滤后，两位小数）
pub fn order_weight(materials: &[MaterialPerStage], row: &OrderRow) -> String {
    let stage_materials = filter_materials_by_stage(materials, row);
    format_fixed2(total_bom_weight(stage_materials, row))
}

/// 提交后需要清空的表单键
pub fn reset_keys(rows: &[OrderRow]) -> Vec<String> {
    let mut keys: Vec<String> = HEADER_FIELDS.iter().map(|k| k.to_string()).collect();
    for key in rows.iter().filter_map(OrderRow::row_key) {
        for field in [
            ProductionField::ActualProduction,
            ProductionField::ActualMaterialConsumption,
            ProductionField::Waste,
        ] {
            keys.push(field.key_for(key));
        }
    }
    keys
}

// ==========================================
// ReportHeaderInput - 表单外的主记录输入
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportHeaderInput {
    pub production_plan_number: String, // 生产计划号
    pub selected_stage: Option<String>, // 所选工序
    pub operator: String,               // 操作员
    pub device_id: String,              // 机台ID
    pub shift: ShiftInfo,
    pub stop: StopInfo, // 停机原因/代码（时长取自表单）
    pub entrance_reels: Vec<ReelEntry>,
    pub exit_reels: Vec<ReelEntry>,
}

// ==========================================
// SubmissionBuilder - 提交数据组装
// ==========================================
pub struct SubmissionBuilder<'a> {
    pub rows: &'a [OrderRow],              // 过滤后的订单行（原始顺序）
    pub materials: &'a [MaterialPerStage], // 物料定额
    pub form: &'a FormState,
    pub production: &'a AllocationResult, // 产量分摊
    pub waste: &'a AllocationResult,      // 废料分摊
    pub rules: &'a EntryRules,
}

impl<'a> SubmissionBuilder<'a> {
    /// 组装单条明细；无行号 → None
    pub fn prepare_row(
        &self,
        row: &OrderRow,
        header: &ReportHeaderInput,
        card: &PlanDetail,
    ) -> Option<ProductionReportRow> {
        let row_key = row.row_key()?;

        let mut actual_amount = resolve_actual_production(self.form, row_key, self.production);
        if actual_amount.is_empty() {
            actual_amount = "0".to_string();
        }

        let actual_weight = resolve_actual_consumption(
            self.form,
            row,
            self.materials,
            &actual_amount,
            self.rules.unit_normalize_threshold,
        );
        let waste = resolve_waste(
            self.form,
            row_key,
            self.waste,
            self.rules.unit_normalize_threshold,
        );

        Some(ProductionReportRow {
            title: row_key.to_string(),
            customer: row.customer.clone().unwrap_or_default(),
            production_plan_item: header.production_plan_number.clone(),
            actual_amount,
            order_amount: non_blank(row.order_quantity.as_deref())
                .unwrap_or("0")
                .to_string(),
            order_weight: order_weight(self.materials, row),
            actual_weight,
            waste,
            product: row.product_code.clone().unwrap_or_default(),
            product_code: row.design_code.clone().unwrap_or_default(),
            priority: row.priority_text(),
            level: header.selected_stage.clone().unwrap_or_default(),
            level_number: row.stage_descriptor.clone().unwrap_or_default(),
            device: card.device.clone().unwrap_or_default(),
        })
    }

    /// 组装全部明细（跳过无行号订单行）
    pub fn prepare_rows(
        &self,
        header: &ReportHeaderInput,
        card: &PlanDetail,
    ) -> Vec<ProductionReportRow> {
        self.rows
            .iter()
            .filter_map(|row| self.prepare_row(row, header, card))
            .collect()
    }

    /// 组装主记录
    pub fn build_report(
        &self,
        header: &ReportHeaderInput,
        card: &PlanDetail,
        created_at: NaiveDateTime,
    ) -> ProductionReport {
        let form_text = |key: &str| self.form.value(key).unwrap_or_default().to_string();
        let planned = card.planned_amount.clone().unwrap_or_default();

        let mut stop = header.stop.clone();
        stop.time = form_text(FIELD_STOP_TIME);

        ProductionReport {
            report_id: Uuid::new_v4().to_string(),
            production_plan_number: header.production_plan_number.clone(),
            actual_amount_production: form_text(FIELD_ACTUAL_AMOUNT_PRODUCTION),
            production_plan_amount: planned.clone(),
            calculated_weight: planned,
            actual_weight: form_text(FIELD_ACTUAL_WEIGHT),
            entrance_weight: entrance_weight(&header.entrance_reels),
            waste: form_text(FIELD_WASTE),
            pre_invoice_row: pre_invoice_row(self.rows, self.rules.pre_invoice_max_len),
            product_code: unique_design_codes(self.rows).join("-"),
            product: product_summary(self.rows, card),
            orders_total_weight: self.orders_total_weight(),
            orders_total_amount: orders_total_amount(self.rows),
            operator: header.operator.clone(),
            stage: card.stage.clone().unwrap_or_default(),
            device: card.device.clone().unwrap_or_default(),
            device_id: header.device_id.clone(),
            description: form_text(FIELD_DESCRIPTION),
            shift: header.shift.clone(),
            stop,
            entrance_reels: header.entrance_reels.clone(),
            exit_reels: header.exit_reels.clone(),
            created_at,
        }
    }

    /// 订单 BOM 总重（全部订单行合计）
    pub fn orders_total_weight(&self) -> String {
        let total: f64 = self
            .rows
            .iter()
            .map(|row| total_bom_weight(filter_materials_by_stage(self.materials, row), row))
            .sum();
        format_fixed2(total)
    }
}

/// 入盘总重（两位小数）
pub fn entrance_weight(reels: &[ReelEntry]) -> String {
    format_fixed2(reels.iter().map(ReelEntry::weight_value).sum())
}

/// 订单行号去重后以 "-" 连接，按字符数截断
pub fn pre_invoice_row(rows: &[OrderRow], max_len: usize) -> String {
    let mut keys: Vec<&str> = Vec::new();
    for key in rows.iter().filter_map(OrderRow::row_key) {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys.join("-").chars().take(max_len).collect()
}

/// 产品代码以 ", " 连接；无可用代码时回退卡片产品代码
pub fn product_summary(rows: &[OrderRow], card: &PlanDetail) -> String {
    let codes: Vec<&str> = rows.iter().filter_map(OrderRow::product_code).collect();
    if codes.is_empty() {
        card.product_code.clone().unwrap_or_default()
    } else {
        codes.join(", ")
    }
}

/// 订单总量（两位小数）
pub fn orders_total_amount(rows: &[OrderRow]) -> String {
    format_fixed2(rows.iter().map(OrderRow::order_quantity_value).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::allocation::AllocationEngine;
    use chrono::NaiveDate;

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn create_test_row(key: Option<&str>, qty: &str, priority: Option<&str>) -> OrderRow {
        OrderRow {
            row_key: key.map(|k| k.to_string()),
            order_quantity: Some(qty.to_string()),
            priority: priority.map(|p| p.to_string()),
            design_code: Some("5012".to_string()),
            stage_descriptor: Some("1;2;3".to_string()),
            product_code: Some("NYY".to_string()),
            customer: Some("Pars".to_string()),
            ..Default::default()
        }
    }

    fn create_test_materials() -> Vec<MaterialPerStage> {
        vec![
            MaterialPerStage::new("5012", "CU", 500.0, "2"),
            MaterialPerStage::new("5012", "PVC", 100.0, "4"),
        ]
    }

    fn test_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn computed(pairs: &[(&str, &str)]) -> AllocationResult {
        let rows: Vec<OrderRow> = pairs
            .iter()
            .map(|(k, v)| create_test_row(Some(k), v, Some("1")))
            .collect();
        let total: f64 = pairs.iter().filter_map(|(_, v)| parse_number(v)).sum();
        AllocationEngine::new().allocate(&rows, &total.to_string(), ProductionField::ActualProduction)
    }

    // ==========================================
    // 单字段取值
    // ==========================================

    #[test]
    fn test_actual_production_prefers_form() {
        let values = computed(&[("A", "30")]);
        let mut form = FormState::new();
        assert_eq!(resolve_actual_production(&form, "A", &values), "30.00");
        assert_eq!(resolve_actual_production(&form, "B", &values), "");

        form.set("A.actualProduction", "12");
        assert_eq!(resolve_actual_production(&form, "A", &values), "12");
    }

    #[test]
    fn test_waste_normalisation() {
        let none = AllocationResult::default();
        let mut form = FormState::new();
        assert_eq!(resolve_waste(&form, "A", &none, 1000.0), "0");

        form.set("A.waste", "2500");
        assert_eq!(resolve_waste(&form, "A", &none, 1000.0), "2.50");
        form.set("A.waste", "1000");
        assert_eq!(resolve_waste(&form, "A", &none, 1000.0), "1000.00");
        form.set("A.waste", "-3");
        assert_eq!(resolve_waste(&form, "A", &none, 1000.0), "0");
        form.set("A.waste", "abc");
        assert_eq!(resolve_waste(&form, "A", &none, 1000.0), "0");

        let values = computed(&[("B", "4")]);
        assert_eq!(resolve_waste(&FormState::new(), "B", &values, 1000.0), "4.00");
    }

    #[test]
    fn test_actual_consumption_recomputed_when_empty() {
        let materials = create_test_materials();
        let row = create_test_row(Some("A"), "100", Some("1"));
        let mut form = FormState::new();

        // 500g × 100 / 1000 = 50kg，按 50/100 折算 → 25
        assert_eq!(resolve_actual_consumption(&form, &row, &materials, "50", 1000.0), "25.00");
        assert_eq!(resolve_actual_consumption(&form, &row, &materials, "0", 1000.0), "0");

        form.set("A.actualMaterialConsumption", "0");
        assert_eq!(resolve_actual_consumption(&form, &row, &materials, "50", 1000.0), "25.00");
    }

    #[test]
    fn test_actual_consumption_manual_entry() {
        let materials = create_test_materials();
        let row = create_test_row(Some("A"), "100", Some("1"));
        let mut form = FormState::new();

        form.set("A.actualMaterialConsumption", "4500");
        assert_eq!(resolve_actual_consumption(&form, &row, &materials, "50", 1000.0), "4.50");
        form.set("A.actualMaterialConsumption", "12.345");
        assert_eq!(resolve_actual_consumption(&form, &row, &materials, "50", 1000.0), "12.345");
    }

    #[test]
    fn test_reset_keys_cover_header_and_rows() {
        let rows = vec![
            create_test_row(Some("A"), "10", None),
            create_test_row(None, "10", None),
        ];
        let keys = reset_keys(&rows);
        assert_eq!(keys.len(), 5 + 3);
        assert!(keys.contains(&"stopTime".to_string()));
        assert!(keys.contains(&"A.actualMaterialConsumption".to_string()));
    }

    // ==========================================
    // 组装
    // ==========================================

    #[test]
    fn test_prepare_row_fields() {
        let rows = vec![create_test_row(Some("A"), "100", Some(" 1 "))];
        let materials = create_test_materials();
        let production = computed(&[("A", "40")]);
        let waste = AllocationResult::default();
        let form = FormState::new();
        let rules = EntryRules::default();
        let builder = SubmissionBuilder {
            rows: &rows,
            materials: &materials,
            form: &form,
            production: &production,
            waste: &waste,
            rules: &rules,
        };
        let header = ReportHeaderInput {
            production_plan_number: "P-77".to_string(),
            selected_stage: Some("Insulation".to_string()),
            ..Default::default()
        };
        let card = PlanDetail {
            device: Some("EXT-2".to_string()),
            ..Default::default()
        };

        let record = builder.prepare_row(&rows[0], &header, &card).unwrap();
        assert_eq!(record.title, "A");
        assert_eq!(record.actual_amount, "40.00");
        assert_eq!(record.order_amount, "100");
        assert_eq!(record.order_weight, "50.00");
        assert_eq!(record.actual_weight, "20.00");
        assert_eq!(record.waste, "0");
        assert_eq!(record.priority, "1");
        assert_eq!(record.level, "Insulation");
        assert_eq!(record.level_number, "1;2;3");
        assert_eq!(record.device, "EXT-2");
        assert_eq!(record.production_plan_item, "P-77");

        let keyless = create_test_row(None, "100", None);
        assert!(builder.prepare_row(&keyless, &header, &card).is_none());
    }

    #[test]
    fn test_build_report_aggregates() {
        let mut second = create_test_row(Some("B"), "50", Some("2"));
        second.design_code = Some("6001".to_string());
        second.product_code = None;
        let rows = vec![
            create_test_row(Some("A"), "100", Some("1")),
            second,
            create_test_row(Some("A"), "10", Some("3")),
        ];
        let materials = create_test_materials();
        let empty = AllocationResult::default();
        let mut form = FormState::new();
        form.set(FIELD_ACTUAL_AMOUNT_PRODUCTION, "150");
        form.set(FIELD_STOP_TIME, "15");
        let rules = EntryRules::default();
        let builder = SubmissionBuilder {
            rows: &rows,
            materials: &materials,
            form: &form,
            production: &empty,
            waste: &empty,
            rules: &rules,
        };
        let header = ReportHeaderInput {
            production_plan_number: "P-77".to_string(),
            entrance_reels: vec![
                ReelEntry {
                    reel_id: 1,
                    reel_title: "R1".to_string(),
                    weight: "10.5".to_string(),
                    amount: String::new(),
                },
                ReelEntry {
                    reel_id: 2,
                    reel_title: "R2".to_string(),
                    weight: "x".to_string(),
                    amount: String::new(),
                },
            ],
            ..Default::default()
        };
        let card = PlanDetail {
            planned_amount: Some("160".to_string()),
            stage: Some("Insulation".to_string()),
            ..Default::default()
        };

        let report = builder.build_report(&header, &card, test_time());
        assert_eq!(report.pre_invoice_row, "A-B");
        assert_eq!(report.product_code, "5012-6001");
        assert_eq!(report.product, "NYY, NYY");
        assert_eq!(report.entrance_weight, "10.50");
        assert_eq!(report.production_plan_amount, "160");
        assert_eq!(report.calculated_weight, "160");
        assert_eq!(report.actual_amount_production, "150");
        assert_eq!(report.stop.time, "15");
        assert_eq!(report.orders_total_amount, "160.00");
        // 5012 行: 50 + 5；6001 行无匹配物料
        assert_eq!(report.orders_total_weight, "55.00");
        assert_eq!(report.stage, "Insulation");
    }

    #[test]
    fn test_pre_invoice_row_truncated() {
        let rows = vec![
            create_test_row(Some("AAAA"), "10", None),
            create_test_row(Some("BBBB"), "10", None),
        ];
        assert_eq!(pre_invoice_row(&rows, 6), "AAAA-B");
    }

    #[test]
    fn test_product_summary_falls_back_to_card() {
        let mut row = create_test_row(Some("A"), "10", None);
        row.product_code = Some("  ".to_string());
        let card = PlanDetail {
            product_code: Some("CARD-P".to_string()),
            ..Default::default()
        };
        assert_eq!(product_summary(&[row], &card), "CARD-P");
    }
}
