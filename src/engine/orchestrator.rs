// ==========================================
// 线缆车间生产报工 - 报工流程编排
// ==========================================
// 用途: 串联 订单量过滤 → 优先级排序 → 产量/废料分摊 → 表单取值 → 提交组装
// 红线: 纯计算，不访问存储；结果通过 field_updates 写回表单
// ==========================================

use crate::domain::form::{
    FormState, FIELD_ACTUAL_AMOUNT_PRODUCTION, FIELD_PRODUCTION_UNIT, FIELD_WASTE,
};
use crate::domain::material::{MaterialPerStage, ProductSpec};
use crate::domain::number::parse_or_zero;
use crate::domain::order_row::OrderRow;
use crate::domain::plan::PlanDetail;
use crate::domain::report::{ProductionReport, ProductionReportRow};
use crate::domain::types::ProductionField;
use crate::engine::allocation::{AllocationEngine, AllocationResult};
use crate::engine::bom::{
    card_consumption_per_string, copper_split, planned_bom_consumption, CopperSplit,
};
use crate::engine::material_filter::filter_materials_by_stage;
use crate::engine::priority::PrioritySorter;
use crate::engine::quantity_filter::QuantityFilter;
use crate::engine::rules::EntryRules;
use crate::engine::submission::{
    reset_keys, resolve_actual_consumption, resolve_actual_production, ReportHeaderInput,
    SubmissionBuilder,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

// ==========================================
// EntryPreview - 报工预览（写回表单前）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryPreview {
    pub filtered_rows: Vec<OrderRow>,       // 过滤后的订单行（原始顺序）
    pub sorted_rows: Vec<OrderRow>,         // 过滤并排序后的订单行（仅用于分摊）
    pub production: AllocationResult,       // 产量分摊
    pub waste: AllocationResult,            // 废料分摊
    pub consumption: BTreeMap<String, String>, // 行号 → 实际耗料（kg）
    pub consumption_per_string: Option<f64>,   // 卡片每股耗料（kg）
    pub planned_bom_consumption: Option<f64>,  // 计划 BOM 耗料（kg）
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub copper: BTreeMap<String, CopperSplit>, // 行号 → 铜料拆分（填写计量单位时）
}

impl EntryPreview {
    /// 写回表单的全部字段
    pub fn field_updates(&self) -> Vec<(String, String)> {
        let mut updates = self.production.field_updates(ProductionField::ActualProduction);
        updates.extend(self.waste.field_updates(ProductionField::Waste));
        updates.extend(self.consumption.iter().map(|(key, value)| {
            (
                ProductionField::ActualMaterialConsumption.key_for(key),
                value.clone(),
            )
        }));
        updates
    }
}

// ==========================================
// Submission - 待持久化的报工数据
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub report: ProductionReport,
    pub rows: Vec<ProductionReportRow>,
    pub reset_keys: Vec<String>, // 提交成功后需清空的表单键
}

// ==========================================
// ProductionEntryService - 报工流程服务
// ==========================================
pub struct ProductionEntryService {
    rules: EntryRules,
    filter: QuantityFilter,
    sorter: PrioritySorter,
    allocator: AllocationEngine,
}

impl ProductionEntryService {
    pub fn new(rules: EntryRules) -> Self {
        Self {
            filter: QuantityFilter::new(rules.min_order_quantity),
            sorter: PrioritySorter::new(),
            allocator: AllocationEngine::new(),
            rules,
        }
    }

    pub fn rules(&self) -> &EntryRules {
        &self.rules
    }

    /// 过滤订单行，返回 (原始顺序, 优先级顺序)
    ///
    /// 分摊只用排序结果；汇总字段、明细与每股耗料按原始顺序
    pub fn eligible_rows(&self, rows: &[OrderRow]) -> (Vec<OrderRow>, Vec<OrderRow>) {
        let filtered = self.filter.filter(rows);
        debug!(
            input = rows.len(),
            kept = filtered.len(),
            min_quantity = self.filter.min_quantity(),
            "订单量过滤完成"
        );
        let sorted = self.sorter.sort(&filtered);
        (filtered, sorted)
    }

    /// 计算预览（不修改表单）
    #[instrument(skip_all, fields(rows = rows.len(), materials = materials.len()))]
    pub fn preview(
        &self,
        rows: &[OrderRow],
        materials: &[MaterialPerStage],
        products: &[ProductSpec],
        card: &PlanDetail,
        form: &FormState,
    ) -> EntryPreview {
        let (filtered_rows, sorted_rows) = self.eligible_rows(rows);

        let production = self.allocator.allocate(
            &sorted_rows,
            form.value(FIELD_ACTUAL_AMOUNT_PRODUCTION).unwrap_or_default(),
            ProductionField::ActualProduction,
        );
        let waste = self.allocator.allocate(
            &sorted_rows,
            form.value(FIELD_WASTE).unwrap_or_default(),
            ProductionField::Waste,
        );

        let unit = form.value(FIELD_PRODUCTION_UNIT);
        let mut consumption = BTreeMap::new();
        let mut copper = BTreeMap::new();
        for row in &filtered_rows {
            let Some(key) = row.row_key() else {
                continue;
            };
            let actual = resolve_actual_production(form, key, &production);
            let value = resolve_actual_consumption(
                form,
                row,
                materials,
                &actual,
                self.rules.unit_normalize_threshold,
            );
            consumption.insert(key.to_string(), value);

            if let Some(unit) = unit {
                let stage_materials: Vec<MaterialPerStage> =
                    filter_materials_by_stage(materials, row)
                        .into_iter()
                        .cloned()
                        .collect();
                let split = copper_split(
                    &stage_materials,
                    parse_or_zero(Some(actual.as_str())),
                    unit,
                    row.design_code(),
                    &self.rules.metre_unit_label,
                );
                copper.insert(key.to_string(), split);
            }
        }

        let per_string = card_consumption_per_string(&filtered_rows, materials, products);
        let planned = planned_bom_consumption(per_string, card.planned_amount.as_deref());

        info!(
            production_rows = production.len(),
            waste_rows = waste.len(),
            "报工预览计算完成"
        );

        EntryPreview {
            filtered_rows,
            sorted_rows,
            production,
            waste,
            consumption,
            consumption_per_string: per_string,
            planned_bom_consumption: planned,
            copper,
        }
    }

    /// 计算预览并写回表单
    pub fn apply_preview(
        &self,
        rows: &[OrderRow],
        materials: &[MaterialPerStage],
        products: &[ProductSpec],
        card: &PlanDetail,
        form: &mut FormState,
    ) -> EntryPreview {
        let preview = self.preview(rows, materials, products, card, form);
        form.apply(preview.field_updates());
        preview
    }

    /// 组装提交数据
    #[instrument(skip_all, fields(plan = %header.production_plan_number))]
    pub fn prepare_submission(
        &self,
        rows: &[OrderRow],
        materials: &[MaterialPerStage],
        card: &PlanDetail,
        form: &FormState,
        header: &ReportHeaderInput,
        created_at: NaiveDateTime,
    ) -> Submission {
        let (filtered_rows, sorted_rows) = self.eligible_rows(rows);

        let production = self.allocator.allocate(
            &sorted_rows,
            form.value(FIELD_ACTUAL_AMOUNT_PRODUCTION).unwrap_or_default(),
            ProductionField::ActualProduction,
        );
        let waste = self.allocator.allocate(
            &sorted_rows,
            form.value(FIELD_WASTE).unwrap_or_default(),
            ProductionField::Waste,
        );

        let builder = SubmissionBuilder {
            rows: &filtered_rows,
            materials,
            form,
            production: &production,
            waste: &waste,
            rules: &self.rules,
        };

        let report = builder.build_report(header, card, created_at);
        let report_rows = builder.prepare_rows(header, card);

        info!(
            report_id = %report.report_id,
            rows = report_rows.len(),
            "报工提交数据组装完成"
        );

        Submission {
            report,
            rows: report_rows,
            reset_keys: reset_keys(&filtered_rows),
        }
    }
}

impl Default for ProductionEntryService {
    fn default() -> Self {
        Self::new(EntryRules::default())
    }
}
