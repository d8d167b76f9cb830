// ==========================================
// 线缆车间生产报工 - BOM 重量与耗料计算
// ==========================================
// 职责: 物料定额（克/单位）→ 订单 BOM 重量、实际耗料、铜料拆分、每股耗料
// 红线: 纯函数，输入异常时返回 0 或 None，不报错
// ==========================================

use crate::domain::material::{MaterialPerStage, ProductSpec};
use crate::domain::number::{parse_number, round2};
use crate::domain::order_row::OrderRow;
use crate::domain::types::CopperKind;
use crate::engine::material_filter::filter_materials_by_stage;
use crate::engine::plan_detail::unique_design_codes;
use serde::{Deserialize, Serialize};

const GRAMS_PER_KG: f64 = 1000.0;

/// 单个物料在订单量下的重量（kg）
///
/// per_unit_consumption(克) × 订单量 / 1000
pub fn material_weight_kg(material: &MaterialPerStage, row: &OrderRow) -> f64 {
    material.per_unit_consumption * row.order_quantity_value() / GRAMS_PER_KG
}

/// 订单行 BOM 总重（kg）
pub fn total_bom_weight<'a, I>(materials: I, row: &OrderRow) -> f64
where
    I: IntoIterator<Item = &'a MaterialPerStage>,
{
    materials
        .into_iter()
        .map(|material| material_weight_kg(material, row))
        .sum()
}

/// 按实际产量折算的实际耗料（kg）
///
/// 规则：
/// 1) 物料为空、实际产量 <= 0、订单量 <= 0 → 0
/// 2) 否则 BOM 总重 × 实际产量 / 订单量
pub fn actual_consumption(materials: &[&MaterialPerStage], row: &OrderRow, actual: f64) -> f64 {
    if materials.is_empty() || actual <= 0.0 {
        return 0.0;
    }
    let order_quantity = row.order_quantity_value();
    if order_quantity <= 0.0 {
        return 0.0;
    }

    let total = total_bom_weight(materials.iter().copied(), row);
    total * (actual / order_quantity)
}

// ==========================================
// 铜料拆分（CU / TICU）
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CopperSplit {
    pub cu: f64,   // 裸铜重量
    pub ticu: f64, // 镀锡铜重量
}

/// 按产出长度拆分铜料重量
///
/// 规则：
/// 1) 计量单位不是米制标签 → 两者都等于产出量
/// 2) 设计代码为空或物料为空 → 两者都等于产出量
/// 3) 否则分别累加 CU / TICU 物料单耗，× 长度 / 1000，四舍五入两位
pub fn copper_split(
    materials: &[MaterialPerStage],
    produced_length: f64,
    unit: &str,
    design_code: Option<&str>,
    metre_label: &str,
) -> CopperSplit {
    let passthrough = CopperSplit {
        cu: produced_length,
        ticu: produced_length,
    };

    if unit != metre_label {
        return passthrough;
    }
    let has_design = design_code.map(|d| !d.is_empty()).unwrap_or(false);
    if !has_design || materials.is_empty() {
        return passthrough;
    }

    let mut cu_grams = 0.0;
    let mut ticu_grams = 0.0;
    for material in materials {
        match CopperKind::from_material_name(material.material_name.as_deref()) {
            Some(CopperKind::Cu) => cu_grams += material.per_unit_consumption,
            Some(CopperKind::Ticu) => ticu_grams += material.per_unit_consumption,
            None => {}
        }
    }

    CopperSplit {
        cu: round2(cu_grams * produced_length / GRAMS_PER_KG),
        ticu: round2(ticu_grams * produced_length / GRAMS_PER_KG),
    }
}

// ==========================================
// 每股耗料
// ==========================================

/// 单股耗料（kg）= 工序过滤后物料单耗合计 / 股数 / 1000
///
/// 股数或单耗合计不为正 → None
pub fn consumption_per_string(
    materials: &[MaterialPerStage],
    row: &OrderRow,
    product: &ProductSpec,
) -> Option<f64> {
    let strings = product.string_count_value()?;
    let grams: f64 = filter_materials_by_stage(materials, row)
        .iter()
        .map(|m| m.per_unit_consumption)
        .sum();

    if grams > 0.0 {
        Some(grams / strings / GRAMS_PER_KG)
    } else {
        None
    }
}

/// 卡片级每股耗料: 依设计代码出现顺序查找产品与首个订单行，取第一个可计算的结果
///
/// 设计代码无法解析为数字、找不到产品或订单行时跳过该代码
pub fn card_consumption_per_string(
    rows: &[OrderRow],
    materials: &[MaterialPerStage],
    products: &[ProductSpec],
) -> Option<f64> {
    if rows.is_empty() || materials.is_empty() || products.is_empty() {
        return None;
    }

    for design_code in unique_design_codes(rows) {
        if parse_number(&design_code).is_none() {
            continue;
        }
        let Some(product) = products.iter().find(|p| p.matches_design_code(&design_code)) else {
            continue;
        };
        if product.string_count_value().is_none() {
            continue;
        }
        let Some(row) = rows
            .iter()
            .find(|r| r.design_code.as_deref() == Some(design_code.as_str()))
        else {
            continue;
        };
        return consumption_per_string(materials, row, product);
    }
    None
}

/// 计划 BOM 耗料 = 每股耗料 × 卡片计划量（两位小数由调用方格式化）
pub fn planned_bom_consumption(per_string: Option<f64>, planned_amount: Option<&str>) -> Option<f64> {
    let planned = planned_amount.and_then(parse_number)?;
    per_string.map(|value| value * planned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_row(qty: &str, design: &str, stage: &str) -> OrderRow {
        OrderRow {
            row_key: Some("R1".to_string()),
            order_quantity: Some(qty.to_string()),
            design_code: Some(design.to_string()),
            stage_descriptor: Some(stage.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_material_weight_in_kg() {
        let material = MaterialPerStage::new("5012", "CU", 500.0, "2");
        let row = create_test_row("100", "5012", "1;2;3");
        assert_eq!(material_weight_kg(&material, &row), 50.0);

        let bad_qty = create_test_row("abc", "5012", "1");
        assert_eq!(material_weight_kg(&material, &bad_qty), 0.0);
    }

    #[test]
    fn test_total_bom_weight_sums() {
        let materials = vec![
            MaterialPerStage::new("5012", "CU", 500.0, "1"),
            MaterialPerStage::new("5012", "PVC", 250.0, "2"),
        ];
        let row = create_test_row("10", "5012", "2");
        assert_eq!(total_bom_weight(&materials, &row), 7.5);
    }

    #[test]
    fn test_actual_consumption_scales_by_ratio() {
        let cu = MaterialPerStage::new("5012", "CU", 500.0, "2");
        let row = create_test_row("100", "5012", "2");
        let materials = vec![&cu];
        assert_eq!(actual_consumption(&materials, &row, 50.0), 25.0);
        assert_eq!(actual_consumption(&materials, &row, 0.0), 0.0);
        assert_eq!(actual_consumption(&[], &row, 50.0), 0.0);

        let zero_qty = create_test_row("0", "5012", "2");
        assert_eq!(actual_consumption(&materials, &zero_qty, 50.0), 0.0);
    }

    #[test]
    fn test_copper_split_metre_unit() {
        let materials = vec![
            MaterialPerStage::new("5012", " cu ", 10.0, "1"),
            MaterialPerStage::new("5012", "CU", 5.0, "1"),
            MaterialPerStage::new("5012", "TiCu", 3.333, "1"),
            MaterialPerStage::new("5012", "PVC", 99.0, "1"),
        ];
        let split = copper_split(&materials, 200.0, "متر", Some("5012"), "متر");
        assert_eq!(split.cu, 3.0);
        assert_eq!(split.ticu, 0.67);
    }

    #[test]
    fn test_copper_split_passthrough() {
        let materials = vec![MaterialPerStage::new("5012", "CU", 10.0, "1")];
        let kg = copper_split(&materials, 42.0, "kg", Some("5012"), "متر");
        assert_eq!(kg, CopperSplit { cu: 42.0, ticu: 42.0 });

        let no_design = copper_split(&materials, 42.0, "متر", None, "متر");
        assert_eq!(no_design.cu, 42.0);

        let no_materials = copper_split(&[], 42.0, "متر", Some("5012"), "متر");
        assert_eq!(no_materials.ticu, 42.0);
    }

    #[test]
    fn test_consumption_per_string() {
        let materials = vec![
            MaterialPerStage::new("5012", "CU", 700.0, "1"),
            MaterialPerStage::new("5012", "PVC", 700.0, "5"),
        ];
        let row = create_test_row("100", "5012", "2");
        let product = ProductSpec {
            code: Some("5012".to_string()),
            string_count: Some("7".to_string()),
        };
        assert_eq!(consumption_per_string(&materials, &row, &product), Some(0.1));

        let no_strings = ProductSpec {
            code: Some("5012".to_string()),
            string_count: None,
        };
        assert_eq!(consumption_per_string(&materials, &row, &no_strings), None);
    }

    #[test]
    fn test_card_consumption_and_planned() {
        let materials = vec![MaterialPerStage::new("5012", "CU", 1400.0, "1")];
        let rows = vec![
            create_test_row("100", "abc", "1"),
            create_test_row("100", "5012", "1"),
        ];
        let products = vec![ProductSpec {
            code: Some("5012".to_string()),
            string_count: Some("7".to_string()),
        }];
        let per_string = card_consumption_per_string(&rows, &materials, &products);
        assert_eq!(per_string, Some(0.2));
        assert_eq!(planned_bom_consumption(per_string, Some("50")), Some(10.0));
        assert_eq!(planned_bom_consumption(per_string, None), None);
        assert_eq!(planned_bom_consumption(None, Some("50")), None);
    }
}
