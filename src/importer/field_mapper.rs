// ==========================================
// 线缆车间生产报工 - 字段映射器实现
// ==========================================
// 职责: 列表导出列名（内部名 + 显示名别名） → 领域模型
// 红线: 文本字段原样保留；只有物料单耗/启用标记在导入时强校验
// ==========================================

use crate::domain::material::{MaterialPerStage, ProductSpec};
use crate::domain::order_row::OrderRow;
use crate::domain::plan::PlanDetail;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRecord;

pub struct FieldMapper;

impl FieldMapper {
    // ===== 订单行 =====

    pub fn map_order_row(&self, row: &RawRecord) -> OrderRow {
        OrderRow {
            row_key: self.get_string(row, "shomareradiffactor"),
            order_quantity: self.get_string(row, "meghdarkolesefaresh"),
            priority: self.get_string(row, "Priority"),
            design_code: self.get_string(row, "tarhetolid"),
            stage_descriptor: self.get_string(row, "shomaremarhale"),
            product_code: self.get_string(row, "codemahsol"),
            product_name: self.get_string(row, "mahsoletolidi"),
            customer: self.get_string(row, "namemoshtari"),
            plan_number: self.get_string(row, "shomarebarnamerizi"),
        }
    }

    // ===== 物料定额 =====

    pub fn map_material(&self, row: &RawRecord, row_number: usize) -> ImportResult<MaterialPerStage> {
        Ok(MaterialPerStage {
            title: self.get_string(row, "Title"),
            material_name: self.get_string(row, "materialname"),
            per_unit_consumption: self
                .parse_f64(row, "vahed", row_number)?
                .unwrap_or(0.0),
            stage_descriptor: self.get_string(row, "marhale"),
            active: self.parse_bool(row, "faal", row_number)?.unwrap_or(true),
        })
    }

    // ===== 卡片 =====

    pub fn map_plan_detail(&self, row: &RawRecord) -> PlanDetail {
        PlanDetail {
            title: self.get_string(row, "Title"),
            stage: self.get_string(row, "marhale"),
            color: self.get_string(row, "rang"),
            device: self.get_string(row, "dasatghah"),
            product_code: self.get_string(row, "codemahsol"),
            planned_amount: self.get_string(row, "barnamerizi"),
            merged_plan_numbers: self.get_string(row, "shomaretahshode"),
            plan_numbers: self.get_string(row, "shomaretajshode"),
        }
    }

    // ===== 产品 =====

    pub fn map_product(&self, row: &RawRecord) -> ProductSpec {
        ProductSpec {
            code: self.get_string(row, "code"),
            string_count: self.get_string(row, "String"),
        }
    }

    /// 提取字符串字段（返回 Option），支持多个可能的列名（别名）
    fn get_string(&self, row: &RawRecord, key: &str) -> Option<String> {
        let aliases: &[&str] = match key {
            "shomareradiffactor" => &["shomareradiffactor", "row_key", "شماره ردیف فاکتور"],
            "meghdarkolesefaresh" => &["meghdarkolesefaresh", "order_quantity", "مقدار کل سفارش"],
            "Priority" => &["Priority", "priority", "اولویت"],
            "tarhetolid" => &["tarhetolid", "design_code", "طرح تولید"],
            "shomaremarhale" => &["shomaremarhale", "stage_descriptor", "شماره مرحله"],
            "codemahsol" => &["codemahsol", "product_code", "کد محصول"],
            "mahsoletolidi" => &["mahsoletolidi", "product_name", "محصول تولیدی"],
            "namemoshtari" => &["namemoshtari", "customer", "نام مشتری"],
            "shomarebarnamerizi" => &["shomarebarnamerizi", "plan_number", "شماره برنامه ریزی"],
            "Title" => &["Title", "title"],
            "materialname" => &["materialname", "material_name", "نام ماده"],
            "vahed" => &["vahed", "per_unit_consumption", "واحد"],
            "marhale" => &["marhale", "stage", "مرحله"],
            "faal" => &["faal", "active", "فعال"],
            "rang" => &["rang", "color", "رنگ"],
            "dasatghah" => &["dasatghah", "device", "دستگاه"],
            "barnamerizi" => &["barnamerizi", "planned_amount", "برنامه ریزی"],
            "shomaretahshode" => &["shomaretahshode", "merged_plan_numbers"],
            "shomaretajshode" => &["shomaretajshode", "plan_numbers"],
            "code" => &["code", "Code"],
            "String" => &["String", "string_count"],
            _ => &[],
        };

        std::iter::once(key)
            .chain(aliases.iter().copied())
            .filter_map(|alias| row.get(alias))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// 解析浮点数（缺失 → None；无法解析 → 错误）
    fn parse_f64(&self, row: &RawRecord, key: &str, row_number: usize) -> ImportResult<Option<f64>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| ImportError::InvalidValue {
                    row: row_number,
                    column: key.to_string(),
                    value: value.clone(),
                    expected: "数字",
                }),
        }
    }

    /// 解析布尔值（缺失 → None）
    fn parse_bool(&self, row: &RawRecord, key: &str, row_number: usize) -> ImportResult<Option<bool>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => match value.to_lowercase().as_str() {
                "true" | "1" | "yes" | "y" | "بله" => Ok(Some(true)),
                "false" | "0" | "no" | "n" | "خیر" => Ok(Some(false)),
                _ => Err(ImportError::InvalidValue {
                    row: row_number,
                    column: key.to_string(),
                    value: value.clone(),
                    expected: "布尔值",
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
    }

    #[test]
    fn test_map_order_row_with_aliases() {
        let row = record(&[
            ("شماره ردیف فاکتور", "A-1"),
            ("meghdarkolesefaresh", "120"),
            ("priority", " 2 "),
            ("tarhetolid", "5012"),
            ("shomaremarhale", "1;2"),
            ("customer", ""),
        ]);
        let mapped = FieldMapper.map_order_row(&row);
        assert_eq!(mapped.row_key(), Some("A-1"));
        assert_eq!(mapped.order_quantity_value(), 120.0);
        assert_eq!(mapped.priority.as_deref(), Some("2"));
        assert_eq!(mapped.customer, None);
    }

    #[test]
    fn test_map_material_parses_numbers_and_flags() {
        let row = record(&[
            ("Title", "5012-CU"),
            ("materialname", "CU"),
            ("vahed", "500"),
            ("marhale", "2"),
            ("faal", "False"),
        ]);
        let material = FieldMapper.map_material(&row, 1).unwrap();
        assert_eq!(material.per_unit_consumption, 500.0);
        assert!(!material.active);

        let defaults = FieldMapper.map_material(&record(&[("Title", "X")]), 2).unwrap();
        assert_eq!(defaults.per_unit_consumption, 0.0);
        assert!(defaults.active);
    }

    #[test]
    fn test_map_material_rejects_garbage() {
        let bad_number = record(&[("vahed", "5oo")]);
        assert!(matches!(
            FieldMapper.map_material(&bad_number, 3),
            Err(ImportError::InvalidValue { row: 3, .. })
        ));

        let bad_flag = record(&[("faal", "maybe")]);
        assert!(FieldMapper.map_material(&bad_flag, 4).is_err());
    }

    #[test]
    fn test_map_plan_detail_and_product() {
        let row = record(&[
            ("marhale", "Insulation"),
            ("rang", "Red"),
            ("barnamerizi", "160"),
            ("shomaretahshode", "101,102"),
        ]);
        let detail = FieldMapper.map_plan_detail(&row);
        assert_eq!(detail.plan_numbers(), vec!["101", "102"]);
        assert_eq!(detail.color(), Some("Red"));

        let product = FieldMapper.map_product(&record(&[("Code", "5012"), ("String", "7")]));
        assert_eq!(product.string_count_value(), Some(7.0));
    }
}
