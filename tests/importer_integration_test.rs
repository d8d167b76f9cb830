// ==========================================
// 导入层集成测试
// ==========================================
// 测试目标: CSV/JSON 导出文件 → 领域模型
// ==========================================

mod test_helpers;

use cu_management::importer::{ImportError, PlanDataImporter};
use test_helpers::write_temp_file;

#[test]
fn test_order_rows_from_csv_with_display_labels() {
    let file = write_temp_file(
        ".csv",
        "\u{feff}شماره ردیف فاکتور,مقدار کل سفارش,اولویت,طرح تولید,شماره مرحله\n\
         A-1,30,1,5012,1;2\n\
         B-1,,,5012,\n",
    )
    .unwrap();

    let rows = PlanDataImporter::new().load_order_rows(file.path()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].row_key(), Some("A-1"));
    assert_eq!(rows[0].order_quantity_value(), 30.0);
    assert_eq!(rows[0].priority_value(), Some(1.0));
    assert_eq!(rows[0].stage_descriptor(), Some("1;2"));

    assert_eq!(rows[1].order_quantity_value(), 0.0);
    assert_eq!(rows[1].priority_value(), None);
}

#[test]
fn test_materials_from_list_json_payload() {
    let file = write_temp_file(
        ".json",
        r#"{"value": [
            {"Title": "5012", "materialname": "CU", "vahed": 500, "marhale": 2, "faal": true},
            {"Title": "5012", "materialname": "TICU", "vahed": "120.5", "marhale": "1;3", "faal": false}
        ]}"#,
    )
    .unwrap();

    let materials = PlanDataImporter::new().load_materials(file.path()).unwrap();
    assert_eq!(materials.len(), 1);
    assert_eq!(materials[0].per_unit_consumption, 500.0);
    assert_eq!(materials[0].stage_descriptor.as_deref(), Some("2"));
}

#[test]
fn test_unsupported_extension() {
    let file = write_temp_file(".txt", "a,b\n1,2\n").unwrap();
    let err = PlanDataImporter::new().load_order_rows(file.path()).unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat(_)));
}
