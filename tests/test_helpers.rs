// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的临时数据库、临时文件与测试数据生成
// ==========================================
#![allow(dead_code)]

use cu_management::domain::{MaterialPerStage, OrderRow};
use std::error::Error;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

/// 创建临时测试数据库路径
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时路径不是 UTF-8")?
        .to_string();
    Ok((temp_file, db_path))
}

/// 写入带扩展名的临时文件（解析器按扩展名选择格式）
pub fn write_temp_file(suffix: &str, content: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = Builder::new().suffix(suffix).tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// 构造订单行
pub fn order_row(key: &str, quantity: &str, priority: Option<&str>) -> OrderRow {
    OrderRow {
        row_key: Some(key.to_string()),
        order_quantity: Some(quantity.to_string()),
        priority: priority.map(|p| p.to_string()),
        ..Default::default()
    }
}

/// 构造带工序/设计代码的订单行
pub fn staged_row(key: &str, quantity: &str, design_code: &str, stages: &str) -> OrderRow {
    OrderRow {
        design_code: Some(design_code.to_string()),
        stage_descriptor: Some(stages.to_string()),
        ..order_row(key, quantity, None)
    }
}

/// 构造物料定额
pub fn material(title: &str, name: &str, per_unit: f64, stage: &str) -> MaterialPerStage {
    MaterialPerStage::new(title, name, per_unit, stage)
}
