// ==========================================
// 线缆车间生产报工 - 数值文本解析
// ==========================================
// 职责: 列表数据与表单输入均为自由文本，统一在此解析
// 红线: 解析失败不报错，返回 None，由调用方决定回退值
// ==========================================

use serde::{Deserialize, Deserializer};

/// 宽松解析浮点数
///
/// 规则：
/// 1) 去掉前导空白
/// 2) 取最长的合法十进制前缀（符号、整数、小数、指数）
/// 3) 前缀为空或结果非有限值 → None
///
/// # 示例
/// - `"12.5"` → Some(12.5)
/// - `" 30kg"` → Some(30.0)
/// - `"abc"` / `""` → None
pub fn parse_number(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }

    if digits == 0 {
        return None;
    }
    let mut end = i;

    // 指数部分必须至少有一位数字，否则只取尾数
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 解析可选文本，缺失或无法解析时回退为 0
pub fn parse_or_zero(text: Option<&str>) -> f64 {
    text.and_then(parse_number).unwrap_or(0.0)
}

/// 两位小数格式化（负零归一为 "0.00"）
pub fn format_fixed2(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    if formatted == "-0.00" {
        "0.00".to_string()
    } else {
        formatted
    }
}

/// 四舍五入到两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ==========================================
// serde 辅助: 文本或数字 → Option<String>
// ==========================================
// 列表导出的数值字段有时是 JSON 数字，有时是字符串
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<TextOrNumber> = Option::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Int(i) => i.to_string(),
        TextOrNumber::Float(f) => f.to_string(),
        TextOrNumber::Bool(b) => b.to_string(),
    }))
}

pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let text = lenient_text(deserializer)?;
    Ok(parse_or_zero(text.as_deref()))
}
