// ==========================================
// 线缆车间生产报工 - 工序描述解析
// ==========================================
// 职责: 将工序描述（"2" 或 "1;2;3"）解析为最大工序号
// 调用方: 订单行工序 + 物料定额工序，共用同一规则
// ==========================================

use crate::domain::number::parse_number;

/// 解析工序描述中的最大工序号
///
/// 规则：
/// 1) 缺失或全空白 → None
/// 2) 含 ";" 时：按 ";" 切分、去空白、丢弃空项与非数字项，取最大值；全部无效 → None
/// 3) 不含 ";" 时：直接解析
pub fn max_stage(descriptor: Option<&str>) -> Option<f64> {
    let text = descriptor?.trim();
    if text.is_empty() {
        return None;
    }

    if text.contains(';') {
        text.split(';')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .filter_map(parse_number)
            .reduce(f64::max)
    } else {
        parse_number(text)
    }
}
