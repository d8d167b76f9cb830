// ==========================================
// 线缆车间生产报工 - 分工序物料过滤
// ==========================================
// 职责: 从物料定额中选出某订单行在当前工序及之前适用的物料
// 红线: 订单行无有效工序号时不返回任何物料
// ==========================================

use crate::domain::material::MaterialPerStage;
use crate::domain::order_row::OrderRow;
use crate::engine::stage::max_stage;

/// 按订单行过滤物料定额
///
/// 规则：
/// 1) 订单行有设计代码时，物料 Title 必须包含该代码（区分大小写子串）
/// 2) 订单行最大工序号缺失 → 排除全部物料
/// 3) 物料工序号缺失 → 排除该物料
/// 4) 物料最大工序号 <= 订单行最大工序号 → 保留
pub fn filter_materials_by_stage<'a>(
    materials: &'a [MaterialPerStage],
    row: &OrderRow,
) -> Vec<&'a MaterialPerStage> {
    let Some(row_max) = max_stage(row.stage_descriptor()) else {
        return Vec::new();
    };
    let design_code = row.design_code();

    materials
        .iter()
        .filter(|material| match design_code {
            Some(code) => material.title_contains(code),
            None => true,
        })
        .filter(|material| {
            max_stage(material.stage_descriptor.as_deref())
                .map(|stage| stage <= row_max)
                .unwrap_or(false)
        })
        .collect()
}
