// ==========================================
// 线缆车间生产报工 - 订单行优先级排序
// ==========================================
// 职责: 按优先级升序排列订单行，供分摊引擎使用
// 输入: 过滤后的订单行
// 输出: 排序后的订单行（新列表，输入不变）
// ==========================================

use crate::domain::order_row::OrderRow;
use std::cmp::Ordering;

// ==========================================
// PrioritySorter - 优先级排序引擎
// ==========================================
pub struct PrioritySorter {
    // 无状态引擎,不需要注入依赖
}

impl PrioritySorter {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 排序订单行
    ///
    /// 排序键:
    /// 1) 有效优先级升序（数值越小越优先）
    /// 2) 缺失/无法解析的优先级排在最后
    /// 3) 同优先级保持原有顺序（稳定排序）
    pub fn sort(&self, rows: &[OrderRow]) -> Vec<OrderRow> {
        let mut sorted = rows.to_vec();
        sorted.sort_by(|a, b| self.compare(a, b));
        sorted
    }

    /// 比较两个订单行
    pub fn compare(&self, a: &OrderRow, b: &OrderRow) -> Ordering {
        match (a.priority_value(), b.priority_value()) {
            (Some(pa), Some(pb)) => pa.total_cmp(&pb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl Default for PrioritySorter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn create_test_row(key: &str, priority: Option<&str>) -> OrderRow {
        OrderRow {
            row_key: Some(key.to_string()),
            order_quantity: Some("100".to_string()),
            priority: priority.map(|p| p.to_string()),
            ..Default::default()
        }
    }

    fn keys(rows: &[OrderRow]) -> Vec<&str> {
        rows.iter().filter_map(|r| r.row_key()).collect()
    }

    #[test]
    fn test_sort_ascending_priority() {
        let sorter = PrioritySorter::new();
        let rows = vec![
            create_test_row("C", Some("3")),
            create_test_row("A", Some("1")),
            create_test_row("B", Some("2")),
        ];
        assert_eq!(keys(&sorter.sort(&rows)), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_missing_priority_sorts_last() {
        let sorter = PrioritySorter::new();
        let rows = vec![
            create_test_row("X", None),
            create_test_row("Y", Some("abc")),
            create_test_row("A", Some("2")),
            create_test_row("Z", Some("  ")),
            create_test_row("B", Some("1")),
        ];
        assert_eq!(keys(&sorter.sort(&rows)), vec!["B", "A", "X", "Y", "Z"]);
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let sorter = PrioritySorter::new();
        let rows = vec![
            create_test_row("A", Some("1")),
            create_test_row("B", Some("1.0")),
            create_test_row("C", Some(" 1 ")),
        ];
        assert_eq!(keys(&sorter.sort(&rows)), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_all_missing_keeps_order_and_input_untouched() {
        let sorter = PrioritySorter::new();
        let rows = vec![create_test_row("B", None), create_test_row("A", None)];
        let sorted = sorter.sort(&rows);
        assert_eq!(keys(&sorted), vec!["B", "A"]);
        assert_eq!(keys(&rows), vec!["B", "A"]);
    }
}
