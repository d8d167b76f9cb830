// ==========================================
// 线缆车间生产报工 - 订单量过滤
// ==========================================
// 职责: 剔除订单量低于阈值的订单行（不参与分摊）
// 红线: 订单量缺失或无法解析按 0 处理
// ==========================================

use crate::domain::order_row::OrderRow;

/// 默认最小订单量
pub const DEFAULT_MIN_ORDER_QUANTITY: f64 = 10.0;

pub struct QuantityFilter {
    min_quantity: f64,
}

impl QuantityFilter {
    pub fn new(min_quantity: f64) -> Self {
        Self { min_quantity }
    }

    pub fn min_quantity(&self) -> f64 {
        self.min_quantity
    }

    /// 保留订单量 >= 阈值的行，保持原有顺序
    pub fn filter(&self, rows: &[OrderRow]) -> Vec<OrderRow> {
        filter_by_min_quantity(rows, self.min_quantity)
    }
}

impl Default for QuantityFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ORDER_QUANTITY)
    }
}

pub fn filter_by_min_quantity(rows: &[OrderRow], min_quantity: f64) -> Vec<OrderRow> {
    rows.iter()
        .filter(|row| row.order_quantity_value() >= min_quantity)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, qty: Option<&str>) -> OrderRow {
        OrderRow {
            row_key: Some(key.to_string()),
            order_quantity: qty.map(|q| q.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_threshold_is_inclusive() {
        let rows = vec![
            row("A", Some("9.99")),
            row("B", Some("10")),
            row("C", Some("250")),
        ];
        let kept = QuantityFilter::default().filter(&rows);
        let keys: Vec<_> = kept.iter().filter_map(|r| r.row_key()).collect();
        assert_eq!(keys, vec!["B", "C"]);
    }

    #[test]
    fn test_missing_or_garbage_quantity_is_zero() {
        let rows = vec![row("A", None), row("B", Some("abc")), row("C", Some("0"))];
        assert!(filter_by_min_quantity(&rows, 10.0).is_empty());
        assert_eq!(filter_by_min_quantity(&rows, 0.0).len(), 3);
    }

    #[test]
    fn test_custom_threshold() {
        let rows = vec![row("A", Some("5")), row("B", Some("50"))];
        let kept = QuantityFilter::new(1.0).filter(&rows);
        assert_eq!(kept.len(), 2);
        assert_eq!(QuantityFilter::new(1.0).min_quantity(), 1.0);
    }
}
