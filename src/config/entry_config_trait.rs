// ==========================================
// 线缆车间生产报工 - 报工配置读取 Trait
// ==========================================
// 职责: 定义引擎参数的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::engine::rules::EntryRules;
use std::error::Error;

// ==========================================
// EntryConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
pub trait EntryConfigReader: Send + Sync {
    /// 参与分摊的最小订单量
    ///
    /// # 默认值
    /// - 10
    fn get_min_order_quantity(&self) -> Result<f64, Box<dyn Error>>;

    /// 废料/耗料克→千克折算阈值
    ///
    /// # 默认值
    /// - 1000
    fn get_unit_normalize_threshold(&self) -> Result<f64, Box<dyn Error>>;

    /// 订单行号汇总最大长度
    ///
    /// # 默认值
    /// - 65536
    fn get_pre_invoice_max_len(&self) -> Result<usize, Box<dyn Error>>;

    /// 米制计量单位标签
    ///
    /// # 默认值
    /// - "متر"
    fn get_metre_unit_label(&self) -> Result<String, Box<dyn Error>>;

    /// 装配完整的引擎参数
    fn load_rules(&self) -> Result<EntryRules, Box<dyn Error>> {
        Ok(EntryRules {
            min_order_quantity: self.get_min_order_quantity()?,
            unit_normalize_threshold: self.get_unit_normalize_threshold()?,
            pre_invoice_max_len: self.get_pre_invoice_max_len()?,
            metre_unit_label: self.get_metre_unit_label()?,
        })
    }
}
