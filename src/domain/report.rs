// ==========================================
// 线缆车间生产报工 - 报工单领域模型
// ==========================================
// 对应列表: CUManagement（报工主表）、CUManagementRow（报工明细）
// 对齐: production_report / production_report_row / production_reel 表
// ==========================================

use crate::domain::number::parse_or_zero;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// ReelEntry - 线盘记录（入盘/出盘）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelEntry {
    pub reel_id: i64,        // 线盘ID
    pub reel_title: String,  // 线盘编号
    pub weight: String,      // 重量（kg，文本）
    pub amount: String,      // 长度/数量（文本）
}

impl ReelEntry {
    pub fn weight_value(&self) -> f64 {
        parse_or_zero(Some(&self.weight))
    }
}

// 线盘方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReelDirection {
    Entrance, // 入盘（投料）
    Exit,     // 出盘（产出）
}

impl ReelDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReelDirection::Entrance => "ENTRANCE",
            ReelDirection::Exit => "EXIT",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "ENTRANCE" => Some(ReelDirection::Entrance),
            "EXIT" => Some(ReelDirection::Exit),
            _ => None,
        }
    }
}

// ==========================================
// ShiftInfo / StopInfo - 班次与停机
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftInfo {
    pub id: String,         // 班次ID（可为空）
    pub title: String,      // 班次名称
    pub started_at: String, // 开始时间
    pub ended_at: String,   // 结束时间
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopInfo {
    pub title: String, // 停机原因
    pub code: String,  // 停机代码
    pub time: String,  // 停机时长
}

// ==========================================
// ProductionReport - 报工主记录
// ==========================================
// 红线: 一张卡片一次提交只生成一条主记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionReport {
    // ===== 主键 =====
    pub report_id: String,             // 报工ID (uuid)
    pub production_plan_number: String, // 生产计划号

    // ===== 产量 =====
    pub actual_amount_production: String, // 实际总产量
    pub production_plan_amount: String,   // 计划量（卡片 barnamerizi）
    pub calculated_weight: String,        // 计算重量（同计划量）
    pub actual_weight: String,            // 实际重量
    pub entrance_weight: String,          // 入盘总重（两位小数）
    pub waste: String,                    // 总废料

    // ===== 汇总标识 =====
    pub pre_invoice_row: String, // 订单行号（去重后 "-" 连接）
    pub product_code: String,    // 设计代码（去重后 "-" 连接）
    pub product: String,         // 产品代码（", " 连接）
    pub orders_total_weight: String, // 订单 BOM 总重
    pub orders_total_amount: String, // 订单总量

    // ===== 现场信息 =====
    pub operator: String,    // 操作员
    pub stage: String,       // 工序
    pub device: String,      // 机台
    pub device_id: String,   // 机台ID
    pub description: String, // 备注
    pub shift: ShiftInfo,
    pub stop: StopInfo,

    // ===== 线盘 =====
    pub entrance_reels: Vec<ReelEntry>,
    pub exit_reels: Vec<ReelEntry>,

    pub created_at: NaiveDateTime, // 创建时间
}

// ==========================================
// ProductionReportRow - 报工明细（每个订单行一条）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionReportRow {
    #[serde(rename = "Title")]
    pub title: String,                  // 订单行号
    pub customer: String,               // 客户
    pub production_plan_item: String,   // 生产计划号
    pub actual_amount: String,          // 实际产量（分摊或人工）
    pub order_amount: String,           // 订单量
    pub order_weight: String,           // 订单 BOM 重量（kg）
    pub actual_weight: String,          // 实际耗料（kg）
    pub waste: String,                  // 废料
    pub product: String,                // 产品代码
    pub product_code: String,           // 设计代码
    pub priority: String,               // 优先级原文
    pub level: String,                  // 所选工序
    pub level_number: String,           // 工序号描述
    pub device: String,                 // 机台
}
