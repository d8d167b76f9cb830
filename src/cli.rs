// ==========================================
// 线缆车间生产报工 - 命令行定义
// ==========================================
// 工具: clap derive
// 输出: JSON（stdout）；日志写 stderr
// ==========================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cu-entry")]
#[command(version)]
#[command(about = "线缆车间生产报工: 产量分摊与 BOM 耗料计算")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 数据库路径（默认: CU_ENTRY_DB_PATH 或用户数据目录）
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// 输出 JSON 结构化日志
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// 订单行/物料/卡片来源文件
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// 订单行文件（csv/xlsx/json）
    #[arg(long)]
    pub rows: PathBuf,

    /// 物料定额文件
    #[arg(long)]
    pub materials: Option<PathBuf>,

    /// 产品主数据文件（每股耗料计算）
    #[arg(long)]
    pub products: Option<PathBuf>,

    /// 卡片文件
    #[arg(long)]
    pub plan_details: Option<PathBuf>,

    /// 所选工序
    #[arg(long)]
    pub stage: Option<String>,

    /// 所选颜色
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 分摊产量（和废料）到订单行
    Allocate {
        #[command(flatten)]
        sources: SourceArgs,

        /// 上报总产量
        #[arg(long)]
        total: String,

        /// 上报总废料
        #[arg(long)]
        waste: Option<String>,
    },

    /// 计算实际耗料（含分摊结果）
    Consumption {
        #[command(flatten)]
        sources: SourceArgs,

        /// 上报总产量
        #[arg(long)]
        total: String,

        /// 上报总废料
        #[arg(long)]
        waste: Option<String>,

        /// 计量单位（填写时输出 CU/TICU 铜料拆分）
        #[arg(long)]
        unit: Option<String>,
    },

    /// 提交报工并写入数据库
    Submit {
        #[command(flatten)]
        sources: SourceArgs,

        /// 生产计划号
        #[arg(long)]
        plan: String,

        /// 上报总产量
        #[arg(long)]
        total: Option<String>,

        /// 上报总废料
        #[arg(long)]
        waste: Option<String>,

        /// 实际重量
        #[arg(long)]
        actual_weight: Option<String>,

        /// 备注
        #[arg(long)]
        description: Option<String>,

        /// 操作员
        #[arg(long, default_value = "")]
        operator: String,

        /// 机台ID
        #[arg(long, default_value = "")]
        device_id: String,

        /// 表单覆盖值，格式 key=value（如 A-1.actualProduction=12）
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,

        /// 报工头信息 JSON 文件（班次、停机、线盘）
        #[arg(long)]
        header: Option<PathBuf>,
    },

    /// 查询报工单
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },

    /// 配置管理
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ReportAction {
    /// 按报工ID查看详情
    Show { report_id: String },

    /// 按计划号列出报工单
    List {
        #[arg(long)]
        plan: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// 查看配置（不指定键时列出全部）
    Get { key: Option<String> },

    /// 设置配置
    Set { key: String, value: String },

    /// 导出配置快照
    Snapshot,

    /// 从快照文件恢复配置
    Restore { file: PathBuf },
}
