// ==========================================
// 线缆车间生产报工 - 报工 API
// ==========================================
// 职责: 串联 导入 → 引擎计算 → 提交校验 → 持久化
// 红线: 输入校验在 API 层完成，引擎只接收已校验数据
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::entry_config_trait::EntryConfigReader;
use crate::domain::form::{FormState, FIELD_ACTUAL_AMOUNT_PRODUCTION, FIELD_WASTE};
use crate::domain::material::{MaterialPerStage, ProductSpec};
use crate::domain::number::parse_number;
use crate::domain::order_row::OrderRow;
use crate::domain::plan::PlanDetail;
use crate::domain::report::{ProductionReport, ProductionReportRow};
use crate::engine::orchestrator::{EntryPreview, ProductionEntryService};
use crate::engine::plan_detail::{filter_plan_details, unique_colors};
use crate::engine::rules::EntryRules;
use crate::engine::submission::ReportHeaderInput;
use crate::importer::plan_data_importer::PlanDataImporter;
use crate::repository::production_report_repo::ProductionReportRepository;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

// ==========================================
// 请求/响应 DTO
// ==========================================

/// 报工数据来源（列表导出文件）
#[derive(Debug, Clone, Default)]
pub struct EntrySources {
    pub rows: PathBuf,                 // 订单行
    pub materials: Option<PathBuf>,    // 物料定额
    pub products: Option<PathBuf>,     // 产品主数据
    pub plan_details: Option<PathBuf>, // 卡片
    pub stage: Option<String>,         // 所选工序
    pub color: Option<String>,         // 所选颜色
}

/// 已加载的报工数据
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryData {
    pub rows: Vec<OrderRow>,
    pub materials: Vec<MaterialPerStage>,
    pub products: Vec<ProductSpec>,
    pub card: PlanDetail,
}

/// 提交结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub report_id: String,
    pub rows_written: usize,
    pub reset_keys: Vec<String>,
}

/// 报工单详情（主记录 + 明细）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetail {
    pub report: ProductionReport,
    pub rows: Vec<ProductionReportRow>,
}

// ==========================================
// ProductionEntryApi - 报工 API
// ==========================================
pub struct ProductionEntryApi {
    service: ProductionEntryService,
    importer: PlanDataImporter,
    report_repo: Arc<ProductionReportRepository>,
}

impl ProductionEntryApi {
    /// 创建新的ProductionEntryApi实例
    pub fn new(rules: EntryRules, report_repo: Arc<ProductionReportRepository>) -> Self {
        Self {
            service: ProductionEntryService::new(rules),
            importer: PlanDataImporter::new(),
            report_repo,
        }
    }

    /// 从配置读取引擎参数后创建
    pub fn from_config(
        config: &dyn EntryConfigReader,
        report_repo: Arc<ProductionReportRepository>,
    ) -> ApiResult<Self> {
        let rules = config
            .load_rules()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        Ok(Self::new(rules, report_repo))
    }

    pub fn rules(&self) -> &EntryRules {
        self.service.rules()
    }

    /// 读取报工数据
    ///
    /// 卡片按 工序/颜色 过滤后取第一张，订单行只保留卡片关联的计划号；
    /// 未提供卡片文件时为空卡片，订单行全部保留
    #[instrument(skip(self, sources), fields(rows = %sources.rows.display()))]
    pub fn load_entry_data(&self, sources: &EntrySources) -> ApiResult<EntryData> {
        let card = match &sources.plan_details {
            Some(path) => {
                let details = self.importer.load_plan_details(path)?;
                select_card(&details, sources.stage.as_deref(), sources.color.as_deref())?
            }
            None => PlanDetail {
                stage: sources.stage.clone(),
                color: sources.color.clone(),
                ..Default::default()
            },
        };

        let rows = if sources.plan_details.is_some() {
            let plan_numbers = card.plan_numbers();
            debug!(plan_numbers = ?plan_numbers, "按卡片计划号读取订单行");
            self.importer
                .load_order_rows_for_plans(&sources.rows, &plan_numbers)?
        } else {
            self.importer.load_order_rows(&sources.rows)?
        };

        let materials = match &sources.materials {
            Some(path) => self.importer.load_materials(path)?,
            None => Vec::new(),
        };
        let products = match &sources.products {
            Some(path) => self.importer.load_products(path)?,
            None => Vec::new(),
        };

        Ok(EntryData {
            rows,
            materials,
            products,
            card,
        })
    }

    /// 计算报工预览
    pub fn preview(&self, data: &EntryData, form: &FormState) -> ApiResult<EntryPreview> {
        validate_amount(form, FIELD_ACTUAL_AMOUNT_PRODUCTION)?;
        validate_amount(form, FIELD_WASTE)?;

        Ok(self
            .service
            .preview(&data.rows, &data.materials, &data.products, &data.card, form))
    }

    /// 提交报工
    ///
    /// # 流程
    /// 1. 校验计划号与总量
    /// 2. 组装主记录与明细
    /// 3. 单事务写入
    ///
    /// 成功后调用方按 `reset_keys` 清空表单
    #[instrument(skip_all, fields(plan = %header.production_plan_number))]
    pub fn submit(
        &self,
        data: &EntryData,
        form: &FormState,
        header: &ReportHeaderInput,
    ) -> ApiResult<SubmitResponse> {
        if header.production_plan_number.trim().is_empty() {
            return Err(ApiError::InvalidInput("生产计划号不能为空".to_string()));
        }
        validate_amount(form, FIELD_ACTUAL_AMOUNT_PRODUCTION)?;
        validate_amount(form, FIELD_WASTE)?;

        let submission = self.service.prepare_submission(
            &data.rows,
            &data.materials,
            &data.card,
            form,
            header,
            Local::now().naive_local(),
        );

        if submission.rows.is_empty() {
            warn!("没有可提交的订单行明细，仅写入主记录");
        }

        let rows_written = self
            .report_repo
            .insert_report(&submission.report, &submission.rows)?;

        info!(
            report_id = %submission.report.report_id,
            rows_written,
            "报工提交成功"
        );

        Ok(SubmitResponse {
            report_id: submission.report.report_id,
            rows_written,
            reset_keys: submission.reset_keys,
        })
    }

    /// 查询报工单详情
    pub fn get_report(&self, report_id: &str) -> ApiResult<ReportDetail> {
        let report = self
            .report_repo
            .find_by_id(report_id)?
            .ok_or_else(|| ApiError::NotFound(format!("报工单(id={})不存在", report_id)))?;
        let rows = self.report_repo.find_rows(report_id)?;
        Ok(ReportDetail { report, rows })
    }

    /// 按计划号查询报工单
    pub fn list_reports(&self, production_plan_number: &str) -> ApiResult<Vec<ProductionReport>> {
        if production_plan_number.trim().is_empty() {
            return Err(ApiError::InvalidInput("生产计划号不能为空".to_string()));
        }
        Ok(self.report_repo.list_by_plan_number(production_plan_number.trim())?)
    }
}

/// 总量字段: 为空可接受；非空时必须是非负数
fn validate_amount(form: &FormState, field: &str) -> ApiResult<()> {
    let Some(raw) = form.value(field) else {
        return Ok(());
    };
    match parse_number(raw) {
        Some(v) if v >= 0.0 => Ok(()),
        _ => Err(ApiError::InvalidInput(format!(
            "{} 必须是非负数: {}",
            field, raw
        ))),
    }
}

/// 按工序/颜色选卡片
fn select_card(
    details: &[PlanDetail],
    stage: Option<&str>,
    color: Option<&str>,
) -> ApiResult<PlanDetail> {
    let colors = unique_colors(details, stage);
    let matched = filter_plan_details(details, stage, color, &colors);

    match matched.first() {
        Some(card) => Ok((*card).clone()),
        None if colors.is_empty() => Err(ApiError::NotFound(format!(
            "工序 {} 没有对应卡片",
            stage.unwrap_or_default()
        ))),
        None => Err(ApiError::InvalidInput(format!(
            "需要选择颜色，可选: {}",
            colors.join(", ")
        ))),
    }
}
