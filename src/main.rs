// ==========================================
// 线缆车间生产报工 - 命令行入口
// ==========================================
// 职责: 解析命令 → 打开数据库 → 调用 API → 输出 JSON
// ==========================================

mod cli;

use anyhow::{anyhow, Context};
use clap::Parser;
use cli::{Cli, Commands, ConfigAction, ReportAction, SourceArgs};
use cu_management::api::{ConfigApi, EntrySources, ProductionEntryApi};
use cu_management::config::ConfigManager;
use cu_management::db::{get_default_db_path, open_sqlite_connection};
use cu_management::domain::form::{
    FormState, FIELD_ACTUAL_AMOUNT_PRODUCTION, FIELD_ACTUAL_WEIGHT, FIELD_DESCRIPTION,
    FIELD_PRODUCTION_UNIT, FIELD_WASTE,
};
use cu_management::engine::submission::ReportHeaderInput;
use cu_management::repository::ProductionReportRepository;
use cu_management::{logging, APP_NAME, VERSION};
use serde::Serialize;
use serde_json::json;
use std::sync::{Arc, Mutex};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "命令执行失败");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

struct Apis {
    entry_api: ProductionEntryApi,
    config_api: ConfigApi,
}

fn open_apis(cli: &Cli) -> anyhow::Result<Apis> {
    let db_path = match &cli.db {
        Some(path) => path.to_string_lossy().into_owned(),
        None => get_default_db_path(),
    };
    tracing::info!(app = APP_NAME, version = VERSION, db_path = %db_path, "打开数据库");

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    let conn = Arc::new(Mutex::new(conn));

    let config_manager = Arc::new(
        ConfigManager::from_connection(conn.clone()).map_err(|e| anyhow!(e.to_string()))?,
    );
    let report_repo = Arc::new(ProductionReportRepository::from_connection(conn)?);

    let entry_api = ProductionEntryApi::from_config(config_manager.as_ref(), report_repo)?;
    Ok(Apis {
        entry_api,
        config_api: ConfigApi::new(config_manager),
    })
}

fn entry_sources(args: SourceArgs) -> EntrySources {
    EntrySources {
        rows: args.rows,
        materials: args.materials,
        products: args.products,
        plan_details: args.plan_details,
        stage: args.stage,
        color: args.color,
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = open_apis(&cli)?;

    match cli.command {
        Commands::Allocate {
            sources,
            total,
            waste,
        } => {
            let data = ctx.entry_api.load_entry_data(&entry_sources(sources))?;
            let mut form = FormState::new();
            form.set(FIELD_ACTUAL_AMOUNT_PRODUCTION, total);
            if let Some(waste) = waste {
                form.set(FIELD_WASTE, waste);
            }

            let preview = ctx.entry_api.preview(&data, &form)?;
            print_json(&json!({
                "actualProduction": preview.production,
                "waste": preview.waste,
            }))
        }

        Commands::Consumption {
            sources,
            total,
            waste,
            unit,
        } => {
            let data = ctx.entry_api.load_entry_data(&entry_sources(sources))?;
            let mut form = FormState::new();
            form.set(FIELD_ACTUAL_AMOUNT_PRODUCTION, total);
            if let Some(waste) = waste {
                form.set(FIELD_WASTE, waste);
            }
            if let Some(unit) = unit {
                form.set(FIELD_PRODUCTION_UNIT, unit);
            }

            let preview = ctx.entry_api.preview(&data, &form)?;
            print_json(&json!({
                "actualProduction": preview.production,
                "waste": preview.waste,
                "actualMaterialConsumption": preview.consumption,
                "consumptionPerString": preview.consumption_per_string,
                "plannedBomConsumption": preview.planned_bom_consumption,
                "copper": preview.copper,
            }))
        }

        Commands::Submit {
            sources,
            plan,
            total,
            waste,
            actual_weight,
            description,
            operator,
            device_id,
            overrides,
            header,
        } => {
            let stage = sources.stage.clone();
            let data = ctx.entry_api.load_entry_data(&entry_sources(sources))?;

            let mut form = FormState::new();
            for (key, value) in [
                (FIELD_ACTUAL_AMOUNT_PRODUCTION, total),
                (FIELD_WASTE, waste),
                (FIELD_ACTUAL_WEIGHT, actual_weight),
                (FIELD_DESCRIPTION, description),
            ] {
                if let Some(value) = value {
                    form.set(key, value);
                }
            }
            for pair in &overrides {
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| anyhow!("无效的表单覆盖值（应为 key=value）: {}", pair))?;
                form.set(key.trim(), value.trim());
            }

            let mut header_input = match header {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("无法读取报工头文件: {}", path.display()))?;
                    serde_json::from_str::<ReportHeaderInput>(&text)
                        .with_context(|| format!("报工头文件格式错误: {}", path.display()))?
                }
                None => ReportHeaderInput::default(),
            };
            header_input.production_plan_number = plan;
            if header_input.selected_stage.is_none() {
                header_input.selected_stage = stage;
            }
            if !operator.is_empty() {
                header_input.operator = operator;
            }
            if !device_id.is_empty() {
                header_input.device_id = device_id;
            }

            let response = ctx.entry_api.submit(&data, &form, &header_input)?;
            print_json(&response)
        }

        Commands::Report { action } => match action {
            ReportAction::Show { report_id } => print_json(&ctx.entry_api.get_report(&report_id)?),
            ReportAction::List { plan } => print_json(&ctx.entry_api.list_reports(&plan)?),
        },

        Commands::Config { action } => match action {
            ConfigAction::Get { key: Some(key) } => print_json(&ctx.config_api.get_config(&key)?),
            ConfigAction::Get { key: None } => print_json(&json!({
                "items": ctx.config_api.list_configs()?,
                "effective": ctx.config_api.effective_rules()?,
            })),
            ConfigAction::Set { key, value } => {
                ctx.config_api.update_config(&key, &value)?;
                print_json(&ctx.config_api.get_config(&key)?)
            }
            ConfigAction::Snapshot => {
                println!("{}", ctx.config_api.get_config_snapshot()?);
                Ok(())
            }
            ConfigAction::Restore { file } => {
                let text = std::fs::read_to_string(&file)
                    .with_context(|| format!("无法读取快照文件: {}", file.display()))?;
                let count = ctx.config_api.restore_config_from_snapshot(&text)?;
                print_json(&json!({ "restored": count }))
            }
        },
    }
}
