// ==========================================
// 线缆车间生产报工 - 报工单仓储
// ==========================================
// 表: production_report / production_report_row / production_reel
// 红线: Repository 不含业务逻辑
// 红线: 主记录与明细在同一事务中写入
// ==========================================

use crate::domain::report::{
    ProductionReport, ProductionReportRow, ReelDirection, ReelEntry, ShiftInfo, StopInfo,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const REPORT_COLUMNS: &str = r#"
    report_id, production_plan_number,
    actual_amount_production, production_plan_amount, calculated_weight,
    actual_weight, entrance_weight, waste,
    pre_invoice_row, product_code, product, orders_total_weight, orders_total_amount,
    operator, stage, device, device_id, description,
    shift_id, shift_title, shift_started_at, shift_ended_at,
    stop_title, stop_code, stop_time,
    created_at
"#;

// ==========================================
// ProductionReportRepository - 报工单仓储
// ==========================================
pub struct ProductionReportRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionReportRepository {
    /// 创建新的 ProductionReportRepository 实例（自动建表）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_tables()?;
        Ok(repo)
    }

    /// 从已有连接创建仓储实例（自动建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_tables()?;
        Ok(repo)
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_tables(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS production_report (
                report_id TEXT PRIMARY KEY,
                production_plan_number TEXT NOT NULL,
                actual_amount_production TEXT NOT NULL,
                production_plan_amount TEXT NOT NULL,
                calculated_weight TEXT NOT NULL,
                actual_weight TEXT NOT NULL,
                entrance_weight TEXT NOT NULL,
                waste TEXT NOT NULL,
                pre_invoice_row TEXT NOT NULL,
                product_code TEXT NOT NULL,
                product TEXT NOT NULL,
                orders_total_weight TEXT NOT NULL,
                orders_total_amount TEXT NOT NULL,
                operator TEXT NOT NULL,
                stage TEXT NOT NULL,
                device TEXT NOT NULL,
                device_id TEXT NOT NULL,
                description TEXT NOT NULL,
                shift_id TEXT NOT NULL,
                shift_title TEXT NOT NULL,
                shift_started_at TEXT NOT NULL,
                shift_ended_at TEXT NOT NULL,
                stop_title TEXT NOT NULL,
                stop_code TEXT NOT NULL,
                stop_time TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_production_report_plan
                ON production_report(production_plan_number);

            CREATE TABLE IF NOT EXISTS production_report_row (
                report_id TEXT NOT NULL REFERENCES production_report(report_id) ON DELETE CASCADE,
                seq INTEGER NOT NULL,
                title TEXT NOT NULL,
                customer TEXT NOT NULL,
                production_plan_item TEXT NOT NULL,
                actual_amount TEXT NOT NULL,
                order_amount TEXT NOT NULL,
                order_weight TEXT NOT NULL,
                actual_weight TEXT NOT NULL,
                waste TEXT NOT NULL,
                product TEXT NOT NULL,
                product_code TEXT NOT NULL,
                priority TEXT NOT NULL,
                level TEXT NOT NULL,
                level_number TEXT NOT NULL,
                device TEXT NOT NULL,
                PRIMARY KEY (report_id, seq)
            );

            CREATE TABLE IF NOT EXISTS production_reel (
                report_id TEXT NOT NULL REFERENCES production_report(report_id) ON DELETE CASCADE,
                direction TEXT NOT NULL,
                seq INTEGER NOT NULL,
                reel_id INTEGER NOT NULL,
                reel_title TEXT NOT NULL,
                weight TEXT NOT NULL,
                amount TEXT NOT NULL,
                PRIMARY KEY (report_id, direction, seq)
            );
            "#,
        )?;
        Ok(())
    }

    /// 写入报工单（主记录 + 明细 + 线盘，单事务）
    ///
    /// # 返回
    /// - Ok(usize): 写入的明细行数
    pub fn insert_report(
        &self,
        report: &ProductionReport,
        rows: &[ProductionReportRow],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            &format!(
                "INSERT INTO production_report ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26)",
                REPORT_COLUMNS
            ),
            params![
                report.report_id,
                report.production_plan_number,
                report.actual_amount_production,
                report.production_plan_amount,
                report.calculated_weight,
                report.actual_weight,
                report.entrance_weight,
                report.waste,
                report.pre_invoice_row,
                report.product_code,
                report.product,
                report.orders_total_weight,
                report.orders_total_amount,
                report.operator,
                report.stage,
                report.device,
                report.device_id,
                report.description,
                report.shift.id,
                report.shift.title,
                report.shift.started_at,
                report.shift.ended_at,
                report.stop.title,
                report.stop.code,
                report.stop.time,
                report.created_at.format(DATETIME_FORMAT).to_string(),
            ],
        )?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO production_report_row (
                    report_id, seq, title, customer, production_plan_item,
                    actual_amount, order_amount, order_weight, actual_weight, waste,
                    product, product_code, priority, level, level_number, device
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
                "#,
            )?;
            for (seq, row) in rows.iter().enumerate() {
                stmt.execute(params![
                    report.report_id,
                    seq as i64,
                    row.title,
                    row.customer,
                    row.production_plan_item,
                    row.actual_amount,
                    row.order_amount,
                    row.order_weight,
                    row.actual_weight,
                    row.waste,
                    row.product,
                    row.product_code,
                    row.priority,
                    row.level,
                    row.level_number,
                    row.device,
                ])?;
            }

            let mut reel_stmt = tx.prepare(
                r#"
                INSERT INTO production_reel (
                    report_id, direction, seq, reel_id, reel_title, weight, amount
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )?;
            let reels = report
                .entrance_reels
                .iter()
                .enumerate()
                .map(|(i, r)| (ReelDirection::Entrance, i, r))
                .chain(
                    report
                        .exit_reels
                        .iter()
                        .enumerate()
                        .map(|(i, r)| (ReelDirection::Exit, i, r)),
                );
            for (direction, seq, reel) in reels {
                reel_stmt.execute(params![
                    report.report_id,
                    direction.as_str(),
                    seq as i64,
                    reel.reel_id,
                    reel.reel_title,
                    reel.weight,
                    reel.amount,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        info!(
            report_id = %report.report_id,
            plan_number = %report.production_plan_number,
            rows = rows.len(),
            "报工单已写入"
        );
        Ok(rows.len())
    }

    /// 按报工ID查询主记录（含线盘）
    pub fn find_by_id(&self, report_id: &str) -> RepositoryResult<Option<ProductionReport>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM production_report WHERE report_id = ?1",
            REPORT_COLUMNS
        ))?;

        let result = stmt.query_row(params![report_id], map_report);
        let mut report = match result {
            Ok(report) => report,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        load_reels(&conn, &mut report)?;
        Ok(Some(report))
    }

    /// 按生产计划号查询报工单（按创建时间倒序）
    pub fn list_by_plan_number(
        &self,
        production_plan_number: &str,
    ) -> RepositoryResult<Vec<ProductionReport>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM production_report WHERE production_plan_number = ?1 ORDER BY created_at DESC, report_id",
            REPORT_COLUMNS
        ))?;

        let mut reports = stmt
            .query_map(params![production_plan_number], map_report)?
            .collect::<SqliteResult<Vec<_>>>()?;

        for report in reports.iter_mut() {
            load_reels(&conn, report)?;
        }

        debug!(plan_number = production_plan_number, count = reports.len(), "报工单查询完成");
        Ok(reports)
    }

    /// 查询报工明细（按写入顺序）
    pub fn find_rows(&self, report_id: &str) -> RepositoryResult<Vec<ProductionReportRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                title, customer, production_plan_item,
                actual_amount, order_amount, order_weight, actual_weight, waste,
                product, product_code, priority, level, level_number, device
            FROM production_report_row
            WHERE report_id = ?1
            ORDER BY seq
            "#,
        )?;

        let rows = stmt
            .query_map(params![report_id], |row| {
                Ok(ProductionReportRow {
                    title: row.get(0)?,
                    customer: row.get(1)?,
                    production_plan_item: row.get(2)?,
                    actual_amount: row.get(3)?,
                    order_amount: row.get(4)?,
                    order_weight: row.get(5)?,
                    actual_weight: row.get(6)?,
                    waste: row.get(7)?,
                    product: row.get(8)?,
                    product_code: row.get(9)?,
                    priority: row.get(10)?,
                    level: row.get(11)?,
                    level_number: row.get(12)?,
                    device: row.get(13)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }
}

fn map_report(row: &Row<'_>) -> SqliteResult<ProductionReport> {
    let created_at_text: String = row.get(25)?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_text, DATETIME_FORMAT)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(25, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(ProductionReport {
        report_id: row.get(0)?,
        production_plan_number: row.get(1)?,
        actual_amount_production: row.get(2)?,
        production_plan_amount: row.get(3)?,
        calculated_weight: row.get(4)?,
        actual_weight: row.get(5)?,
        entrance_weight: row.get(6)?,
        waste: row.get(7)?,
        pre_invoice_row: row.get(8)?,
        product_code: row.get(9)?,
        product: row.get(10)?,
        orders_total_weight: row.get(11)?,
        orders_total_amount: row.get(12)?,
        operator: row.get(13)?,
        stage: row.get(14)?,
        device: row.get(15)?,
        device_id: row.get(16)?,
        description: row.get(17)?,
        shift: ShiftInfo {
            id: row.get(18)?,
            title: row.get(19)?,
            started_at: row.get(20)?,
            ended_at: row.get(21)?,
        },
        stop: StopInfo {
            title: row.get(22)?,
            code: row.get(23)?,
            time: row.get(24)?,
        },
        entrance_reels: Vec::new(),
        exit_reels: Vec::new(),
        created_at,
    })
}

fn load_reels(conn: &Connection, report: &mut ProductionReport) -> RepositoryResult<()> {
    let mut stmt = conn.prepare(
        r#"
        SELECT direction, reel_id, reel_title, weight, amount
        FROM production_reel
        WHERE report_id = ?1
        ORDER BY direction, seq
        "#,
    )?;

    let reels = stmt
        .query_map(params![report.report_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                ReelEntry {
                    reel_id: row.get(1)?,
                    reel_title: row.get(2)?,
                    weight: row.get(3)?,
                    amount: row.get(4)?,
                },
            ))
        })?
        .collect::<SqliteResult<Vec<_>>>()?;

    for (direction, reel) in reels {
        match ReelDirection::parse(&direction) {
            Some(ReelDirection::Entrance) => report.entrance_reels.push(reel),
            Some(ReelDirection::Exit) => report.exit_reels.push(reel),
            None => {
                return Err(RepositoryError::CorruptRecord {
                    table: "production_reel",
                    column: "direction".to_string(),
                    message: format!("未知线盘方向: {}", direction),
                })
            }
        }
    }
    Ok(())
}
