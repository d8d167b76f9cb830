// ==========================================
// 线缆车间生产报工 - 计划数据导入器
// ==========================================
// 职责: 从列表导出文件读取订单行、物料定额、卡片、产品主数据
// 流程: 文件解析 → 字段映射 → 过滤（启用物料 / 计划号）
// ==========================================

use crate::domain::material::{MaterialPerStage, ProductSpec};
use crate::domain::order_row::OrderRow;
use crate::domain::plan::PlanDetail;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use std::path::Path;
use tracing::{info, instrument, warn};

pub struct PlanDataImporter {
    parser: UniversalFileParser,
    mapper: FieldMapper,
}

impl PlanDataImporter {
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            mapper: FieldMapper,
        }
    }

    /// 读取订单行
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load_order_rows<P: AsRef<Path>>(&self, path: P) -> ImportResult<Vec<OrderRow>> {
        let records = self.parser.parse(path)?;
        let rows: Vec<OrderRow> = records
            .iter()
            .map(|record| self.mapper.map_order_row(record))
            .collect();

        let keyless = rows.iter().filter(|r| r.row_key().is_none()).count();
        if keyless > 0 {
            warn!(keyless, "存在缺少订单行号的记录，将不参与分摊写回");
        }
        info!(count = rows.len(), "订单行读取完成");
        Ok(rows)
    }

    /// 读取订单行并按计划号过滤（空列表 → 全部返回）
    pub fn load_order_rows_for_plans<P: AsRef<Path>>(
        &self,
        path: P,
        plan_numbers: &[String],
    ) -> ImportResult<Vec<OrderRow>> {
        let rows = self.load_order_rows(path)?;
        if plan_numbers.is_empty() {
            return Ok(rows);
        }

        Ok(rows
            .into_iter()
            .filter(|row| {
                row.plan_number
                    .as_deref()
                    .map(|p| plan_numbers.iter().any(|n| n == p.trim()))
                    .unwrap_or(false)
            })
            .collect())
    }

    /// 读取物料定额（仅保留启用的物料）
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load_materials<P: AsRef<Path>>(&self, path: P) -> ImportResult<Vec<MaterialPerStage>> {
        let records = self.parser.parse(path)?;

        let mut materials = Vec::with_capacity(records.len());
        let mut inactive = 0usize;
        for (idx, record) in records.iter().enumerate() {
            // 行号从 2 开始（第 1 行为表头）
            let material = self.mapper.map_material(record, idx + 2)?;
            if material.active {
                materials.push(material);
            } else {
                inactive += 1;
            }
        }

        info!(count = materials.len(), inactive, "物料定额读取完成");
        Ok(materials)
    }

    /// 读取卡片
    pub fn load_plan_details<P: AsRef<Path>>(&self, path: P) -> ImportResult<Vec<PlanDetail>> {
        let records = self.parser.parse(path)?;
        Ok(records
            .iter()
            .map(|record| self.mapper.map_plan_detail(record))
            .collect())
    }

    /// 读取产品主数据
    pub fn load_products<P: AsRef<Path>>(&self, path: P) -> ImportResult<Vec<ProductSpec>> {
        let records = self.parser.parse(path)?;
        Ok(records
            .iter()
            .map(|record| self.mapper.map_product(record))
            .collect())
    }
}

impl Default for PlanDataImporter {
    fn default() -> Self {
        Self::new()
    }
}
