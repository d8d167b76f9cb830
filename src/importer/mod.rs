// ==========================================
// 线缆车间生产报工 - 导入层
// ==========================================
// 职责: 列表导出文件 → 领域模型
// 支持: Excel, CSV, JSON
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod plan_data_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, JsonParser, RawRecord, UniversalFileParser};
pub use plan_data_importer::PlanDataImporter;
