// ==========================================
// 线缆车间生产报工 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 行号: 按导出文件中的位置计数（CSV/Excel 含表头，JSON 从 1 开始）
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv/.json）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    // ===== 解析 =====
    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("列表 JSON 解析失败: {0}")]
    JsonParseError(String),

    // ===== 记录 =====
    #[error("记录格式错误 (行 {row}): {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("字段值无效 (行 {row}, 列 {column}): {value:?} 不是{expected}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        // 带位置信息的错误保留行号
        match err.position() {
            Some(pos) => ImportError::CsvParseError(format!("行 {}: {}", pos.line(), err)),
            None => ImportError::CsvParseError(err.to_string()),
        }
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::JsonParseError(format!("行 {} 列 {}: {}", err.line(), err.column(), err))
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
