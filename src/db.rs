// ==========================================
// 线缆车间生产报工 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 数据库路径覆盖的环境变量
pub const DB_PATH_ENV: &str = "CU_ENTRY_DB_PATH";

const DB_FILE_NAME: &str = "cu_entry.db";

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 获取默认数据库路径
///
/// 优先级:
/// 1. 环境变量 CU_ENTRY_DB_PATH
/// 2. 用户数据目录/cu-management(-dev)/cu_entry.db
/// 3. 当前目录 ./cu_entry.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let app_dir = if cfg!(debug_assertions) {
        "cu-management-dev"
    } else {
        "cu-management"
    };

    if let Some(data_dir) = dirs::data_dir() {
        let dir: PathBuf = data_dir.join(app_dir);
        if std::fs::create_dir_all(&dir).is_ok() {
            return dir.join(DB_FILE_NAME).to_string_lossy().into_owned();
        }
    }

    format!("./{}", DB_FILE_NAME)
}
