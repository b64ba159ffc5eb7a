// ==========================================
// 校友名册导入系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout,减少并发导入时的偶发 busy 错误
// - 内置 schema 引导（alumni / import_log 两张表）
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明:
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

/// 初始化数据库 schema（幂等）
///
/// 约束:
/// - alumni 表上的 UNIQUE(name, graduation_year) 是重复检测的第二层防御,
///   并发导入对同键的写入竞态由此约束兜底
/// - import_log 永不被本核心删除（保留策略是外部关注点）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS alumni (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            graduation_year INTEGER NOT NULL,
            degree_program TEXT NOT NULL,
            email TEXT,
            linkedin_url TEXT,
            imdb_url TEXT,
            website TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(name, graduation_year)
        );

        CREATE TABLE IF NOT EXISTS import_log (
            id TEXT PRIMARY KEY,
            filename TEXT NOT NULL,
            import_type TEXT NOT NULL,
            status TEXT NOT NULL,
            total_records INTEGER NOT NULL DEFAULT 0,
            successful_records INTEGER NOT NULL DEFAULT 0,
            failed_records INTEGER NOT NULL DEFAULT 0,
            error_details TEXT,
            imported_by TEXT NOT NULL,
            created_at TEXT NOT NULL,
            completed_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_import_log_created_at
            ON import_log(created_at DESC);
        "#,
    )?;
    Ok(())
}

/// 打开连接并确保 schema 就绪（仓储构造入口）
pub fn open_and_init(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = open_sqlite_connection(db_path)?;
    init_schema(&conn)?;
    Ok(conn)
}
