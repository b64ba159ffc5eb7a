// ==========================================
// 校友名册导入系统 - 导入台账实现
// ==========================================
// 实现: rusqlite + Arc<Mutex<Connection>>
// 关键点: open 立即提交（处理中的导入对历史列表可见）;
//         finalize 用条件更新保证恰好一次终态转换
// ==========================================

use crate::db::open_and_init;
use crate::domain::types::ImportStatus;
use crate::domain::{ImportLogEntry, RowOutcome};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::import_log_repo::ImportLogRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ==========================================
// ImportLogRepositoryImpl
// ==========================================
pub struct ImportLogRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ImportLogRepositoryImpl {
    /// 创建新的 Repository 实例（连接打开即引导 schema）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_and_init(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<ImportLogEntry> {
        let status_raw: String = row.get("status")?;
        let created_raw: String = row.get("created_at")?;
        let completed_raw: Option<String> = row.get("completed_at")?;

        Ok(ImportLogEntry {
            id: row.get("id")?,
            filename: row.get("filename")?,
            import_type: row.get("import_type")?,
            // 非法状态值按 processing 读出,由上层校验逻辑兜底
            status: ImportStatus::parse(&status_raw).unwrap_or(ImportStatus::Processing),
            total_records: row.get("total_records")?,
            successful_records: row.get("successful_records")?,
            failed_records: row.get("failed_records")?,
            error_details: row.get("error_details")?,
            imported_by: row.get("imported_by")?,
            created_at: parse_ts(&created_raw),
            completed_at: completed_raw.as_deref().map(parse_ts),
        })
    }

    fn get_inner(conn: &Connection, ledger_id: &str) -> RepositoryResult<Option<ImportLogEntry>> {
        let entry = conn
            .query_row(
                "SELECT * FROM import_log WHERE id = ?1",
                params![ledger_id],
                Self::map_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// 条件终态更新;0 行受影响说明条目缺失或已终态
    fn commit_terminal(
        conn: &Connection,
        ledger_id: &str,
        status: ImportStatus,
        total: i32,
        accepted: i32,
        rejected: i32,
        error_details: Option<String>,
        completed_at: DateTime<Utc>,
    ) -> RepositoryResult<ImportLogEntry> {
        let updated = conn.execute(
            r#"
            UPDATE import_log
            SET status = ?1,
                total_records = ?2,
                successful_records = ?3,
                failed_records = ?4,
                error_details = ?5,
                completed_at = ?6
            WHERE id = ?7 AND status = 'processing'
            "#,
            params![
                status.as_str(),
                total,
                accepted,
                rejected,
                error_details,
                completed_at.to_rfc3339(),
                ledger_id,
            ],
        )?;

        if updated == 0 {
            let current = Self::get_inner(conn, ledger_id)?;
            return match current {
                Some(entry) => Err(RepositoryError::InvalidStateTransition {
                    from: entry.status.as_str().to_string(),
                    to: status.as_str().to_string(),
                }),
                None => Err(RepositoryError::NotFound {
                    entity: "ImportLogEntry".to_string(),
                    id: ledger_id.to_string(),
                }),
            };
        }

        Self::get_inner(conn, ledger_id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "ImportLogEntry".to_string(),
            id: ledger_id.to_string(),
        })
    }
}

fn parse_ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[async_trait]
impl ImportLogRepository for ImportLogRepositoryImpl {
    async fn open(
        &self,
        filename: &str,
        import_type: &str,
        imported_by: &str,
    ) -> RepositoryResult<ImportLogEntry> {
        let conn = self.lock_conn()?;
        let entry = ImportLogEntry {
            id: Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            import_type: import_type.to_string(),
            status: ImportStatus::Processing,
            total_records: 0,
            successful_records: 0,
            failed_records: 0,
            error_details: None,
            imported_by: imported_by.to_string(),
            created_at: Utc::now(),
            completed_at: None,
        };

        conn.execute(
            r#"
            INSERT INTO import_log (
                id, filename, import_type, status,
                total_records, successful_records, failed_records,
                error_details, imported_by, created_at, completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, NULL)
            "#,
            params![
                entry.id,
                entry.filename,
                entry.import_type,
                entry.status.as_str(),
                entry.total_records,
                entry.successful_records,
                entry.failed_records,
                entry.error_details,
                entry.imported_by,
                entry.created_at.to_rfc3339(),
            ],
        )?;

        Ok(entry)
    }

    async fn finalize(
        &self,
        ledger_id: &str,
        total: usize,
        accepted: usize,
        rejected: usize,
        outcomes: &[RowOutcome],
    ) -> RepositoryResult<ImportLogEntry> {
        let conn = self.lock_conn()?;

        let status = ImportStatus::terminal(total, accepted, rejected);
        let rejected_outcomes: Vec<&RowOutcome> =
            outcomes.iter().filter(|o| !o.is_accepted()).collect();
        let error_details = if rejected_outcomes.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&rejected_outcomes)?)
        };

        Self::commit_terminal(
            &conn,
            ledger_id,
            status,
            total as i32,
            accepted as i32,
            rejected as i32,
            error_details,
            Utc::now(),
        )
    }

    async fn finalize_structural(
        &self,
        ledger_id: &str,
        error_message: &str,
    ) -> RepositoryResult<ImportLogEntry> {
        let conn = self.lock_conn()?;

        let error_details = serde_json::to_string(&serde_json::json!([
            { "error": error_message }
        ]))?;

        Self::commit_terminal(
            &conn,
            ledger_id,
            ImportStatus::Failed,
            0,
            0,
            0,
            Some(error_details),
            Utc::now(),
        )
    }

    async fn get(&self, ledger_id: &str) -> RepositoryResult<Option<ImportLogEntry>> {
        let conn = self.lock_conn()?;
        Self::get_inner(&conn, ledger_id)
    }

    async fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<ImportLogEntry>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT * FROM import_log ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], Self::map_row)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}
