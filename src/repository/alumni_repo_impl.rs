// ==========================================
// 校友名册导入系统 - 校友仓储实现
// ==========================================
// 实现: rusqlite + Arc<Mutex<Connection>>
// 约束: 所有查询参数化;每次 insert 独立提交（无跨行事务）
// ==========================================

use crate::db::open_and_init;
use crate::domain::types::{DegreeProgram, DuplicateKeyPolicy};
use crate::domain::AlumniRecord;
use crate::repository::alumni_repo::AlumniRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// AlumniRepositoryImpl
// ==========================================
pub struct AlumniRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl AlumniRepositoryImpl {
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
}

#[async_trait]
impl AlumniRepository for AlumniRepositoryImpl {
    async fn insert_alumnus(&self, record: &AlumniRecord) -> RepositoryResult<i64> {
        let conn = self.lock_conn()?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            r#"
            INSERT INTO alumni (
                name, graduation_year, degree_program,
                email, linkedin_url, imdb_url, website,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                record.name,
                record.graduation_year,
                record.degree_program.as_str(),
                record.email,
                record.linkedin_url,
                record.imdb_url,
                record.website,
                now,
                now,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    async fn exists_by_key(
        &self,
        name: &str,
        graduation_year: i32,
        policy: DuplicateKeyPolicy,
    ) -> RepositoryResult<bool> {
        let conn = self.lock_conn()?;

        // SQLite 的 lower() 只折叠 ASCII;与解析器的 to_lowercase 在非 ASCII
        // 姓名上可能有差异,策略语义以批内判定为准,此处为存量查询口径
        let sql = match policy {
            DuplicateKeyPolicy::CaseSensitive => {
                "SELECT 1 FROM alumni WHERE name = ?1 AND graduation_year = ?2 LIMIT 1"
            }
            DuplicateKeyPolicy::CaseInsensitive => {
                "SELECT 1 FROM alumni WHERE lower(name) = lower(?1) AND graduation_year = ?2 LIMIT 1"
            }
        };

        let found: Option<i32> = conn
            .query_row(sql, params![name, graduation_year], |row| row.get(0))
            .optional()?;

        Ok(found.is_some())
    }

    async fn find_by_key(
        &self,
        name: &str,
        graduation_year: i32,
    ) -> RepositoryResult<Option<AlumniRecord>> {
        let conn = self.lock_conn()?;

        let record = conn
            .query_row(
                r#"
                SELECT name, graduation_year, degree_program,
                       email, linkedin_url, imdb_url, website
                FROM alumni
                WHERE name = ?1 AND graduation_year = ?2
                "#,
                params![name, graduation_year],
                |row| {
                    let program_raw: String = row.get(2)?;
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i32>(1)?,
                        program_raw,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, Option<String>>(4)?,
                        row.get::<_, Option<String>>(5)?,
                        row.get::<_, Option<String>>(6)?,
                    ))
                },
            )
            .optional()?;

        match record {
            Some((name, graduation_year, program_raw, email, linkedin_url, imdb_url, website)) => {
                let degree_program = DegreeProgram::parse(&program_raw).ok_or_else(|| {
                    RepositoryError::FieldValueError {
                        field: "degree_program".to_string(),
                        message: format!("数据库中存在非法学位项目值: {}", program_raw),
                    }
                })?;
                Ok(Some(AlumniRecord {
                    name,
                    graduation_year,
                    degree_program,
                    email,
                    linkedin_url,
                    imdb_url,
                    website,
                }))
            }
            None => Ok(None),
        }
    }

    async fn count_alumni(&self) -> RepositoryResult<usize> {
        let conn = self.lock_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM alumni", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
