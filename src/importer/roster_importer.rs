// ==========================================
// 校友名册导入系统 - 导入编排器
// ==========================================
// 职责: 驱动整条管道 台账open → 读取 → 逐行(校验→重复判定→写入) → 台账finalize
// 红线: 行级失败永不中止批次;结构性失败在处理任何行之前终止并记入台账
// ==========================================

use crate::domain::{ImportReport, RowOutcome};
use crate::importer::csv_reader::CsvRosterReader;
use crate::importer::duplicate_resolver::{DuplicateCheck, DuplicateKey, DuplicateResolver};
use crate::importer::error::ImportError;
use crate::importer::validator::RosterValidator;
use crate::repository::alumni_repo::AlumniRepository;
use crate::repository::error::RepositoryError;
use crate::repository::import_log_repo::ImportLogRepository;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// 台账中的导入类型标签
pub const IMPORT_TYPE_ALUMNI_CSV: &str = "alumni_csv";

// ==========================================
// RosterImporter - 导入编排器
// ==========================================
// 存储面通过 trait 注入,测试可替换
pub struct RosterImporter<A: AlumniRepository, L: ImportLogRepository> {
    reader: CsvRosterReader,
    validator: RosterValidator,
    resolver: DuplicateResolver,
    alumni_repo: Arc<A>,
    ledger_repo: Arc<L>,
}

impl<A: AlumniRepository, L: ImportLogRepository> RosterImporter<A, L> {
    /// 创建编排器（重复键策略取默认值: 大小写敏感）
    pub fn new(alumni_repo: Arc<A>, ledger_repo: Arc<L>) -> Self {
        Self::with_resolver(alumni_repo, ledger_repo, DuplicateResolver::default())
    }

    pub fn with_resolver(
        alumni_repo: Arc<A>,
        ledger_repo: Arc<L>,
        resolver: DuplicateResolver,
    ) -> Self {
        Self {
            reader: CsvRosterReader,
            validator: RosterValidator,
            resolver,
            alumni_repo,
            ledger_repo,
        }
    }

    /// 执行一次完整导入
    ///
    /// # 参数
    /// - content: 上传的文件字节（UTF-8 CSV）
    /// - filename: 源文件名（写入台账,不用于读取）
    /// - imported_by: 发起人标识
    ///
    /// # 返回
    /// - Ok(ImportReport): 任何到达行处理阶段的导入,以及结构性失败
    ///   （后者 status=failed,total=0,拒绝明细为空）
    /// - Err(ImportError): 台账自身不可用等基础设施错误
    #[instrument(skip(self, content))]
    pub async fn import(
        &self,
        content: &[u8],
        filename: &str,
        imported_by: &str,
    ) -> Result<ImportReport, ImportError> {
        info!("开始导入校友名册: 文件={}, 发起人={}", filename, imported_by);

        let entry = self
            .ledger_repo
            .open(filename, IMPORT_TYPE_ALUMNI_CSV, imported_by)
            .await
            .map_err(|e| ImportError::LedgerError(e.to_string()))?;

        let rows = match self.reader.read_rows(content) {
            Ok(rows) => rows,
            Err(e) if e.is_structural() => {
                warn!("结构性错误,导入中止: {}", e);
                let failed = self
                    .ledger_repo
                    .finalize_structural(&entry.id, &e.to_string())
                    .await
                    .map_err(|le| ImportError::LedgerError(le.to_string()))?;
                return Ok(ImportReport::from_ledger(&failed, &[]));
            }
            Err(e) => return Err(e),
        };

        let total = rows.len();
        info!("读取完成: {} 行待处理", total);

        let mut outcomes: Vec<RowOutcome> = Vec::with_capacity(total);
        let mut accepted_keys: HashSet<DuplicateKey> = HashSet::new();

        for row in &rows {
            let outcome = self.process_row(row, &mut accepted_keys).await;
            outcomes.push(outcome);
        }

        let accepted = outcomes.iter().filter(|o| o.is_accepted()).count();
        let rejected = total - accepted;

        let finalized = self
            .ledger_repo
            .finalize(&entry.id, total, accepted, rejected, &outcomes)
            .await
            .map_err(|e| ImportError::LedgerError(e.to_string()))?;

        info!(
            "导入完成: 状态={}, 总数={}, 接受={}, 拒绝={}",
            finalized.status.as_str(),
            total,
            accepted,
            rejected
        );

        Ok(ImportReport::from_ledger(&finalized, &outcomes))
    }

    /// 处理单行: 校验 → 重复判定 → 写入
    ///
    /// 所有失败路径都收敛为 RowOutcome::rejected,不向上传播
    async fn process_row(
        &self,
        row: &crate::domain::RawAlumniRow,
        accepted_keys: &mut HashSet<DuplicateKey>,
    ) -> RowOutcome {
        let record = match self.validator.validate(row) {
            Ok(record) => record,
            Err(violations) => {
                let reasons = violations.into_iter().map(|v| v.message).collect();
                return RowOutcome::rejected(row.row_number, reasons);
            }
        };

        let key = self.resolver.key(&record.name, record.graduation_year);

        let exists = match self
            .alumni_repo
            .exists_by_key(&record.name, record.graduation_year, self.resolver.policy())
            .await
        {
            Ok(exists) => exists,
            Err(e) => {
                warn!("存量查询失败: 行={}, 错误={}", row.row_number, e);
                return RowOutcome::rejected(
                    row.row_number,
                    vec![format!("Failed to query existing records: {}", e)],
                );
            }
        };

        // 外部契约: 重复拒绝的原因文案必须含 "already exists",
        // 调用方据此区分重复与格式违规
        match self.resolver.check(&key, accepted_keys, exists) {
            DuplicateCheck::DuplicateInStore => RowOutcome::rejected(
                row.row_number,
                vec![format!(
                    "Alumni record already exists: {} ({})",
                    record.name, record.graduation_year
                )],
            ),
            DuplicateCheck::DuplicateInBatch => RowOutcome::rejected(
                row.row_number,
                vec![format!(
                    "Alumni record already exists (earlier row in this file): {} ({})",
                    record.name, record.graduation_year
                )],
            ),
            DuplicateCheck::Unique => match self.alumni_repo.insert_alumnus(&record).await {
                Ok(id) => {
                    accepted_keys.insert(key);
                    RowOutcome::accepted(row.row_number, id)
                }
                // 并发竞态下的迟到重复: 唯一约束是第二层防御,重分类为重复拒绝
                Err(RepositoryError::UniqueConstraintViolation(_)) => RowOutcome::rejected(
                    row.row_number,
                    vec![format!(
                        "Alumni record already exists: {} ({})",
                        record.name, record.graduation_year
                    )],
                ),
                Err(e) => {
                    warn!("行级写入失败: 行={}, 错误={}", row.row_number, e);
                    RowOutcome::rejected(
                        row.row_number,
                        vec![format!("Failed to save record: {}", e)],
                    )
                }
            },
        }
    }
}
