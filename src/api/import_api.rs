// ==========================================
// 校友名册导入系统 - 导入 API
// ==========================================
// 职责: 文件入口门面（扩展名门禁/读取文件）+ 历史查询 + 模板下载
// 红线: 业务规则全部在 importer 层,本层只做编排入口
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{ImportLogEntry, ImportReport};
use crate::importer::csv_reader::CsvRosterReader;
use crate::importer::error::ImportError;
use crate::importer::roster_importer::RosterImporter;
use crate::repository::alumni_repo_impl::AlumniRepositoryImpl;
use crate::repository::import_log_repo::ImportLogRepository;
use crate::repository::import_log_repo_impl::ImportLogRepositoryImpl;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// 历史列表默认条数
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

// ==========================================
// ImportApi - 外部调用入口
// ==========================================
pub struct ImportApi {
    importer: RosterImporter<AlumniRepositoryImpl, ImportLogRepositoryImpl>,
    ledger_repo: Arc<ImportLogRepositoryImpl>,
}

impl ImportApi {
    /// 按数据库路径构建 API 实例（自动引导 schema）
    pub fn new(db_path: &str) -> ApiResult<Self> {
        let alumni_repo = Arc::new(AlumniRepositoryImpl::new(db_path)?);
        let ledger_repo = Arc::new(ImportLogRepositoryImpl::new(db_path)?);
        let importer = RosterImporter::new(alumni_repo, ledger_repo.clone());
        Ok(Self {
            importer,
            ledger_repo,
        })
    }

    /// 从磁盘文件导入校友名册
    ///
    /// # 参数
    /// - file_path: CSV 文件路径（仅接受 .csv 扩展名）
    /// - imported_by: 发起人标识
    #[instrument(skip(self))]
    pub async fn import_alumni_csv(
        &self,
        file_path: &str,
        imported_by: &str,
    ) -> ApiResult<ImportReport> {
        let path = Path::new(file_path);

        // 扩展名门禁: 在打开台账之前拒绝,不留审计记录
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if !is_csv {
            return Err(ApiError::Import(ImportError::UnsupportedFormat(
                file_path.to_string(),
            )));
        }

        if !path.exists() {
            return Err(ApiError::Import(ImportError::FileNotFound(
                file_path.to_string(),
            )));
        }

        let content = std::fs::read(path).map_err(ImportError::from)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.to_string());

        info!("接收导入请求: 文件={}, {} 字节", filename, content.len());
        let report = self
            .importer
            .import(&content, &filename, imported_by)
            .await?;
        Ok(report)
    }

    /// 查询最近的导入历史（创建时间倒序）
    pub async fn get_import_history(&self, limit: Option<usize>) -> ApiResult<Vec<ImportLogEntry>> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        let entries = self.ledger_repo.list_recent(limit).await?;
        Ok(entries)
    }

    /// 生成 CSV 导入模板（表头 + 示例行）
    pub fn csv_template(&self) -> String {
        CsvRosterReader.csv_template()
    }
}
