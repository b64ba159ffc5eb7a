// ==========================================
// 校友名册导入系统 - 导入台账 Trait
// ==========================================
// 职责: 定义导入台账生命周期接口（open / finalize / 查询）
// 红线: 台账条目恰好一次 processing → 终态转换,永不删除
// ==========================================

use crate::domain::{ImportLogEntry, RowOutcome};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ImportLogRepository Trait - 导入台账
// ==========================================
// 用途: 每次导入尝试的审计记录;open 后立即对历史列表可见
// 实现者: ImportLogRepositoryImpl（rusqlite）
#[async_trait]
pub trait ImportLogRepository: Send + Sync {
    /// 打开台账条目（status=processing,立即提交,外部可见）
    ///
    /// # 参数
    /// - filename: 源文件名
    /// - import_type: 导入类型标签（如 alumni_csv）
    /// - imported_by: 发起人标识
    async fn open(
        &self,
        filename: &str,
        import_type: &str,
        imported_by: &str,
    ) -> RepositoryResult<ImportLogEntry>;

    /// 按计数与行结果提交终态
    ///
    /// # 终态规则
    /// - completed 当且仅当 rejected == 0 且 total > 0
    /// - failed 当且仅当 accepted == 0
    /// - 其余为 partial
    ///
    /// error_details 写入拒绝行 RowOutcome 的 JSON 数组
    async fn finalize(
        &self,
        ledger_id: &str,
        total: usize,
        accepted: usize,
        rejected: usize,
        outcomes: &[RowOutcome],
    ) -> RepositoryResult<ImportLogEntry>;

    /// 结构性失败路径: 任何行被处理之前读取器中止
    ///
    /// status=failed,total=0,结构性错误作为错误明细中唯一条目
    async fn finalize_structural(
        &self,
        ledger_id: &str,
        error_message: &str,
    ) -> RepositoryResult<ImportLogEntry>;

    /// 按 id 查询台账条目
    async fn get(&self, ledger_id: &str) -> RepositoryResult<Option<ImportLogEntry>>;

    /// 查询最近的导入历史（按创建时间倒序,外部历史列表消费）
    async fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<ImportLogEntry>>;
}
