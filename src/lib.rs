// ==========================================
// 校友名册导入系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 校友 CSV 批量导入核心（读取 → 校验 → 去重 → 落库 → 台账）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DegreeProgram, DuplicateKeyPolicy, ImportStatus};

// 领域实体
pub use domain::{
    AlumniRecord, ImportLogEntry, ImportReport, OutcomeKind, RawAlumniRow, RejectedRow,
    RowOutcome, RowViolation,
};

// 导入管道
pub use importer::{
    CsvRosterReader, DuplicateResolver, ImportError, RosterImporter, RosterValidator,
};

// 仓储
pub use repository::{
    AlumniRepository, AlumniRepositoryImpl, ImportLogRepository, ImportLogRepositoryImpl,
    RepositoryError,
};

// API
pub use api::{ApiError, ImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "校友名册导入系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
