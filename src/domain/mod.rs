// ==========================================
// 校友名册导入系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、报表结构
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod alumni;
pub mod types;

// 重导出核心类型
pub use alumni::{
    AlumniRecord, ImportLogEntry, ImportReport, OutcomeKind, RawAlumniRow, RejectedRow,
    RowOutcome, RowViolation,
};
pub use types::{DegreeProgram, DuplicateKeyPolicy, ImportStatus};
