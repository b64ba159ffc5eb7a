// ==========================================
// 校友名册导入系统 - 校友领域模型
// ==========================================
// 职责: 导入管道的核心实体与报表结构
// 约束: 校友记录一经落库即不可变,姓名+毕业年份冲突一律按重复拒绝
// ==========================================

use crate::domain::types::{DegreeProgram, ImportStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// AlumniRecord - 校友主数据
// ==========================================
// 用途: 校验器输出的规范化记录,批量写入器的输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlumniRecord {
    pub name: String,                  // 全名（去除首尾空白,1-100 字符）
    pub graduation_year: i32,          // 毕业年份（1970-2030）
    pub degree_program: DegreeProgram, // 学位项目（封闭集合）
    pub email: Option<String>,         // 联系邮箱
    pub linkedin_url: Option<String>,  // LinkedIn 主页
    pub imdb_url: Option<String>,      // IMDb 主页
    pub website: Option<String>,       // 个人网站
}

// ==========================================
// RawAlumniRow - 导入中间结构体
// ==========================================
// 用途: 表格读取器输出（列名 → 去空白后的原始值）
// 约束: 仅保留声明过的列,未知列在读取阶段丢弃（封闭键集）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAlumniRow {
    pub row_number: usize,              // 1-based 行号（不含表头）
    pub fields: HashMap<String, String>, // 列名 → 原始值（已 trim,空值不存入）
}

impl RawAlumniRow {
    /// 按列名取值（缺列与空值统一视为 None）
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(|s| s.as_str())
    }
}

// ==========================================
// RowViolation - 行级校验违规
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowViolation {
    pub field: String,   // 违规字段
    pub message: String, // 违规描述（进入报表 reasons）
}

impl RowViolation {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ==========================================
// RowOutcome - 单行处理结果
// ==========================================
// 不变式: accepted 行 reasons 为空且携带新记录 id;
//         rejected 行 reasons 非空且无 id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowOutcome {
    pub row_number: usize,      // 1-based 行号（不含表头）
    pub kind: OutcomeKind,      // accepted | rejected
    pub reasons: Vec<String>,   // 拒绝原因（accepted 为空）
    pub alumni_id: Option<i64>, // 批量写入器分配的记录 id
}

impl RowOutcome {
    pub fn accepted(row_number: usize, alumni_id: i64) -> Self {
        Self {
            row_number,
            kind: OutcomeKind::Accepted,
            reasons: Vec::new(),
            alumni_id: Some(alumni_id),
        }
    }

    pub fn rejected(row_number: usize, reasons: Vec<String>) -> Self {
        Self {
            row_number,
            kind: OutcomeKind::Rejected,
            reasons,
            alumni_id: None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self.kind, OutcomeKind::Accepted)
    }
}

// ==========================================
// OutcomeKind - 结果类别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Accepted,
    Rejected,
}

// ==========================================
// ImportLogEntry - 导入台账条目
// ==========================================
// 用途: 单次导入尝试的审计记录,本核心唯一的可变实体
// 生命周期: open 时创建（processing）,finalize 恰好一次转终态,永不删除
// 对齐: import_log 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportLogEntry {
    pub id: String,                         // 台账 ID（UUID）
    pub filename: String,                   // 源文件名
    pub import_type: String,                // 导入类型标签（alumni_csv）
    pub status: ImportStatus,               // 生命周期状态
    pub total_records: i32,                 // 总行数
    pub successful_records: i32,            // 接受行数
    pub failed_records: i32,                // 拒绝行数
    pub error_details: Option<String>,      // 错误明细（拒绝行 RowOutcome 的 JSON）
    pub imported_by: String,                // 发起人标识
    pub created_at: DateTime<Utc>,          // 创建时间
    pub completed_at: Option<DateTime<Utc>>, // 完成时间（processing 期间为 None）
}

// ==========================================
// RejectedRow - 报表中的拒绝行明细
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedRow {
    pub row: usize,
    pub reasons: Vec<String>,
}

// ==========================================
// ImportReport - 结构化导入报表
// ==========================================
// 用途: 返回给调用方（外部 API 层）的最终结果
// 对齐: 外部数据契约（历史 UI 渲染此结构）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub ledger_id: String,
    pub filename: String,
    pub status: ImportStatus,
    pub total_records: i32,
    pub successful_records: i32,
    pub failed_records: i32,
    pub rejected: Vec<RejectedRow>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ImportReport {
    /// 从终态台账条目与行结果构造报表
    pub fn from_ledger(entry: &ImportLogEntry, outcomes: &[RowOutcome]) -> Self {
        let rejected = outcomes
            .iter()
            .filter(|o| !o.is_accepted())
            .map(|o| RejectedRow {
                row: o.row_number,
                reasons: o.reasons.clone(),
            })
            .collect();

        Self {
            ledger_id: entry.id.clone(),
            filename: entry.filename.clone(),
            status: entry.status,
            total_records: entry.total_records,
            successful_records: entry.successful_records,
            failed_records: entry.failed_records,
            rejected,
            created_at: entry.created_at,
            completed_at: entry.completed_at,
        }
    }
}
