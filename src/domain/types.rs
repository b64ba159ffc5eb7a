// ==========================================
// 校友名册导入系统 - 领域类型定义
// ==========================================
// 职责: 封闭枚举类型（学位项目/导入状态/重复键策略）
// 序列化格式: 与外部数据契约一致（报表/历史列表）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 学位项目 (Degree Program)
// ==========================================
// 红线: 封闭集合,大小写敏感,不做模糊匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DegreeProgram {
    #[serde(rename = "Film Production")]
    FilmProduction,
    #[serde(rename = "Screenwriting")]
    Screenwriting,
    #[serde(rename = "Animation")]
    Animation,
    #[serde(rename = "Documentary")]
    Documentary,
    #[serde(rename = "Television")]
    Television,
}

impl DegreeProgram {
    /// 全部合法取值（按展示顺序）
    pub const ALL: [DegreeProgram; 5] = [
        DegreeProgram::FilmProduction,
        DegreeProgram::Screenwriting,
        DegreeProgram::Animation,
        DegreeProgram::Documentary,
        DegreeProgram::Television,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DegreeProgram::FilmProduction => "Film Production",
            DegreeProgram::Screenwriting => "Screenwriting",
            DegreeProgram::Animation => "Animation",
            DegreeProgram::Documentary => "Documentary",
            DegreeProgram::Television => "Television",
        }
    }

    /// 解析外部字符串（大小写敏感的精确匹配）
    ///
    /// # 返回
    /// - Some(DegreeProgram): 匹配成功
    /// - None: 不在封闭集合内（包括大小写不符）
    pub fn parse(value: &str) -> Option<DegreeProgram> {
        DegreeProgram::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == value)
    }

    /// 合法取值的展示列表（用于校验错误消息）
    pub fn valid_values() -> String {
        DegreeProgram::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for DegreeProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 导入状态 (Import Status)
// ==========================================
// 生命周期: processing → completed | partial | failed（恰好一次终态转换）
// 序列化格式: 小写（与历史列表数据契约一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Processing, // 处理中（台账已打开,导入未完成）
    Completed,  // 全部行成功
    Partial,    // 部分行成功
    Failed,     // 无任何行成功（含结构性失败 total=0）
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Processing => "processing",
            ImportStatus::Completed => "completed",
            ImportStatus::Partial => "partial",
            ImportStatus::Failed => "failed",
        }
    }

    /// 从数据库字符串解析
    pub fn parse(value: &str) -> Option<ImportStatus> {
        match value {
            "processing" => Some(ImportStatus::Processing),
            "completed" => Some(ImportStatus::Completed),
            "partial" => Some(ImportStatus::Partial),
            "failed" => Some(ImportStatus::Failed),
            _ => None,
        }
    }

    /// 按计数推导终态
    ///
    /// # 不变式
    /// - completed 当且仅当 rejected == 0 且 total > 0
    /// - failed 当且仅当 accepted == 0（含 total == 0）
    /// - 其余为 partial
    pub fn terminal(total: usize, accepted: usize, rejected: usize) -> ImportStatus {
        debug_assert_eq!(accepted + rejected, total);
        if rejected == 0 && total > 0 {
            ImportStatus::Completed
        } else if accepted == 0 {
            ImportStatus::Failed
        } else {
            ImportStatus::Partial
        }
    }

    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ImportStatus::Processing)
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 重复键策略 (Duplicate Key Policy)
// ==========================================
// 开放问题: 重复键（姓名+毕业年份）的大小写敏感性未被上游锁定,
// 作为显式策略点暴露,默认精确匹配（去除首尾空白后逐字节相等）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DuplicateKeyPolicy {
    CaseSensitive,   // 精确匹配（默认）
    CaseInsensitive, // 姓名统一小写后匹配
}

impl Default for DuplicateKeyPolicy {
    fn default() -> Self {
        DuplicateKeyPolicy::CaseSensitive
    }
}
