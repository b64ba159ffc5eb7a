// ==========================================
// 校友名册导入系统 - 导入模块错误类型
// ==========================================
// 错误分层: 结构性错误中止整个导入,行级错误只拒绝单行
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 结构性错误（中止整个导入,不处理任何行）=====
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingRequiredColumns(Vec<String>),

    #[error("File is not valid UTF-8 text: {0}")]
    EncodingError(String),

    #[error("CSV parse error: {0}")]
    CsvParseError(String),

    // ===== 文件相关错误 =====
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file format: {0} (only .csv is accepted)")]
    UnsupportedFormat(String),

    #[error("File read error: {0}")]
    FileReadError(String),

    // ===== 台账错误 =====
    #[error("Import ledger error: {0}")]
    LedgerError(String),

    // ===== 通用错误 =====
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 是否为结构性错误（表头缺列/编码失败/CSV 语法错误）
    ///
    /// 结构性错误将台账直接转入 failed（total=0）,
    /// 其余错误在行级处理,不经过此判断
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ImportError::MissingRequiredColumns(_)
                | ImportError::EncodingError(_)
                | ImportError::CsvParseError(_)
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportOpResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_classification() {
        assert!(ImportError::MissingRequiredColumns(vec!["name".to_string()]).is_structural());
        assert!(ImportError::EncodingError("bad utf-8".to_string()).is_structural());
        assert!(!ImportError::FileNotFound("x.csv".to_string()).is_structural());
        assert!(!ImportError::LedgerError("x".to_string()).is_structural());
    }

    #[test]
    fn test_missing_columns_message_lists_all() {
        let err = ImportError::MissingRequiredColumns(vec![
            "graduation_year".to_string(),
            "degree_program".to_string(),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("graduation_year"));
        assert!(msg.contains("degree_program"));
    }
}
