// ==========================================
// 校友名册导入系统 - API 层错误类型
// ==========================================
// 职责: 聚合下层错误,面向外部调用方的统一出口
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
