// ==========================================
// 校友名册导入系统 - API 层模块
// ==========================================

pub mod error;
pub mod import_api;

pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, DEFAULT_HISTORY_LIMIT};
