// ==========================================
// 校友名册导入系统 - 仓储层模块
// ==========================================

pub mod alumni_repo;
pub mod alumni_repo_impl;
pub mod error;
pub mod import_log_repo;
pub mod import_log_repo_impl;

pub use alumni_repo::AlumniRepository;
pub use alumni_repo_impl::AlumniRepositoryImpl;
pub use error::{RepositoryError, RepositoryResult};
pub use import_log_repo::ImportLogRepository;
pub use import_log_repo_impl::ImportLogRepositoryImpl;
