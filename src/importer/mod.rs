// ==========================================
// 校友名册导入系统 - 导入模块
// ==========================================
// 管道: csv_reader → validator → duplicate_resolver → roster_importer
// ==========================================

pub mod csv_reader;
pub mod duplicate_resolver;
pub mod error;
pub mod roster_importer;
pub mod validator;

pub use csv_reader::{CsvRosterReader, OPTIONAL_COLUMNS, REQUIRED_COLUMNS};
pub use duplicate_resolver::{DuplicateCheck, DuplicateKey, DuplicateResolver};
pub use error::{ImportError, ImportOpResult};
pub use roster_importer::{RosterImporter, IMPORT_TYPE_ALUMNI_CSV};
pub use validator::RosterValidator;
