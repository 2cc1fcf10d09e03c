//! CSV import/export for user collections, plus file loaders used by the
//! binaries.

pub mod export;
pub mod files;
pub mod import;
pub mod schema;

pub use export::{export_file_name, export_users};
pub use files::{read_segments_file, read_users_file};
pub use import::parse_users;
pub use schema::{FieldKind, ImportSchema};
