//! Database column types for timezone persistence.

pub mod error;
pub mod pg_types;

pub use error::{DbError, DbResult};
pub use pg_types::TimeZoneCol;
