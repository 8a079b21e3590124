use thiserror::Error;

/// Errors for column-level conversions.
#[derive(Error, Debug)]
pub enum DbError {
    /// A stored identifier no longer matches any zone in the linked zone
    /// database (stale data or a tzdata downgrade).
    #[error("Unknown timezone in database: {0}")]
    UnknownTimezone(String),
}

pub type DbResult<T> = std::result::Result<T, DbError>;
