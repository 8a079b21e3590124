//! Custom `PostgreSQL` type mappings for Diesel
//!
//! A timezone column is stored as its canonical IANA identifier text;
//! loading resolves the identifier back through the zone database, so an
//! invalid stored value surfaces as a deserialization error instead of an
//! unresolved string leaking into application code.

use diesel::deserialize::{self, FromSql};
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::{AsExpression, FromSqlRow};
use std::io::Write;
use std::str::FromStr;

use chrono_tz::Tz;
use meridian_core::tz::resolve::{canonical_name, resolve};

use crate::error::DbError;

/// Widest identifier a timezone column must accommodate. Schemas using a
/// bounded VARCHAR instead of TEXT must allow at least this much.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Wrapper for a TEXT column holding an IANA timezone identifier.
///
/// Round-trip law: storing and reloading any valid identifier reproduces
/// it exactly (no canonicalization of link names).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub struct TimeZoneCol(pub Tz);

impl TimeZoneCol {
    /// ## Summary
    /// Builds a column value from a stored identifier.
    ///
    /// ## Errors
    /// Returns `DbError::UnknownTimezone` for an identifier not in the
    /// zone database.
    pub fn from_canonical(identifier: &str) -> Result<Self, DbError> {
        resolve(identifier)
            .map(Self)
            .map_err(|_e| DbError::UnknownTimezone(identifier.to_string()))
    }

    /// The canonical identifier stored for this value.
    #[must_use]
    pub fn as_canonical(self) -> &'static str {
        canonical_name(self.0)
    }
}

impl From<Tz> for TimeZoneCol {
    fn from(tz: Tz) -> Self {
        Self(tz)
    }
}

impl From<TimeZoneCol> for Tz {
    fn from(col: TimeZoneCol) -> Self {
        col.0
    }
}

impl FromStr for TimeZoneCol {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_canonical(s)
    }
}

impl std::fmt::Display for TimeZoneCol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_canonical())
    }
}

impl ToSql<Text, Pg> for TimeZoneCol {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_canonical().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for TimeZoneCol {
    fn from_sql(value: PgValue<'_>) -> deserialize::Result<Self> {
        let stored = std::str::from_utf8(value.as_bytes())?;
        Ok(Self::from_canonical(stored)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_canonical_valid() {
        let col = TimeZoneCol::from_canonical("America/Denver").expect("should load");
        assert_eq!(col.0, Tz::America__Denver);
    }

    #[test]
    fn test_from_canonical_unknown() {
        let err = TimeZoneCol::from_canonical("Not/AZone").expect_err("should fail");
        match err {
            DbError::UnknownTimezone(s) => assert_eq!(s, "Not/AZone"),
        }
    }

    #[test]
    fn test_round_trip_preserves_identifier() {
        for identifier in ["America/Denver", "UTC", "US/Eastern", "Europe/Warsaw"] {
            let col = TimeZoneCol::from_canonical(identifier).expect("should load");
            assert_eq!(col.as_canonical(), identifier);
        }
    }

    #[test]
    fn test_from_str_and_display() {
        let col: TimeZoneCol = "Europe/Warsaw".parse().expect("should parse");
        assert_eq!(col.to_string(), "Europe/Warsaw");
    }

    #[test]
    fn test_tz_conversions() {
        let col = TimeZoneCol::from(Tz::UTC);
        assert_eq!(Tz::from(col), Tz::UTC);
    }

    #[test]
    fn test_every_identifier_fits_bounded_columns() {
        for tz in chrono_tz::TZ_VARIANTS {
            assert!(
                tz.name().len() <= MAX_IDENTIFIER_LEN,
                "{} exceeds MAX_IDENTIFIER_LEN",
                tz.name()
            );
        }
    }
}
