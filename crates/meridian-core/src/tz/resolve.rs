//! IANA timezone identifier resolution.

use std::str::FromStr;

use chrono_tz::Tz;

use crate::error::{CoreError, CoreResult};

/// ## Summary
/// Resolves an IANA timezone identifier to a [`Tz`].
///
/// Succeeds iff the string exactly matches a known zone name, link names
/// such as `US/Eastern` included. No normalization or alias
/// canonicalization is applied, so [`canonical_name`] of the result always
/// reproduces the input.
///
/// ## Errors
/// Returns `CoreError::UnknownTimezone` carrying the offending string.
pub fn resolve(identifier: &str) -> CoreResult<Tz> {
    Tz::from_str(identifier).map_err(|_e| CoreError::UnknownTimezone(identifier.to_string()))
}

/// ## Summary
/// Returns the canonical identifier a [`Tz`] was resolved from.
#[must_use]
pub fn canonical_name(tz: Tz) -> &'static str {
    tz.name()
}
