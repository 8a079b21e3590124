//! Field implementations.

pub mod datetime_zone;
pub mod split;
pub mod timezone;

/// True when a submitted sub-value counts as empty: absent, or blank after
/// trimming.
#[must_use]
pub(crate) fn is_empty(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Format used when redisplaying a datetime sub-value. Accepted on input
/// as well (first entry of [`DATETIME_INPUT_FORMATS`]).
pub const DATETIME_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used when redisplaying a date sub-value.
pub const DATE_DISPLAY_FORMAT: &str = "%Y-%m-%d";

/// Format used when redisplaying a time sub-value.
pub const TIME_DISPLAY_FORMAT: &str = "%H:%M:%S";

/// Default accepted datetime input formats, most specific first.
pub const DATETIME_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Default accepted date input formats.
pub const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Default accepted time input formats.
pub const TIME_INPUT_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];
