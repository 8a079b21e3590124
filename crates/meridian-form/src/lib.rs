//! Compound form-value types for timezone-aware date/time input.
//!
//! ## Summary
//! The widget decomposition/composition protocol of a form framework is
//! replaced here by explicit sub-value structs plus pure `clean` /
//! `decompose` pairs: sub-values arrive as submitted strings, `clean`
//! validates and composes them into a zoned (or storage-naive) value, and
//! `decompose` splits a value back into sub-values for redisplay.

pub mod error;
pub mod field;

pub use error::{FormError, FormResult};
pub use field::datetime_zone::{
    DateTimeWithZone, DateTimeZoneField, LocalizedDateTimeZoneField,
};
pub use field::split::{LocalizedSplitDateTimeZoneField, SplitDateTimeWithZone, SplitDateTimeZoneField};
pub use field::timezone::TimeZoneSelect;
