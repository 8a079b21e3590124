//! Timezone adjustment for naive and zoned timestamps.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::CoreResult;
use crate::tz::resolve::resolve;

/// Upper bound on the gap-skipping search in [`localize`]. Covers every
/// transition in the zone database, including whole-day skips such as
/// `Pacific/Apia` in December 2011.
const MAX_GAP_HOURS: i64 = 48;

/// A date/time value that either carries a zone or does not.
///
/// A naive value is ambiguous on its own; [`adjust`] gives it meaning by
/// attaching an explicit source zone before converting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Naive(NaiveDateTime),
    Zoned(DateTime<Tz>),
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self::Naive(value)
    }
}

impl From<DateTime<Tz>> for Timestamp {
    fn from(value: DateTime<Tz>) -> Self {
        Self::Zoned(value)
    }
}

/// A timezone argument: already resolved, or a bare identifier that still
/// has to pass resolution.
#[derive(Debug, Clone, Copy)]
pub enum ZoneRef<'a> {
    Name(&'a str),
    Resolved(Tz),
}

impl ZoneRef<'_> {
    /// ## Summary
    /// Resolves this reference to a concrete [`Tz`].
    ///
    /// ## Errors
    /// Returns `UnknownTimezone` for an identifier not in the zone database.
    pub fn resolve(self) -> CoreResult<Tz> {
        match self {
            Self::Name(name) => resolve(name),
            Self::Resolved(tz) => Ok(tz),
        }
    }
}

impl<'a> From<&'a str> for ZoneRef<'a> {
    fn from(value: &'a str) -> Self {
        Self::Name(value)
    }
}

impl From<Tz> for ZoneRef<'_> {
    fn from(value: Tz) -> Self {
        Self::Resolved(value)
    }
}

/// ## Summary
/// Attaches `tz` to a naive local time, picking the zone database's offset
/// for that instant.
///
/// Ambiguous times during a fall-back overlap resolve to the earliest
/// occurrence. Non-existent times during a spring-forward gap shift forward
/// in one-hour steps until a valid local time is reached.
#[must_use]
pub fn localize(value: NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    let mut candidate = value;
    for _ in 0..MAX_GAP_HOURS {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => return dt,
            LocalResult::None => candidate += Duration::hours(1),
        }
    }

    // Unreachable for zone database data; interpret as UTC rather than fail.
    tz.from_utc_datetime(&value)
}

/// ## Summary
/// Converts a timestamp between zones.
///
/// A naive `value` is first interpreted as a local time in `from` (see
/// [`localize`] for DST disambiguation). A zoned `value` keeps its own zone
/// as authoritative; `from` is ignored for offset purposes but an
/// identifier passed for it must still resolve. The result is the
/// equivalent instant in `to`, with `to`'s offset normalized for that
/// instant.
///
/// Pure function: no shared state, safe to call concurrently.
///
/// ## Errors
/// Returns `UnknownTimezone` if either zone reference fails to resolve.
pub fn adjust<'a>(
    value: Timestamp,
    from: impl Into<ZoneRef<'a>>,
    to: impl Into<ZoneRef<'a>>,
) -> CoreResult<DateTime<Tz>> {
    let from_tz = from.into().resolve()?;
    let to_tz = to.into().resolve()?;

    let zoned = match value {
        Timestamp::Naive(naive) => localize(naive, from_tz),
        Timestamp::Zoned(dt) => dt,
    };

    Ok(zoned.with_timezone(&to_tz))
}

/// ## Summary
/// Converts a timestamp to UTC, interpreting naive input in `from`.
///
/// ## Errors
/// Returns `UnknownTimezone` if `from` fails to resolve.
pub fn to_utc<'a>(value: Timestamp, from: impl Into<ZoneRef<'a>>) -> CoreResult<DateTime<Utc>> {
    Ok(adjust(value, from, Tz::UTC)?.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .expect("valid date")
            .and_hms_opt(h, mi, s)
            .expect("valid time")
    }

    #[test]
    fn test_adjust_same_zone_is_identity() {
        let value = naive(2008, 6, 25, 18, 0, 0);
        let adjusted = adjust(value.into(), "UTC", "UTC").expect("should adjust");
        assert_eq!(adjusted.naive_local(), value);
        assert_eq!(adjusted.timezone(), Tz::UTC);
    }

    #[test]
    fn test_adjust_naive_across_zones() {
        // 19:00 in Warsaw (CEST, +02:00) is 17:00 UTC.
        let value = naive(2010, 10, 28, 19, 0, 0);
        let adjusted = adjust(value.into(), "Europe/Warsaw", "UTC").expect("should adjust");
        assert_eq!(adjusted.naive_local(), naive(2010, 10, 28, 17, 0, 0));
    }

    #[test]
    fn test_adjust_picks_dst_offset_for_the_instant() {
        // June in Denver is MDT (-06:00), not the standard -07:00.
        let value = naive(2008, 6, 25, 12, 0, 0);
        let adjusted = adjust(value.into(), "UTC", "America/Denver").expect("should adjust");
        assert_eq!(adjusted.naive_local(), naive(2008, 6, 25, 6, 0, 0));
        assert_eq!(adjusted.offset().to_string(), "MDT");
    }

    #[test]
    fn test_adjust_zoned_keeps_own_zone_authoritative() {
        let warsaw = localize(naive(2010, 10, 28, 19, 0, 0), Tz::Europe__Warsaw);
        // `from` names a different zone; the value's own offset wins.
        let adjusted = adjust(warsaw.into(), "America/Denver", "UTC").expect("should adjust");
        assert_eq!(adjusted.naive_local(), naive(2010, 10, 28, 17, 0, 0));
    }

    #[test]
    fn test_adjust_zoned_still_validates_from_identifier() {
        let warsaw = localize(naive(2010, 10, 28, 19, 0, 0), Tz::Europe__Warsaw);
        let err = adjust(warsaw.into(), "Not/AZone", "UTC").expect_err("should fail");
        assert!(matches!(
            err,
            crate::error::CoreError::UnknownTimezone(ref s) if s == "Not/AZone"
        ));
    }

    #[test]
    fn test_adjust_unknown_target_zone() {
        let value = naive(2008, 6, 25, 18, 0, 0);
        assert!(adjust(value.into(), "UTC", "Not/AZone").is_err());
    }

    #[test]
    fn test_localize_ambiguous_time_resolves_to_earliest() {
        // 2010-10-31 02:30 occurs twice in Warsaw; earliest is CEST (+02:00).
        let dt = localize(naive(2010, 10, 31, 2, 30, 0), Tz::Europe__Warsaw);
        assert_eq!(dt.offset().to_string(), "CEST");
    }

    #[test]
    fn test_localize_gap_time_shifts_forward() {
        // 2010-03-28 02:30 does not exist in Warsaw; shifted into CEST.
        let dt = localize(naive(2010, 3, 28, 2, 30, 0), Tz::Europe__Warsaw);
        assert_eq!(dt.naive_local(), naive(2010, 3, 28, 3, 30, 0));
        assert_eq!(dt.offset().to_string(), "CEST");
    }

    #[test]
    fn test_localize_whole_day_gap() {
        // Samoa skipped 2011-12-30 entirely.
        let dt = localize(naive(2011, 12, 30, 12, 0, 0), Tz::Pacific__Apia);
        assert_eq!(dt.naive_local().date(), naive(2011, 12, 31, 0, 0, 0).date());
    }

    #[test]
    fn test_to_utc() {
        let value = naive(2010, 10, 28, 19, 0, 0);
        let utc = to_utc(value.into(), "Europe/Warsaw").expect("should convert");
        assert_eq!(utc.naive_utc(), naive(2010, 10, 28, 17, 0, 0));
    }
}
