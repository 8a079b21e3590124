//! Datetime-plus-timezone compound field.

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use serde::Deserialize;

use meridian_core::tz::adjust::{Timestamp, adjust, localize};
use meridian_core::tz::resolve::{canonical_name, resolve};

use crate::error::{FormError, FormResult};
use crate::field::{DATETIME_DISPLAY_FORMAT, DATETIME_INPUT_FORMATS, is_empty};

/// Sub-values of a datetime+timezone field, as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DateTimeWithZone {
    pub datetime: Option<String>,
    pub timezone: Option<String>,
}

/// Compound field composing a datetime sub-value with a timezone selector
/// into a zoned value.
///
/// Emptiness rule: the timezone sub-value alone never makes the field
/// non-empty. When the datetime is empty the whole field is empty and the
/// timezone is discarded unvalidated.
#[derive(Debug, Clone)]
pub struct DateTimeZoneField {
    required: bool,
    formats: &'static [&'static str],
}

impl DateTimeZoneField {
    /// A required field with the default input formats.
    #[must_use]
    pub fn new() -> Self {
        Self {
            required: true,
            formats: DATETIME_INPUT_FORMATS,
        }
    }

    /// An optional field: empty input cleans to `None`.
    #[must_use]
    pub fn optional() -> Self {
        Self {
            required: false,
            formats: DATETIME_INPUT_FORMATS,
        }
    }

    /// Replaces the accepted datetime input formats.
    #[must_use]
    pub fn with_formats(mut self, formats: &'static [&'static str]) -> Self {
        self.formats = formats;
        self
    }

    fn parse_datetime(&self, raw: &str) -> FormResult<NaiveDateTime> {
        let raw = raw.trim();
        self.formats
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .ok_or(FormError::InvalidDatetime)
    }

    /// ## Summary
    /// Validates sub-values and composes them into a zoned datetime,
    /// localizing the parsed value in the selected zone.
    ///
    /// ## Errors
    /// `Required` when a required field is submitted empty;
    /// `InvalidDatetime` for an unparsable datetime; `InvalidTimezone`
    /// when the datetime is present but the timezone is missing or
    /// unknown.
    pub fn clean(&self, input: &DateTimeWithZone) -> FormResult<Option<chrono::DateTime<Tz>>> {
        if is_empty(input.datetime.as_deref()) {
            return if self.required {
                Err(FormError::Required)
            } else {
                Ok(None)
            };
        }

        let naive = self.parse_datetime(input.datetime.as_deref().unwrap_or_default())?;

        if is_empty(input.timezone.as_deref()) {
            return Err(FormError::InvalidTimezone);
        }
        let tz = resolve(input.timezone.as_deref().unwrap_or_default().trim())
            .map_err(|_e| FormError::InvalidTimezone)?;

        Ok(Some(localize(naive, tz)))
    }

    /// ## Summary
    /// Splits a zoned value back into sub-values for redisplay.
    #[must_use]
    pub fn decompose(value: chrono::DateTime<Tz>) -> DateTimeWithZone {
        DateTimeWithZone {
            datetime: Some(value.format(DATETIME_DISPLAY_FORMAT).to_string()),
            timezone: Some(canonical_name(value.timezone()).to_string()),
        }
    }
}

impl Default for DateTimeZoneField {
    fn default() -> Self {
        Self::new()
    }
}

/// Datetime+timezone field whose cleaned value is stored naive in a fixed
/// storage zone, and which redisplays stored values in the caller's active
/// zone.
///
/// `clean` composes like [`DateTimeZoneField`], then converts to the
/// storage zone and strips it; `decompose` reverses both steps.
#[derive(Debug, Clone)]
pub struct LocalizedDateTimeZoneField {
    inner: DateTimeZoneField,
    storage: Tz,
}

impl LocalizedDateTimeZoneField {
    /// A required localized field storing naive values in `storage`.
    #[must_use]
    pub fn new(storage: Tz) -> Self {
        Self {
            inner: DateTimeZoneField::new(),
            storage,
        }
    }

    /// An optional localized field.
    #[must_use]
    pub fn optional(storage: Tz) -> Self {
        Self {
            inner: DateTimeZoneField::optional(),
            storage,
        }
    }

    /// ## Summary
    /// Validates and composes, then converts the result to the storage
    /// zone and strips zone information.
    ///
    /// ## Errors
    /// Same as [`DateTimeZoneField::clean`].
    pub fn clean(&self, input: &DateTimeWithZone) -> FormResult<Option<NaiveDateTime>> {
        let Some(zoned) = self.inner.clean(input)? else {
            return Ok(None);
        };
        // Composition already validated both zones; conversion cannot fail.
        let stored = adjust(Timestamp::Zoned(zoned), self.storage, self.storage)
            .map_err(|_e| FormError::InvalidTimezone)?;
        Ok(Some(stored.naive_local()))
    }

    /// ## Summary
    /// Interprets a stored naive value in the storage zone and splits it
    /// into sub-values displayed in `active`.
    #[must_use]
    pub fn decompose(&self, stored: NaiveDateTime, active: Tz) -> DateTimeWithZone {
        let shown = localize(stored, self.storage);
        DateTimeZoneField::decompose(shown.with_timezone(&active))
    }

    /// ## Summary
    /// Sub-values for an empty field: no datetime, the active zone
    /// preselected.
    #[must_use]
    pub fn decompose_empty(active: Tz) -> DateTimeWithZone {
        DateTimeWithZone {
            datetime: None,
            timezone: Some(canonical_name(active).to_string()),
        }
    }
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

    fn submission(datetime: &str, timezone: &str) -> DateTimeWithZone {
        DateTimeWithZone {
            datetime: Some(datetime.to_string()),
            timezone: Some(timezone.to_string()),
        }
    }

    #[test]
    fn test_clean_composes_zoned_value() {
        let field = DateTimeZoneField::new();
        let value = field
            .clean(&submission("2010-10-28 19:00:00", "Europe/Warsaw"))
            .expect("should clean")
            .expect("should be non-empty");
        assert_eq!(value.naive_local(), naive(2010, 10, 28, 19, 0, 0));
        assert_eq!(value.timezone(), Tz::Europe__Warsaw);
    }

    #[test]
    fn test_clean_accepts_alternate_formats() {
        let field = DateTimeZoneField::new();
        let value = field
            .clean(&submission("2010-10-28T19:00", "Europe/Warsaw"))
            .expect("should clean")
            .expect("should be non-empty");
        assert_eq!(value.naive_local(), naive(2010, 10, 28, 19, 0, 0));
    }

    #[test]
    fn test_clean_unparsable_datetime() {
        let field = DateTimeZoneField::new();
        assert_eq!(
            field.clean(&submission("not a datetime", "Europe/Warsaw")),
            Err(FormError::InvalidDatetime)
        );
    }

    #[test]
    fn test_clean_missing_timezone() {
        let field = DateTimeZoneField::new();
        let input = DateTimeWithZone {
            datetime: Some("2010-10-28 19:00:00".to_string()),
            timezone: None,
        };
        assert_eq!(field.clean(&input), Err(FormError::InvalidTimezone));
    }

    #[test]
    fn test_clean_unknown_timezone() {
        let field = DateTimeZoneField::new();
        assert_eq!(
            field.clean(&submission("2010-10-28 19:00:00", "BAD VALUE")),
            Err(FormError::InvalidTimezone)
        );
    }

    #[test]
    fn test_empty_datetime_discards_timezone_when_optional() {
        let field = DateTimeZoneField::optional();
        let input = DateTimeWithZone {
            datetime: Some(String::new()),
            timezone: Some("Europe/Warsaw".to_string()),
        };
        assert_eq!(field.clean(&input), Ok(None));
    }

    #[test]
    fn test_empty_datetime_required() {
        let field = DateTimeZoneField::new();
        let input = DateTimeWithZone {
            datetime: None,
            timezone: Some("Europe/Warsaw".to_string()),
        };
        assert_eq!(field.clean(&input), Err(FormError::Required));
    }

    #[test]
    fn test_decompose_round_trip() {
        let field = DateTimeZoneField::new();
        let value = field
            .clean(&submission("2010-10-28 19:00:00", "Europe/Warsaw"))
            .expect("should clean")
            .expect("should be non-empty");

        let parts = DateTimeZoneField::decompose(value);
        assert_eq!(parts, submission("2010-10-28 19:00:00", "Europe/Warsaw"));
    }

    #[test]
    fn test_localized_clean_stores_naive_storage_form() {
        // 19:00 Warsaw (CEST, +02:00) stored as 17:00 naive UTC.
        let field = LocalizedDateTimeZoneField::new(Tz::UTC);
        let stored = field
            .clean(&submission("2010-10-28 19:00:00", "Europe/Warsaw"))
            .expect("should clean")
            .expect("should be non-empty");
        assert_eq!(stored, naive(2010, 10, 28, 17, 0, 0));
    }

    #[test]
    fn test_localized_decompose_displays_in_active_zone() {
        let field = LocalizedDateTimeZoneField::new(Tz::UTC);
        let parts = field.decompose(naive(2010, 10, 28, 19, 0, 0), Tz::Europe__Warsaw);
        assert_eq!(parts, submission("2010-10-28 21:00:00", "Europe/Warsaw"));
    }

    #[test]
    fn test_localized_decompose_empty_preselects_active_zone() {
        let parts = LocalizedDateTimeZoneField::decompose_empty(Tz::Europe__Warsaw);
        assert_eq!(parts.datetime, None);
        assert_eq!(parts.timezone, Some("Europe/Warsaw".to_string()));
    }

    #[test]
    fn test_localized_optional_empty() {
        let field = LocalizedDateTimeZoneField::optional(Tz::UTC);
        assert_eq!(field.clean(&DateTimeWithZone::default()), Ok(None));
    }
}
