//! Split date/time/timezone compound field.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use serde::Deserialize;

use meridian_core::tz::adjust::{Timestamp, adjust, localize};
use meridian_core::tz::resolve::{canonical_name, resolve};

use crate::error::{FormError, FormResult};
use crate::field::{
    DATE_DISPLAY_FORMAT, DATE_INPUT_FORMATS, TIME_DISPLAY_FORMAT, TIME_INPUT_FORMATS, is_empty,
};

/// Sub-values of a split date/time/timezone field, as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SplitDateTimeWithZone {
    pub date: Option<String>,
    pub time: Option<String>,
    pub timezone: Option<String>,
}

impl SplitDateTimeWithZone {
    /// True when both value sub-fields are empty. The timezone sub-value
    /// does not count towards emptiness.
    #[must_use]
    pub fn values_empty(&self) -> bool {
        is_empty(self.date.as_deref()) && is_empty(self.time.as_deref())
    }
}

/// Compound field composing separate date and time sub-values with a
/// timezone selector.
///
/// Emptiness rule: both value sub-fields empty means the whole field is
/// empty, whatever the timezone sub-value holds. One value sub-field
/// filled and the other empty is a validation error for the missing part.
#[derive(Debug, Clone)]
pub struct SplitDateTimeZoneField {
    required: bool,
    date_formats: &'static [&'static str],
    time_formats: &'static [&'static str],
}

impl SplitDateTimeZoneField {
    /// A required field with the default input formats.
    #[must_use]
    pub fn new() -> Self {
        Self {
            required: true,
            date_formats: DATE_INPUT_FORMATS,
            time_formats: TIME_INPUT_FORMATS,
        }
    }

    /// An optional field: empty input cleans to `None`.
    #[must_use]
    pub fn optional() -> Self {
        Self {
            required: false,
            date_formats: DATE_INPUT_FORMATS,
            time_formats: TIME_INPUT_FORMATS,
        }
    }

    /// Replaces the accepted date input formats.
    #[must_use]
    pub fn with_date_formats(mut self, formats: &'static [&'static str]) -> Self {
        self.date_formats = formats;
        self
    }

    /// Replaces the accepted time input formats.
    #[must_use]
    pub fn with_time_formats(mut self, formats: &'static [&'static str]) -> Self {
        self.time_formats = formats;
        self
    }

    fn parse_date(&self, raw: Option<&str>) -> FormResult<NaiveDate> {
        if is_empty(raw) {
            return Err(FormError::InvalidDate);
        }
        let raw = raw.unwrap_or_default().trim();
        self.date_formats
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
            .ok_or(FormError::InvalidDate)
    }

    fn parse_time(&self, raw: Option<&str>) -> FormResult<NaiveTime> {
        if is_empty(raw) {
            return Err(FormError::InvalidTime);
        }
        let raw = raw.unwrap_or_default().trim();
        self.time_formats
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(raw, format).ok())
            .ok_or(FormError::InvalidTime)
    }

    /// ## Summary
    /// Validates sub-values and composes them into a zoned datetime.
    /// Sub-parts are checked in order: date, time, timezone; the first
    /// failure wins.
    ///
    /// ## Errors
    /// `Required` when a required field is submitted empty; otherwise the
    /// error kind of the first missing or unparsable sub-part
    /// (`InvalidDate`, `InvalidTime`, `InvalidTimezone`).
    pub fn clean(&self, input: &SplitDateTimeWithZone) -> FormResult<Option<chrono::DateTime<Tz>>> {
        if input.values_empty() {
            return if self.required {
                Err(FormError::Required)
            } else {
                Ok(None)
            };
        }

        let date = self.parse_date(input.date.as_deref())?;
        let time = self.parse_time(input.time.as_deref())?;

        if is_empty(input.timezone.as_deref()) {
            return Err(FormError::InvalidTimezone);
        }
        let tz = resolve(input.timezone.as_deref().unwrap_or_default().trim())
            .map_err(|_e| FormError::InvalidTimezone)?;

        Ok(Some(localize(NaiveDateTime::new(date, time), tz)))
    }

    /// ## Summary
    /// Splits a zoned value back into sub-values for redisplay.
    /// Sub-second precision is not representable in the input formats and
    /// is dropped.
    #[must_use]
    pub fn decompose(value: chrono::DateTime<Tz>) -> SplitDateTimeWithZone {
        let local = value.naive_local();
        SplitDateTimeWithZone {
            date: Some(local.format(DATE_DISPLAY_FORMAT).to_string()),
            time: Some(local.format(TIME_DISPLAY_FORMAT).to_string()),
            timezone: Some(canonical_name(value.timezone()).to_string()),
        }
    }
}

impl Default for SplitDateTimeZoneField {
    fn default() -> Self {
        Self::new()
    }
}

/// Split field whose cleaned value is stored naive in a fixed storage
/// zone; the counterpart of [`crate::field::datetime_zone::LocalizedDateTimeZoneField`]
/// with separate date and time sub-values.
#[derive(Debug, Clone)]
pub struct LocalizedSplitDateTimeZoneField {
    inner: SplitDateTimeZoneField,
    storage: Tz,
}

impl LocalizedSplitDateTimeZoneField {
    /// A required localized field storing naive values in `storage`.
    #[must_use]
    pub fn new(storage: Tz) -> Self {
        Self {
            inner: SplitDateTimeZoneField::new(),
            storage,
        }
    }

    /// An optional localized field.
    #[must_use]
    pub fn optional(storage: Tz) -> Self {
        Self {
            inner: SplitDateTimeZoneField::optional(),
            storage,
        }
    }

    /// ## Summary
    /// Validates and composes, then converts the result to the storage
    /// zone and strips zone information.
    ///
    /// ## Errors
    /// Same as [`SplitDateTimeZoneField::clean`].
    pub fn clean(&self, input: &SplitDateTimeWithZone) -> FormResult<Option<NaiveDateTime>> {
        let Some(zoned) = self.inner.clean(input)? else {
            return Ok(None);
        };
        let stored = adjust(Timestamp::Zoned(zoned), self.storage, self.storage)
            .map_err(|_e| FormError::InvalidTimezone)?;
        Ok(Some(stored.naive_local()))
    }

    /// ## Summary
    /// Interprets a stored naive value in the storage zone and splits it
    /// into sub-values displayed in `active`.
    #[must_use]
    pub fn decompose(&self, stored: NaiveDateTime, active: Tz) -> SplitDateTimeWithZone {
        let shown = localize(stored, self.storage);
        SplitDateTimeZoneField::decompose(shown.with_timezone(&active))
    }

    /// ## Summary
    /// Sub-values for an empty field: no date or time, the active zone
    /// preselected.
    #[must_use]
    pub fn decompose_empty(active: Tz) -> SplitDateTimeWithZone {
        SplitDateTimeWithZone {
            date: None,
            time: None,
            timezone: Some(canonical_name(active).to_string()),
        }
    }
}
