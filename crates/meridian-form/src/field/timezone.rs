//! Single-value timezone selector field.

use chrono_tz::Tz;

use meridian_core::tz::resolve::resolve;

use crate::error::{FormError, FormResult};
use crate::field::is_empty;

/// Validates a submitted timezone identifier against the zone database.
///
/// The counterpart of a choice field whose choices are the zone database
/// itself: any submitted value outside it is an invalid choice.
#[derive(Debug, Clone, Copy)]
pub struct TimeZoneSelect {
    required: bool,
}

impl TimeZoneSelect {
    /// A required selector. Empty input is a validation error.
    #[must_use]
    pub fn new() -> Self {
        Self { required: true }
    }

    /// An optional selector. Empty input cleans to `None`.
    #[must_use]
    pub fn optional() -> Self {
        Self { required: false }
    }

    /// ## Summary
    /// Validates and resolves a submitted value.
    ///
    /// ## Errors
    /// `Required` when a required selector receives empty input;
    /// `InvalidTimezone` when a non-empty value is not a zone name.
    pub fn clean(self, raw: Option<&str>) -> FormResult<Option<Tz>> {
        if is_empty(raw) {
            return if self.required {
                Err(FormError::Required)
            } else {
                Ok(None)
            };
        }

        // `raw` is non-empty here; trim only surrounding whitespace.
        let value = raw.unwrap_or_default().trim();
        resolve(value)
            .map(Some)
            .map_err(|_e| FormError::InvalidTimezone)
    }
}

impl Default for TimeZoneSelect {
    fn default() -> Self {
        Self::new()
    }
}

/// ## Summary
/// All selectable zone identifiers, in zone database order. Feed these to
/// whatever renders the selector.
#[must_use]
pub fn choices() -> impl Iterator<Item = &'static str> {
    chrono_tz::TZ_VARIANTS.iter().map(|tz| tz.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_required_valid_choice() {
        let field = TimeZoneSelect::new();
        let tz = field.clean(Some("US/Eastern")).expect("should clean");
        assert_eq!(tz, Some(Tz::US__Eastern));
    }

    #[test]
    fn test_clean_required_rejects_empty() {
        let field = TimeZoneSelect::new();
        assert_eq!(field.clean(Some("")), Err(FormError::Required));
        assert_eq!(field.clean(None), Err(FormError::Required));
    }

    #[test]
    fn test_clean_optional_accepts_empty() {
        let field = TimeZoneSelect::optional();
        assert_eq!(field.clean(Some("")), Ok(None));
        assert_eq!(field.clean(None), Ok(None));
    }

    #[test]
    fn test_clean_bad_value() {
        let field = TimeZoneSelect::new();
        assert_eq!(field.clean(Some("BAD VALUE")), Err(FormError::InvalidTimezone));
    }

    #[test]
    fn test_clean_trims_whitespace() {
        let field = TimeZoneSelect::new();
        let tz = field.clean(Some(" Europe/Warsaw ")).expect("should clean");
        assert_eq!(tz, Some(Tz::Europe__Warsaw));
    }

    #[test]
    fn test_every_choice_cleans() {
        let field = TimeZoneSelect::new();
        for choice in choices() {
            assert!(field.clean(Some(choice)).is_ok(), "{choice} should clean");
        }
    }
}
