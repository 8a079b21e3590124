use thiserror::Error;

/// Validation failures for form fields, one kind per sub-part.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    #[error("This field is required.")]
    Required,

    #[error("Enter a valid date.")]
    InvalidDate,

    #[error("Enter a valid time.")]
    InvalidTime,

    #[error("Enter a valid date/time.")]
    InvalidDatetime,

    #[error("Invalid timezone.")]
    InvalidTimezone,
}

pub type FormResult<T> = std::result::Result<T, FormError>;
