use thiserror::Error;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    CoreError(#[from] meridian_core::error::CoreError),

    #[error(transparent)]
    FormError(#[from] meridian_form::error::FormError),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
