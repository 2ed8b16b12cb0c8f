use thiserror::Error;

/// Core error types for catalog operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid genre code: {0}")]
    InvalidGenre(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidField { field: &'static str, message: String },
}

impl CoreError {
    /// Create a new InvalidGenre error
    pub fn invalid_genre(code: impl Into<String>) -> Self {
        Self::InvalidGenre(code.into())
    }

    /// Create a new InvalidDate error
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate(value.into())
    }

    /// Create a new InvalidField error
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
