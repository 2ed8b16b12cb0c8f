//! Storage error types for the catalog storage layer.

use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A record with the same primary key is already stored.
    #[error("{model} already exists: {id}")]
    AlreadyExists { model: &'static str, id: u64 },

    /// The record data is invalid.
    #[error("Invalid {model}: {message}")]
    InvalidRecord { model: &'static str, message: String },

    /// A relation points at a record that does not exist.
    #[error("{model} {id} references missing {target} {target_id}")]
    BrokenReference {
        model: &'static str,
        id: u64,
        target: &'static str,
        target_id: u64,
    },

    /// Loading seed data failed.
    #[error("Fixture error: {message}")]
    Fixture { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl StorageError {
    #[must_use]
    pub fn already_exists(model: &'static str, id: u64) -> Self {
        Self::AlreadyExists { model, id }
    }

    #[must_use]
    pub fn invalid_record(model: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            model,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn broken_reference(
        model: &'static str,
        id: u64,
        target: &'static str,
        target_id: u64,
    ) -> Self {
        Self::BrokenReference {
            model,
            id,
            target,
            target_id,
        }
    }

    #[must_use]
    pub fn fixture(message: impl Into<String>) -> Self {
        Self::Fixture {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the error category for logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AlreadyExists { .. } => ErrorCategory::Conflict,
            Self::InvalidRecord { .. } | Self::BrokenReference { .. } => ErrorCategory::Validation,
            Self::Fixture { .. } => ErrorCategory::Fixture,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of storage errors for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Conflict,
    Validation,
    Fixture,
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict => write!(f, "conflict"),
            Self::Validation => write!(f, "validation"),
            Self::Fixture => write!(f, "fixture"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::already_exists("Book", 7);
        assert_eq!(err.to_string(), "Book already exists: 7");

        let err = StorageError::broken_reference("Book", 3, "Author", 99);
        assert_eq!(err.to_string(), "Book 3 references missing Author 99");
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            StorageError::already_exists("Author", 1).category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            StorageError::invalid_record("Book", "title: must not be blank").category(),
            ErrorCategory::Validation
        );
        assert_eq!(ErrorCategory::Conflict.to_string(), "conflict");
    }
}
