//! Error types for Dashtable
//!
//! Only construction and I/O around the engine can fail. Table operations
//! themselves are infallible: bad input is ignored and logged.

use thiserror::Error;

/// Main error type for Dashtable operations
#[derive(Error, Debug)]
pub enum DashtableError {
    #[error("A table needs at least one column")]
    NoColumns,

    #[error("Column id '{0}' is declared more than once")]
    DuplicateColumn(String),

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Logger setup failed: {0}")]
    LoggerError(String),
}

/// Result type alias for Dashtable operations
pub type Result<T> = std::result::Result<T, DashtableError>;

impl DashtableError {
    /// Whether the error comes from the caller's column/option setup rather
    /// than from the environment.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DashtableError::NoColumns
                | DashtableError::DuplicateColumn(_)
                | DashtableError::UnknownColumn(_)
                | DashtableError::InvalidArgument(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_classified() {
        assert!(DashtableError::NoColumns.is_configuration());
        assert!(DashtableError::DuplicateColumn("name".into()).is_configuration());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(!DashtableError::from(io).is_configuration());
    }

    #[test]
    fn messages_name_the_column() {
        let err = DashtableError::DuplicateColumn("city".into());
        assert_eq!(err.to_string(), "Column id 'city' is declared more than once");
    }
}
