//! Error types for msorm

use crate::error_info::ErrorInfo;
use thiserror::Error;

/// Result type alias for msorm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum OrmError {
    /// The engine rejected an execute call.
    ///
    /// Carries the reconciled error record; the display form is the
    /// `SQLSTATE[..]: General error ..: ..` message.
    #[error("{0}")]
    Execution(ErrorInfo),

    /// A parameter or output column could not be bound
    #[error("Bind error on '{placeholder}': {message}")]
    Bind { placeholder: String, message: String },

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a bind error for a specific placeholder
    pub fn bind(placeholder: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Bind {
            placeholder: placeholder.into(),
            message: message.into(),
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is an execution failure
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// The engine error record, for execution failures.
    pub fn error_info(&self) -> Option<&ErrorInfo> {
        match self {
            Self::Execution(info) => Some(info),
            _ => None,
        }
    }

    /// The SQLSTATE reported by the engine, if this error came from it.
    pub fn sqlstate(&self) -> Option<&str> {
        self.error_info().map(|info| info.sqlstate.as_str())
    }
}
