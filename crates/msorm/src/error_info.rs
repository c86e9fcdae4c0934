//! Engine error records and their reconciliation.
//!
//! SQL Server drivers report a failed execute either on the connection handle
//! or on the statement handle, never reliably on one of them. [`ErrorInfo::reconcile`]
//! picks the populated report so callers always see a single record.

use serde::Serialize;
use std::fmt;

/// SQLSTATE reported when no error occurred.
pub const SUCCESS_SQLSTATE: &str = "00000";

/// A native error report: SQLSTATE, driver-specific code and message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    /// Five-character SQLSTATE class/subclass.
    pub sqlstate: String,
    /// Engine-specific error number.
    pub code: Option<i32>,
    /// Engine-provided message text.
    pub message: Option<String>,
}

impl ErrorInfo {
    /// Create an error record with all fields populated.
    pub fn new(sqlstate: impl Into<String>, code: i32, message: impl Into<String>) -> Self {
        Self {
            sqlstate: sqlstate.into(),
            code: Some(code),
            message: Some(message.into()),
        }
    }

    /// The "no error" sentinel: `00000` with neither code nor message.
    pub fn none() -> Self {
        Self {
            sqlstate: SUCCESS_SQLSTATE.to_string(),
            code: None,
            message: None,
        }
    }

    /// Whether this record is exactly the "no error" sentinel.
    ///
    /// A record with SQLSTATE `00000` but a code or message attached is not
    /// the sentinel and counts as real error content.
    pub fn is_none(&self) -> bool {
        self.sqlstate == SUCCESS_SQLSTATE && self.code.is_none() && self.message.is_none()
    }

    /// Pick the single error record to surface for a failed execute.
    ///
    /// The connection report wins unless it is the sentinel, in which case the
    /// statement report is used (or the sentinel itself when the statement has
    /// nothing either). Two populated reports are not merged.
    pub fn reconcile(connection: ErrorInfo, statement: Option<ErrorInfo>) -> ErrorInfo {
        if !connection.is_none() {
            if let Some(statement) = statement.as_ref().filter(|s| !s.is_none()) {
                tracing::debug!(
                    target: "msorm.error",
                    connection = %connection,
                    statement = %statement,
                    "both handles reported an error; keeping the connection error"
                );
            }
            return connection;
        }
        statement.unwrap_or_else(ErrorInfo::none)
    }
}

impl Default for ErrorInfo {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SQLSTATE[{}]: General error ", self.sqlstate)?;
        if let Some(code) = self.code {
            write!(f, "{code}")?;
        }
        write!(f, ": {}", self.message.as_deref().unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_error_wins_over_statement_sentinel() {
        let conn = ErrorInfo::new("42000", 207, "Invalid column name");
        let info = ErrorInfo::reconcile(conn.clone(), Some(ErrorInfo::none()));
        assert_eq!(info, conn);
        assert_eq!(
            info.to_string(),
            "SQLSTATE[42000]: General error 207: Invalid column name"
        );
    }

    #[test]
    fn statement_error_used_when_connection_is_sentinel() {
        let stmt = ErrorInfo::new("23000", 2627, "Violation of PRIMARY KEY constraint");
        let info = ErrorInfo::reconcile(ErrorInfo::none(), Some(stmt.clone()));
        assert_eq!(info, stmt);
    }

    #[test]
    fn sentinel_when_both_absent() {
        let info = ErrorInfo::reconcile(ErrorInfo::none(), None);
        assert!(info.is_none());
        assert_eq!(info.to_string(), "SQLSTATE[00000]: General error : ");
    }

    #[test]
    fn connection_error_is_not_merged_with_statement_error() {
        let conn = ErrorInfo::new("08S01", 20047, "Communication link failure");
        let stmt = ErrorInfo::new("42S02", 208, "Invalid object name");
        assert_eq!(ErrorInfo::reconcile(conn.clone(), Some(stmt)), conn);
    }

    #[test]
    fn success_state_with_message_is_not_the_sentinel() {
        let info = ErrorInfo {
            sqlstate: SUCCESS_SQLSTATE.to_string(),
            code: None,
            message: Some("canceled".to_string()),
        };
        assert!(!info.is_none());
        assert_eq!(ErrorInfo::reconcile(info.clone(), None), info);
    }
}
