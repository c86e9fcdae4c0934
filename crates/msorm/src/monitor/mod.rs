//! Query logging for statement execution.
//!
//! A [`QueryLogger`] attached to a connection receives one call per successful
//! execute with the SQL, the supplied arguments and the elapsed time.
//!
//! # Example
//!
//! ```rust,ignore
//! use msorm::monitor::{QueryLogger, TracingLogger};
//! use std::time::Duration;
//!
//! let logger = TracingLogger::new()
//!     .max_sql_length(500)
//!     .slow_query_threshold(Duration::from_millis(250));
//! ```

mod loggers;
mod types;


pub use loggers::{CompositeLogger, NoopLogger, QueryStats, StatsLogger, TracingLogger};
pub use types::{QueryLogger, QueryType};

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
