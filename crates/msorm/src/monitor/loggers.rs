use super::truncate_sql_bytes;
use super::types::{QueryLogger, QueryType};
use crate::param::ParamList;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::Level;

/// A logger that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl QueryLogger for NoopLogger {
    fn log(&self, _sql: &str, _args: Option<&ParamList>, _duration: Duration) {}
}

/// A `tracing`-based logger emitting one event per statement on target `msorm.sql`.
///
/// Arguments are rendered as a JSON object keyed by placeholder.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
    /// Statements slower than this are emitted at WARN instead.
    pub slow_query_threshold: Option<Duration>,
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
            slow_query_threshold: None,
        }
    }
}

impl TracingLogger {
    /// Create a new logger with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Escalate statements slower than `threshold` to WARN.
    pub fn slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    pub(crate) fn render_args(args: Option<&ParamList>) -> String {
        match args {
            None => "null".to_string(),
            Some(args) => serde_json::to_string(args)
                .unwrap_or_else(|e| format!("<unserializable arguments: {e}>")),
        }
    }

    pub(crate) fn effective_level(&self, duration: Duration) -> Level {
        match self.slow_query_threshold {
            Some(threshold) if duration >= threshold => Level::WARN,
            _ => self.level,
        }
    }
}

impl QueryLogger for TracingLogger {
    fn log(&self, sql: &str, args: Option<&ParamList>, duration: Duration) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql_text = self.truncate_sql(sql);
        let args_text = Self::render_args(args);
        emit_at_level!(
            self.effective_level(duration),
            target: "msorm.sql",
            query_type = ?QueryType::from_sql(sql),
            duration_ms = duration.as_secs_f64() * 1000.0,
            args = %args_text,
            sql = %sql_text,
        );
    }
}

/// A logger that tracks execution statistics.
#[derive(Debug, Default)]
pub struct StatsLogger {
    total_queries: AtomicU64,
    update_count: AtomicU64,
    select_count: AtomicU64,
    total_duration_nanos: AtomicU64,
    max_duration_nanos: AtomicU64,
    slowest_query: Mutex<Option<String>>,
}

/// Collected execution statistics.
#[derive(Debug, Clone, Default)]
pub struct QueryStats {
    /// Total number of statements logged.
    pub total_queries: u64,
    /// Number of UPDATE statements.
    pub update_count: u64,
    /// Number of SELECT statements.
    pub select_count: u64,
    /// Total execution time.
    pub total_duration: Duration,
    /// Slowest statement duration.
    pub max_duration: Duration,
    /// Slowest statement SQL.
    pub slowest_query: Option<String>,
}

impl StatsLogger {
    /// Create a new stats logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of current statistics.
    pub fn stats(&self) -> QueryStats {
        QueryStats {
            total_queries: self.total_queries.load(Ordering::Relaxed),
            update_count: self.update_count.load(Ordering::Relaxed),
            select_count: self.select_count.load(Ordering::Relaxed),
            total_duration: Duration::from_nanos(self.total_duration_nanos.load(Ordering::Relaxed)),
            max_duration: Duration::from_nanos(self.max_duration_nanos.load(Ordering::Relaxed)),
            slowest_query: self
                .slowest_query
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }

    /// Reset all statistics.
    pub fn reset(&self) {
        self.total_queries.store(0, Ordering::Relaxed);
        self.update_count.store(0, Ordering::Relaxed);
        self.select_count.store(0, Ordering::Relaxed);
        self.total_duration_nanos.store(0, Ordering::Relaxed);
        self.max_duration_nanos.store(0, Ordering::Relaxed);
        *self
            .slowest_query
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl QueryLogger for StatsLogger {
    fn log(&self, sql: &str, _args: Option<&ParamList>, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);

        self.total_queries.fetch_add(1, Ordering::Relaxed);
        match QueryType::from_sql(sql) {
            QueryType::Update => {
                self.update_count.fetch_add(1, Ordering::Relaxed);
            }
            QueryType::Select => {
                self.select_count.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }

        let prev = self.total_duration_nanos.fetch_add(nanos, Ordering::Relaxed);
        if prev.checked_add(nanos).is_none() {
            self.total_duration_nanos.store(u64::MAX, Ordering::Relaxed);
        }

        if self.max_duration_nanos.fetch_max(nanos, Ordering::Relaxed) < nanos {
            *self
                .slowest_query
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(sql.to_string());
        }
    }
}

/// Fans a log entry out to several loggers, in insertion order.
#[derive(Clone, Default)]
pub struct CompositeLogger {
    loggers: Vec<Arc<dyn QueryLogger>>,
}

impl CompositeLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a logger.
    pub fn add<L: QueryLogger + 'static>(self, logger: L) -> Self {
        self.add_arc(Arc::new(logger))
    }

    /// Add a logger from an `Arc`.
    pub fn add_arc(mut self, logger: Arc<dyn QueryLogger>) -> Self {
        self.loggers.push(logger);
        self
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }
}

impl std::fmt::Debug for CompositeLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeLogger")
            .field("loggers", &self.loggers.len())
            .finish()
    }
}

impl QueryLogger for CompositeLogger {
    fn log(&self, sql: &str, args: Option<&ParamList>, duration: Duration) {
        for logger in &self.loggers {
            logger.log(sql, args, duration);
        }
    }
}
