//! Engine capabilities consumed by the dialect layer.
//!
//! The crate never talks to a server itself. A driver implements
//! [`Connection`] and [`NativeStatement`]; the dialect types are composed on
//! top of those handles.

use crate::binder::OutputBuffer;
use crate::column::NativeColumnMeta;
use crate::config::{FetchMode, PrepareOptions};
use crate::error::OrmResult;
use crate::error_info::ErrorInfo;
use crate::monitor::QueryLogger;
use crate::param::ParamList;
use crate::statement::Statement;
use crate::value::Value;
use bytes::Bytes;
use std::collections::BTreeSet;

/// SQL text helpers that depend on the target dialect.
///
/// The provided methods implement SQL Server conventions; drivers override
/// them only when they need different quoting.
pub trait Dialect {
    /// Quote a column identifier: `name` → `[name]`, dotted parts quoted separately.
    fn quote_identifier(&self, name: &str) -> String {
        name.split('.')
            .map(|part| format!("[{}]", part.replace(']', "]]")))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Strip everything but `[A-Za-z0-9_.]` from a table name.
    fn escape_table(&self, name: &str) -> String {
        name.chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
            .collect()
    }

    /// Build a `/* ... */ ` prefix from query comments; empty input gives "".
    fn make_comment(&self, comments: &[String]) -> String {
        if comments.is_empty() {
            return String::new();
        }
        let joined = comments.join(". ");
        let mut filtered = String::with_capacity(joined.len());
        for c in joined.chars() {
            match c {
                '*' => filtered.push_str(" * "),
                ';' => {}
                c => filtered.push(c),
            }
        }
        format!("/* {filtered} */ ")
    }
}

/// Column information for a table, as reported by schema introspection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnInformation {
    /// The identity (auto-increment) column, if the table has one.
    pub identity: Option<String>,
    /// Columns stored as large objects (`varbinary(max)`, `nvarchar(max)`, ...).
    pub blobs: BTreeSet<String>,
}

impl ColumnInformation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, column: impl Into<String>) -> Self {
        self.identity = Some(column.into());
        self
    }

    pub fn with_blob(mut self, column: impl Into<String>) -> Self {
        self.blobs.insert(column.into());
        self
    }

    pub fn is_blob(&self, column: &str) -> bool {
        self.blobs.contains(column)
    }
}

/// Schema introspection; only its column-information result is consumed.
pub trait Schema {
    fn query_column_information(&self, table: &str) -> OrmResult<ColumnInformation>;
}

/// A prepared statement handle owned by the driver.
///
/// Column indices are zero-based.
pub trait NativeStatement {
    /// The SQL this handle was prepared from.
    fn sql(&self) -> &str;

    /// Run the statement. `None` means no parameters were supplied (previously
    /// bound values are used). Returns the driver's success indicator.
    fn run(&mut self, args: Option<&ParamList>) -> bool;

    /// The error record held by this statement handle.
    fn error_info(&self) -> ErrorInfo;

    /// Number of columns in the current result.
    fn column_count(&self) -> usize;

    fn column_meta(&self, index: usize) -> OrmResult<NativeColumnMeta>;

    /// Register an output buffer for a result column.
    fn bind_column(&mut self, index: usize, buffer: OutputBuffer) -> OrmResult<()>;

    /// Bind an inline parameter value.
    fn bind_value(&mut self, placeholder: &str, value: &Value) -> OrmResult<()>;

    /// Bind a large object by reference. The handle must not outlive the
    /// next [`NativeStatement::release_blobs`] call.
    fn bind_blob(&mut self, placeholder: &str, blob: Bytes) -> OrmResult<()>;

    /// Drop every large-object registration made through `bind_blob`.
    fn release_blobs(&mut self) {}

    fn set_fetch_mode(&mut self, mode: &FetchMode);

    /// Next row with every native column, numerically indexed.
    fn fetch_row(&mut self) -> OrmResult<Option<Vec<Value>>>;

    /// Remaining rows as (first column, second column) pairs.
    fn fetch_key_pairs(&mut self) -> OrmResult<Vec<(Value, Value)>>;

    /// Rows affected by the last execute.
    fn row_count(&self) -> u64;
}

/// A connection to the engine.
pub trait Connection: Dialect {
    type Statement: NativeStatement;
    type Schema: Schema;

    /// The error record held by the connection handle.
    fn error_info(&self) -> ErrorInfo;

    fn schema(&self) -> &Self::Schema;

    /// Prepare a native statement with the given driver options.
    fn prepare(&self, sql: &str, options: &PrepareOptions) -> OrmResult<Self::Statement>;

    /// The attached query logger, if any.
    fn logger(&self) -> Option<&dyn QueryLogger> {
        None
    }

    /// Prepare `sql` with default options.
    fn prepare_query(&self, sql: &str) -> OrmResult<Statement<'_, Self>>
    where
        Self: Sized,
    {
        self.prepare_query_with(sql, PrepareOptions::default())
    }

    /// Prepare `sql` with explicit driver options.
    fn prepare_query_with(
        &self,
        sql: &str,
        options: PrepareOptions,
    ) -> OrmResult<Statement<'_, Self>>
    where
        Self: Sized,
    {
        let native = self.prepare(sql, &options)?;
        Ok(Statement::new(self, native, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;
    impl Dialect for Plain {}

    #[test]
    fn quote_identifier_brackets_each_part() {
        assert_eq!(Plain.quote_identifier("name"), "[name]");
        assert_eq!(Plain.quote_identifier("dbo.users"), "[dbo].[users]");
        assert_eq!(Plain.quote_identifier("we]ird"), "[we]]ird]");
    }

    #[test]
    fn escape_table_strips_unsafe_chars() {
        assert_eq!(Plain.escape_table("users; DROP TABLE x"), "usersDROPTABLEx");
        assert_eq!(Plain.escape_table("dbo.users_2"), "dbo.users_2");
    }

    #[test]
    fn make_comment_sanitizes() {
        assert_eq!(Plain.make_comment(&[]), "");
        let comments = vec!["bulk fix".to_string(), "evil */ DROP;".to_string()];
        assert_eq!(
            Plain.make_comment(&comments),
            "/* bulk fix. evil  * / DROP */ "
        );
    }

    #[test]
    fn column_information_tracks_blobs() {
        let info = ColumnInformation::new()
            .with_identity("id")
            .with_blob("avatar");
        assert_eq!(info.identity.as_deref(), Some("id"));
        assert!(info.is_blob("avatar"));
        assert!(!info.is_blob("name"));
    }
}
