//! Statement execution for SQL Server.
//!
//! [`Statement`] wraps a driver handle together with the connection it came
//! from. After each execute it binds typed output buffers for the result
//! columns and computes the visible column set, hiding technical columns.

use crate::binder::{bind_result_columns, visible_column_positions};
use crate::column::ColumnDescriptor;
use crate::config::{FetchMode, PrepareOptions, QueryOptions};
use crate::connection::{Connection, NativeStatement};
use crate::error::{OrmError, OrmResult};
use crate::error_info::ErrorInfo;
use crate::param::ParamList;
use crate::row::Row;
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// A prepared statement bound to its connection.
///
/// Binding state is mutated in place by every execute; a statement must not
/// be shared across concurrent calls.
pub struct Statement<'c, C: Connection> {
    conn: &'c C,
    native: C::Statement,
    fetch_mode: FetchMode,
    prepare_options: PrepareOptions,
    reprepare: bool,
    columns: Vec<ColumnDescriptor>,
    visible: Vec<usize>,
    column_names: Arc<[String]>,
}

impl<'c, C: Connection> Statement<'c, C> {
    pub(crate) fn new(conn: &'c C, native: C::Statement, prepare_options: PrepareOptions) -> Self {
        Self {
            conn,
            native,
            fetch_mode: FetchMode::default(),
            prepare_options,
            reprepare: false,
            columns: Vec::new(),
            visible: Vec::new(),
            column_names: Arc::from(Vec::new()),
        }
    }

    pub fn sql(&self) -> &str {
        self.native.sql()
    }

    pub fn native(&self) -> &C::Statement {
        &self.native
    }

    /// Driver handle for binding values before an execute.
    ///
    /// A re-prepare still pending from [`require_insecure`](Self::require_insecure)
    /// is applied first, so values bound here are the ones the next execute
    /// runs with.
    pub fn native_mut(&mut self) -> OrmResult<&mut C::Statement> {
        self.apply_pending_prepare()?;
        Ok(&mut self.native)
    }

    /// Handle access that never re-prepares.
    pub(crate) fn handle_mut(&mut self) -> &mut C::Statement {
        &mut self.native
    }

    fn apply_pending_prepare(&mut self) -> OrmResult<()> {
        if self.reprepare {
            let sql = self.native.sql().to_string();
            self.native = self.conn.prepare(&sql, &self.prepare_options)?;
            self.native.set_fetch_mode(&self.fetch_mode);
            self.reprepare = false;
            tracing::debug!(target: "msorm.prepare", sql = %sql, "statement re-prepared");
        }
        Ok(())
    }

    pub fn fetch_mode(&self) -> &FetchMode {
        &self.fetch_mode
    }

    pub fn set_fetch_mode(&mut self, mode: FetchMode) {
        self.native.set_fetch_mode(&mode);
        self.fetch_mode = mode;
    }

    /// The driver options this statement is (or will next be) prepared with.
    pub fn prepare_options(&self) -> PrepareOptions {
        self.prepare_options
    }

    /// Require the statement to be sent exactly as written.
    ///
    /// Nothing happens immediately: the statement is re-prepared with direct
    /// query and emulated prepares disabled by the next call to
    /// [`native_mut`](Self::native_mut), or by the next execute that is not
    /// marked `already_prepared`.
    pub fn require_insecure(&mut self) {
        if !self.prepare_options.is_insecure() {
            self.prepare_options = PrepareOptions::insecure();
            self.reprepare = true;
        }
    }

    /// Every result column of the last execute, classified.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Names of the visible result columns of the last execute.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Run the statement.
    ///
    /// An empty `args` list is sent as "no parameters supplied" so values
    /// bound beforehand are kept. Failures are reported as
    /// [`OrmError::Execution`] with the reconciled engine error. The return
    /// value is the driver's success indicator; rows come from the fetch
    /// methods.
    pub fn execute(&mut self, args: &ParamList, options: &QueryOptions) -> OrmResult<bool> {
        if !options.already_prepared {
            self.apply_pending_prepare()?;
        }

        if let Some(fetch) = options.fetch.clone() {
            self.set_fetch_mode(fetch.into_mode());
        }

        let conn = self.conn;
        let logger = conn.logger();
        let start = logger.map(|_| Instant::now());

        self.columns.clear();
        self.visible.clear();
        self.column_names = Arc::from(Vec::new());

        let args = args.as_supplied();
        if !self.native.run(args) {
            return Err(OrmError::Execution(self.reconciled_error()));
        }

        self.columns = bind_result_columns(&mut self.native)?;

        if let (Some(logger), Some(start)) = (logger, start) {
            logger.log(self.native.sql(), args, start.elapsed());
        }

        self.visible = visible_column_positions(&self.columns, &options.drop_columns);
        if self.visible.len() != self.columns.len() {
            tracing::trace!(
                target: "msorm.bind",
                hidden = self.columns.len() - self.visible.len(),
                "technical columns removed from result"
            );
        }
        self.column_names = self
            .visible
            .iter()
            .map(|&i| self.columns[i].name.clone())
            .collect();

        Ok(true)
    }

    fn reconciled_error(&self) -> ErrorInfo {
        let info = ErrorInfo::reconcile(self.conn.error_info(), Some(self.native.error_info()));
        tracing::debug!(target: "msorm.error", sql = %self.native.sql(), error = %info, "execute failed");
        info
    }

    /// Rows affected by the last execute.
    pub fn row_count(&self) -> u64 {
        self.native.row_count()
    }

    /// Next row, restricted to the visible columns.
    pub fn fetch(&mut self) -> OrmResult<Option<Row>> {
        let Some(values) = self.native.fetch_row()? else {
            return Ok(None);
        };
        let visible = self
            .visible
            .iter()
            .map(|&i| values.get(i).cloned().unwrap_or_default())
            .collect();
        Ok(Some(Row::new(self.column_names.clone(), visible)))
    }

    /// All remaining rows, restricted to the visible columns.
    pub fn fetch_all(&mut self) -> OrmResult<Vec<Row>> {
        let mut rows = Vec::new();
        while let Some(row) = self.fetch()? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// One visible column of every remaining row.
    pub fn fetch_column(&mut self, index: usize) -> OrmResult<Vec<Value>> {
        let mut out = Vec::new();
        while let Some(row) = self.fetch()? {
            let value = row
                .get_index(index)
                .cloned()
                .ok_or_else(|| OrmError::decode(format!("#{index}"), "column index out of range"))?;
            out.push(value);
        }
        Ok(out)
    }

    /// Map column `key_index` to column `value_index` over the remaining rows.
    ///
    /// Indices address the native result columns, technical and dropped
    /// columns included, unlike [`fetch_column`](Self::fetch_column) which
    /// indexes the visible columns.
    ///
    /// With the default indices on a two-column result the driver's key-pair
    /// mode is used; otherwise rows are read numerically. Later rows overwrite
    /// earlier ones with the same key.
    pub fn fetch_all_keyed(
        &mut self,
        key_index: usize,
        value_index: usize,
    ) -> OrmResult<HashMap<Value, Value>> {
        if key_index == 0 && value_index == 1 && self.native.column_count() == 2 {
            self.set_fetch_mode(FetchMode::KeyPair);
            return Ok(self.native.fetch_key_pairs()?.into_iter().collect());
        }

        self.set_fetch_mode(FetchMode::Num);
        let mut out = HashMap::new();
        while let Some(row) = self.native.fetch_row()? {
            let key = column_at(&row, key_index)?;
            let value = column_at(&row, value_index)?;
            out.insert(key, value);
        }
        Ok(out)
    }
}

fn column_at(row: &[Value], index: usize) -> OrmResult<Value> {
    row.get(index)
        .cloned()
        .ok_or_else(|| OrmError::decode(format!("#{index}"), "column index out of range"))
}

impl<C: Connection> std::fmt::Debug for Statement<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Statement")
            .field("sql", &self.native.sql())
            .field("fetch_mode", &self.fetch_mode)
            .field("prepare_options", &self.prepare_options)
            .field("column_names", &self.column_names)
            .finish()
    }
}
