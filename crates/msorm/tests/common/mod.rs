//! In-memory engine used by the integration tests.

#![allow(dead_code)]

use bytes::Bytes;
use msorm::{
    ColumnInformation, Connection, Dialect, ErrorInfo, FetchMode, NativeColumnMeta,
    NativeStatement, OrmError, OrmResult, OutputBuffer, ParamList, PrepareOptions, QueryLogger,
    Schema, Value,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Everything the mock driver was asked to do.
#[derive(Debug, Default)]
pub struct Trace {
    pub prepared: Vec<(String, PrepareOptions)>,
    pub bound: Vec<(String, Value)>,
    pub blobs: Vec<(String, Bytes)>,
    pub released_blobs: usize,
    pub runs: Vec<Option<ParamList>>,
    /// Values held by the running handle at each run.
    pub bound_at_run: Vec<usize>,
    pub column_bindings: Vec<(usize, OutputBuffer)>,
    pub fetch_modes: Vec<FetchMode>,
}

/// The canned outcome of the next execute.
#[derive(Debug, Clone, Default)]
pub struct MockResult {
    pub columns: Vec<NativeColumnMeta>,
    pub rows: Vec<Vec<Value>>,
    pub row_count: u64,
    /// `Some((connection, statement))` makes the execute fail.
    pub failure: Option<(ErrorInfo, ErrorInfo)>,
}

impl MockResult {
    pub fn affected(row_count: u64) -> Self {
        Self {
            row_count,
            ..Self::default()
        }
    }

    pub fn rows(columns: &[(&str, &str)], rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|(name, ty)| NativeColumnMeta::new(*name, *ty))
                .collect(),
            rows,
            ..Self::default()
        }
    }

    pub fn failing(connection: ErrorInfo, statement: ErrorInfo) -> Self {
        Self {
            failure: Some((connection, statement)),
            ..Self::default()
        }
    }
}

#[derive(Default)]
pub struct MockSchema {
    pub tables: HashMap<String, ColumnInformation>,
}

impl Schema for MockSchema {
    fn query_column_information(&self, table: &str) -> OrmResult<ColumnInformation> {
        Ok(self.tables.get(table).cloned().unwrap_or_default())
    }
}

/// Records every log entry.
#[derive(Default)]
pub struct RecordingLogger {
    pub entries: Mutex<Vec<(String, Option<ParamList>, Duration)>>,
}

impl RecordingLogger {
    pub fn entries(&self) -> Vec<(String, Option<ParamList>, Duration)> {
        self.entries.lock().unwrap().clone()
    }
}

impl QueryLogger for RecordingLogger {
    fn log(&self, sql: &str, args: Option<&ParamList>, duration: Duration) {
        self.entries
            .lock()
            .unwrap()
            .push((sql.to_string(), args.cloned(), duration));
    }
}

pub struct MockConnection {
    pub schema: MockSchema,
    pub trace: Rc<RefCell<Trace>>,
    pub result: RefCell<MockResult>,
    pub error: Rc<RefCell<ErrorInfo>>,
    pub logger: Option<Arc<RecordingLogger>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            schema: MockSchema::default(),
            trace: Rc::new(RefCell::new(Trace::default())),
            result: RefCell::new(MockResult::default()),
            error: Rc::new(RefCell::new(ErrorInfo::none())),
            logger: None,
        }
    }

    pub fn with_table(mut self, table: &str, info: ColumnInformation) -> Self {
        self.schema.tables.insert(table.to_string(), info);
        self
    }

    pub fn with_result(self, result: MockResult) -> Self {
        *self.result.borrow_mut() = result;
        self
    }

    pub fn with_logger(mut self, logger: Arc<RecordingLogger>) -> Self {
        self.logger = Some(logger);
        self
    }
}

impl Dialect for MockConnection {
    fn quote_identifier(&self, name: &str) -> String {
        name.to_string()
    }
}

impl Connection for MockConnection {
    type Statement = MockStatement;
    type Schema = MockSchema;

    fn error_info(&self) -> ErrorInfo {
        self.error.borrow().clone()
    }

    fn schema(&self) -> &MockSchema {
        &self.schema
    }

    fn prepare(&self, sql: &str, options: &PrepareOptions) -> OrmResult<MockStatement> {
        self.trace
            .borrow_mut()
            .prepared
            .push((sql.to_string(), *options));
        Ok(MockStatement {
            sql: sql.to_string(),
            trace: self.trace.clone(),
            result: self.result.borrow().clone(),
            conn_error: self.error.clone(),
            error: ErrorInfo::none(),
            held: 0,
            executed: false,
            cursor: 0,
        })
    }

    fn logger(&self) -> Option<&dyn QueryLogger> {
        self.logger.as_deref().map(|l| l as &dyn QueryLogger)
    }
}

pub struct MockStatement {
    sql: String,
    trace: Rc<RefCell<Trace>>,
    result: MockResult,
    conn_error: Rc<RefCell<ErrorInfo>>,
    error: ErrorInfo,
    held: usize,
    executed: bool,
    cursor: usize,
}

impl NativeStatement for MockStatement {
    fn sql(&self) -> &str {
        &self.sql
    }

    fn run(&mut self, args: Option<&ParamList>) -> bool {
        {
            let mut trace = self.trace.borrow_mut();
            trace.runs.push(args.cloned());
            trace.bound_at_run.push(self.held);
        }
        if let Some((conn, stmt)) = self.result.failure.clone() {
            *self.conn_error.borrow_mut() = conn;
            self.error = stmt;
            return false;
        }
        self.executed = true;
        self.cursor = 0;
        true
    }

    fn error_info(&self) -> ErrorInfo {
        self.error.clone()
    }

    fn column_count(&self) -> usize {
        if self.executed {
            self.result.columns.len()
        } else {
            0
        }
    }

    fn column_meta(&self, index: usize) -> OrmResult<NativeColumnMeta> {
        self.result
            .columns
            .get(index)
            .cloned()
            .ok_or_else(|| OrmError::Other(format!("no column {index}")))
    }

    fn bind_column(&mut self, index: usize, buffer: OutputBuffer) -> OrmResult<()> {
        self.trace.borrow_mut().column_bindings.push((index, buffer));
        Ok(())
    }

    fn bind_value(&mut self, placeholder: &str, value: &Value) -> OrmResult<()> {
        self.held += 1;
        self.trace
            .borrow_mut()
            .bound
            .push((placeholder.to_string(), value.clone()));
        Ok(())
    }

    fn bind_blob(&mut self, placeholder: &str, blob: Bytes) -> OrmResult<()> {
        self.held += 1;
        self.trace
            .borrow_mut()
            .blobs
            .push((placeholder.to_string(), blob));
        Ok(())
    }

    fn release_blobs(&mut self) {
        self.trace.borrow_mut().released_blobs += 1;
    }

    fn set_fetch_mode(&mut self, mode: &FetchMode) {
        self.trace.borrow_mut().fetch_modes.push(mode.clone());
    }

    fn fetch_row(&mut self) -> OrmResult<Option<Vec<Value>>> {
        let row = self.result.rows.get(self.cursor).cloned();
        if row.is_some() {
            self.cursor += 1;
        }
        Ok(row)
    }

    fn fetch_key_pairs(&mut self) -> OrmResult<Vec<(Value, Value)>> {
        let mut pairs = Vec::new();
        while let Some(row) = self.fetch_row()? {
            let mut it = row.into_iter();
            pairs.push((it.next().unwrap_or_default(), it.next().unwrap_or_default()));
        }
        Ok(pairs)
    }

    fn row_count(&self) -> u64 {
        if self.executed { self.result.row_count } else { 0 }
    }
}
