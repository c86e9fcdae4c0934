//! Result-column binding and visible-column filtering.

use crate::column::{ColumnDescriptor, ColumnKind};
use crate::connection::NativeStatement;
use crate::error::OrmResult;

/// Prefix marking a technical column that callers never see.
pub const TECHNICAL_COLUMN_PREFIX: &str = "__";

/// Character encoding requested for a bound output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Binary,
    Utf8,
}

/// An output buffer registered for one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputBuffer {
    /// Zero-length buffer bound for streaming.
    Lob { encoding: Encoding, data: Vec<u8> },
    Integer(Option<i64>),
    Text { encoding: Encoding, data: Option<String> },
}

impl OutputBuffer {
    /// The empty buffer for a classified kind; `None` for unclassified columns.
    pub fn for_kind(kind: ColumnKind) -> Option<Self> {
        match kind {
            ColumnKind::Binary => Some(OutputBuffer::Lob {
                encoding: Encoding::Binary,
                data: Vec::new(),
            }),
            ColumnKind::Integer => Some(OutputBuffer::Integer(None)),
            ColumnKind::Utf8Text => Some(OutputBuffer::Text {
                encoding: Encoding::Utf8,
                data: None,
            }),
            ColumnKind::Unclassified => None,
        }
    }
}

/// Classify every result column and register its output buffer.
///
/// Unclassified columns are left unbound on purpose so the driver's default
/// marshaling applies to them.
pub fn bind_result_columns<S: NativeStatement + ?Sized>(
    stmt: &mut S,
) -> OrmResult<Vec<ColumnDescriptor>> {
    let count = stmt.column_count();
    let mut columns = Vec::with_capacity(count);
    for index in 0..count {
        let column = ColumnDescriptor::from(stmt.column_meta(index)?);
        match OutputBuffer::for_kind(column.kind) {
            Some(buffer) => stmt.bind_column(index, buffer)?,
            None => tracing::debug!(
                target: "msorm.bind",
                column = %column.name,
                native_type = %column.native_type,
                "unclassified column type, left unbound"
            ),
        }
        columns.push(column);
    }
    Ok(columns)
}

pub fn is_technical_column(name: &str) -> bool {
    name.starts_with(TECHNICAL_COLUMN_PREFIX)
}

/// Positions of the columns callers may see: technical columns and names in
/// `drop_columns` (case-sensitive) are removed.
pub fn visible_column_positions(columns: &[ColumnDescriptor], drop_columns: &[String]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .filter(|(_, c)| !is_technical_column(&c.name) && !drop_columns.contains(&c.name))
        .map(|(i, _)| i)
        .collect()
}
