//! Parameter binding for prepared statements.
//!
//! Expression arguments are bound first, then literal field values under
//! numbered placeholders, then condition arguments. Large objects are bound by
//! reference and kept alive by a [`BlobHolder`] for the duration of one
//! execute call.

use crate::connection::{ColumnInformation, NativeStatement};
use crate::error::OrmResult;
use crate::param::ParamList;
use crate::value::Value;
use bytes::Bytes;

/// A SET expression with its own arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionField {
    /// SQL placed on the right-hand side of `field =`.
    pub expression: String,
    pub arguments: ParamList,
}

impl ExpressionField {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            arguments: ParamList::new(),
        }
    }

    pub fn with_arguments(mut self, arguments: ParamList) -> Self {
        self.arguments = arguments;
        self
    }
}

/// Owns the large-object buffers bound during one execute call.
#[derive(Debug, Default)]
pub struct BlobHolder {
    blobs: Vec<Bytes>,
}

impl BlobHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `blob` alive and return the handle to bind.
    pub fn hold(&mut self, blob: Bytes) -> Bytes {
        self.blobs.push(blob.clone());
        blob
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Drop the statement's large-object registrations, then the buffers.
    pub fn release<S: NativeStatement + ?Sized>(self, stmt: &mut S) {
        if !self.blobs.is_empty() {
            stmt.release_blobs();
        }
    }
}

/// Bind every expression's arguments and remove the same-named literal
/// fields from `fields`: an expression overrides a literal value.
pub fn bind_expressions<S: NativeStatement + ?Sized>(
    stmt: &mut S,
    expression_fields: &[(String, ExpressionField)],
    fields: &mut Vec<(String, Value)>,
) -> OrmResult<()> {
    for (field, data) in expression_fields {
        bind_arguments(stmt, &data.arguments)?;
        fields.retain(|(name, _)| name != field);
    }
    Ok(())
}

/// Bind literal field values as `{prefix}0`, `{prefix}1`, ... in field order.
///
/// Byte values, and text destined for a large-object column, are bound by
/// reference through `blobs`.
pub fn bind_values<S: NativeStatement + ?Sized>(
    stmt: &mut S,
    fields: &[(String, Value)],
    blobs: &mut BlobHolder,
    placeholder_prefix: &str,
    column_information: &ColumnInformation,
) -> OrmResult<()> {
    for (n, (field, value)) in fields.iter().enumerate() {
        let placeholder = format!("{placeholder_prefix}{n}");
        let lob = if value.is_blob() || column_information.is_blob(field) {
            match value {
                Value::Bytes(b) => Some(b.clone()),
                Value::Text(s) => Some(Bytes::from(s.clone())),
                _ => None,
            }
        } else {
            None
        };
        match lob {
            Some(blob) => stmt.bind_blob(&placeholder, blobs.hold(blob))?,
            None => stmt.bind_value(&placeholder, value)?,
        }
    }
    Ok(())
}

/// Bind arguments under their own placeholder names, in order.
pub fn bind_arguments<S: NativeStatement + ?Sized>(stmt: &mut S, arguments: &ParamList) -> OrmResult<()> {
    for param in arguments {
        stmt.bind_value(&param.placeholder, &param.value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holder_keeps_buffers_until_dropped() {
        let mut holder = BlobHolder::new();
        let bound = holder.hold(Bytes::from_static(b"\x00\x01"));
        assert_eq!(holder.len(), 1);
        assert_eq!(&bound[..], b"\x00\x01");
    }

    #[test]
    fn expression_field_builder() {
        let expr = ExpressionField::new("counter + :step")
            .with_arguments(ParamList::new().with(":step", 1));
        assert_eq!(expr.expression, "counter + :step");
        assert_eq!(expr.arguments.len(), 1);
    }
}
