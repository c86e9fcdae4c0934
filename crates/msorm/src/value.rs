//! Owned SQL values exchanged with the engine.

use bytes::Bytes;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// A parameter or result value.
///
/// Floats compare and hash by bit pattern so values can key a map, which is
/// what [`Statement::fetch_all_keyed`](crate::Statement::fetch_all_keyed) needs.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL
    #[default]
    Null,
    /// `bit`
    Bool(bool),
    /// `tinyint`, `smallint`, `int`, `bigint`
    Int(i64),
    /// `real`, `float`
    Float(f64),
    /// `varchar`, `nvarchar`, `text`
    Text(String),
    /// `varbinary` and other large objects
    Bytes(Bytes),
    /// `uniqueidentifier`
    Uuid(Uuid),
    /// `datetime2`
    DateTime(NaiveDateTime),
}

impl Value {
    /// Check if this is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this value must be bound as a large object.
    pub fn is_blob(&self) -> bool {
        matches!(self, Value::Bytes(_))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Bool(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) => Some(v.as_ref()),
            Value::Text(v) => Some(v.as_bytes()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(v) => v.hash(state),
            Value::Int(v) => v.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Text(v) => v.hash(state),
            Value::Bytes(v) => v.hash(state),
            Value::Uuid(v) => v.hash(state),
            Value::DateTime(v) => v.hash(state),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(v))
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(v))
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn option_none_is_null() {
        assert!(Value::from(None::<i32>).is_null());
        assert_eq!(Value::from(Some(5i32)), Value::Int(5));
    }

    #[test]
    fn floats_key_a_map_by_bits() {
        let mut map = HashMap::new();
        map.insert(Value::Float(1.5), "a");
        map.insert(Value::Float(1.5), "b");
        assert_eq!(map.len(), 1);
        assert_eq!(map[&Value::Float(1.5)], "b");
    }

    #[test]
    fn variants_do_not_compare_across_types() {
        assert_ne!(Value::Int(1), Value::Bool(true));
        assert_ne!(Value::Text("1".into()), Value::Int(1));
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Int(10),
            Value::from("Bob"),
            Value::Null,
        ])
        .unwrap();
        assert_eq!(json, r#"[10,"Bob",null]"#);
    }

    #[test]
    fn only_bytes_are_blobs() {
        assert!(Value::from(vec![1u8, 2, 3]).is_blob());
        assert!(!Value::from("text").is_blob());
    }
}
