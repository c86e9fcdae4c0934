//! Result column classification.
//!
//! SQL Server drivers report a declared type such as `nvarchar` or
//! `int identity`; only the leading word decides how the column is marshaled.

/// How a result column is marshaled into an output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// `int`, `bit`, `smallint`, `tinyint`
    Integer,
    /// `nvarchar`, `varchar`, fetched as UTF-8
    Utf8Text,
    /// `varbinary`, streamed as raw bytes
    Binary,
    /// Anything else. Such columns get no output buffer and use the driver's
    /// default marshaling; this is intentional pass-through.
    Unclassified,
}

impl ColumnKind {
    /// Classify a native type name.
    ///
    /// Only the first whitespace-separated word is considered and matching
    /// ignores ASCII case.
    pub fn classify(native_type: &str) -> Self {
        let base = native_type.split_whitespace().next().unwrap_or("");
        match base.to_ascii_lowercase().as_str() {
            "varbinary" => ColumnKind::Binary,
            "int" | "bit" | "smallint" | "tinyint" => ColumnKind::Integer,
            "nvarchar" | "varchar" => ColumnKind::Utf8Text,
            _ => ColumnKind::Unclassified,
        }
    }
}

/// Column metadata as reported by the driver for one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeColumnMeta {
    pub name: String,
    /// Driver-level type (`native_type`).
    pub native_type: String,
    /// Declared SQL type, when the driver exposes it (e.g. `int identity`).
    pub decl_type: Option<String>,
}

impl NativeColumnMeta {
    pub fn new(name: impl Into<String>, native_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_type: native_type.into(),
            decl_type: None,
        }
    }

    pub fn with_decl_type(mut self, decl_type: impl Into<String>) -> Self {
        self.decl_type = Some(decl_type.into());
        self
    }

    /// The type name used for classification: the declared type's first word
    /// when present, otherwise the driver type.
    pub fn type_name(&self) -> &str {
        match self.decl_type.as_deref() {
            Some(decl) => decl.split_whitespace().next().unwrap_or(decl),
            None => &self.native_type,
        }
    }
}

/// A classified result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub native_type: String,
    pub kind: ColumnKind,
}

impl From<NativeColumnMeta> for ColumnDescriptor {
    fn from(meta: NativeColumnMeta) -> Self {
        let native_type = meta.type_name().to_string();
        Self {
            kind: ColumnKind::classify(&native_type),
            name: meta.name,
            native_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_family() {
        for t in ["int", "bit", "smallint", "tinyint"] {
            assert_eq!(ColumnKind::classify(t), ColumnKind::Integer, "{t}");
        }
    }

    #[test]
    fn text_and_binary() {
        assert_eq!(ColumnKind::classify("nvarchar"), ColumnKind::Utf8Text);
        assert_eq!(ColumnKind::classify("varchar"), ColumnKind::Utf8Text);
        assert_eq!(ColumnKind::classify("varbinary"), ColumnKind::Binary);
        assert_eq!(ColumnKind::classify("VARBINARY"), ColumnKind::Binary);
    }

    #[test]
    fn unknown_types_are_unclassified() {
        for t in ["bigint", "datetime2", "uniqueidentifier", "decimal", ""] {
            assert_eq!(ColumnKind::classify(t), ColumnKind::Unclassified, "{t}");
        }
    }

    #[test]
    fn declared_type_takes_precedence_over_native() {
        let meta = NativeColumnMeta::new("id", "char").with_decl_type("int identity");
        assert_eq!(meta.type_name(), "int");
        let col = ColumnDescriptor::from(meta);
        assert_eq!(col.kind, ColumnKind::Integer);
        assert_eq!(col.native_type, "int");
    }

    #[test]
    fn native_type_used_without_declaration() {
        let col = ColumnDescriptor::from(NativeColumnMeta::new("name", "nvarchar"));
        assert_eq!(col.kind, ColumnKind::Utf8Text);
    }
}
