//! Per-call options and prepare-time configuration.

/// Row materialization strategy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Column name → value.
    #[default]
    Assoc,
    /// Numeric-indexed list.
    Num,
    /// First column → second column.
    KeyPair,
    /// Rows materialized into the named record shape.
    Class(String),
}

/// The `fetch` option: either a record shape name or an explicit mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    Class(String),
    Mode(FetchMode),
}

impl Fetch {
    pub fn into_mode(self) -> FetchMode {
        match self {
            Fetch::Class(name) => FetchMode::Class(name),
            Fetch::Mode(mode) => mode,
        }
    }
}

/// Options consumed by [`Statement::execute`](crate::Statement::execute).
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Fetch mode to apply before running.
    pub fetch: Option<Fetch>,
    /// Column names hidden from the visible result shape (exact match).
    pub drop_columns: Vec<String>,
    /// Skip re-preparation even if the prepare configuration changed.
    pub already_prepared: bool,
}

impl QueryOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize rows into the named record shape.
    pub fn fetch_class(mut self, name: impl Into<String>) -> Self {
        self.fetch = Some(Fetch::Class(name.into()));
        self
    }

    /// Use an explicit fetch mode.
    pub fn fetch_mode(mut self, mode: FetchMode) -> Self {
        self.fetch = Some(Fetch::Mode(mode));
        self
    }

    /// Hide a column from the visible result shape.
    pub fn drop_column(mut self, name: impl Into<String>) -> Self {
        self.drop_columns.push(name.into());
        self
    }

    /// Hide several columns from the visible result shape.
    pub fn drop_columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drop_columns.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn already_prepared(mut self, yes: bool) -> Self {
        self.already_prepared = yes;
        self
    }
}

/// Driver optimizations applied when a statement is prepared.
///
/// Both are on by default. Statements whose SQL must reach the server exactly
/// as written are prepared with [`PrepareOptions::insecure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepareOptions {
    /// Send the statement directly instead of through `sp_prepare`.
    pub direct_query: bool,
    /// Let the driver substitute placeholders client-side.
    pub emulate_prepares: bool,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            direct_query: true,
            emulate_prepares: true,
        }
    }
}

impl PrepareOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Both optimizations disabled.
    pub fn insecure() -> Self {
        Self {
            direct_query: false,
            emulate_prepares: false,
        }
    }

    pub fn direct_query(mut self, enabled: bool) -> Self {
        self.direct_query = enabled;
        self
    }

    pub fn emulate_prepares(mut self, enabled: bool) -> Self {
        self.emulate_prepares = enabled;
        self
    }

    pub fn is_insecure(&self) -> bool {
        !self.direct_query && !self.emulate_prepares
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_class_becomes_class_mode() {
        let opts = QueryOptions::new().fetch_class("User");
        assert_eq!(
            opts.fetch.map(Fetch::into_mode),
            Some(FetchMode::Class("User".to_string()))
        );
    }

    #[test]
    fn drop_columns_accumulate() {
        let opts = QueryOptions::new()
            .drop_column("rowver")
            .drop_columns(["a", "b"]);
        assert_eq!(opts.drop_columns, vec!["rowver", "a", "b"]);
    }

    #[test]
    fn insecure_disables_both_optimizations() {
        assert!(!PrepareOptions::default().is_insecure());
        let opts = PrepareOptions::insecure();
        assert!(!opts.direct_query);
        assert!(!opts.emulate_prepares);
        assert!(opts.is_insecure());
    }
}
