//! Random ordering for SELECT queries.
//!
//! `ORDER BY RAND()` on SQL Server evaluates `RAND()` once per query, so
//! every row gets the same key. Ordering by a per-row `NEWID()` column does
//! shuffle.

/// Alias of the random sort column.
pub const RANDOM_ORDER_ALIAS: &str = "random_field";

/// Expression producing a fresh value per row.
pub const RANDOM_ORDER_EXPRESSION: &str = "NEWID()";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// The parts of a SELECT builder that random ordering needs.
pub trait SelectQuery {
    /// Add a computed column and return the alias actually used.
    fn add_expression(&mut self, expression: &str, alias: &str) -> String;

    /// Whether a computed column with this alias exists.
    fn has_expression(&self, alias: &str) -> bool;

    fn order_by(&mut self, field: &str, direction: Direction);

    /// Order rows randomly.
    ///
    /// Adds `NEWID() AS random_field` and `ORDER BY random_field ASC`. Calling
    /// it again is a no-op, so at most one random column and one sort term
    /// exist.
    fn order_random(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        if self.has_expression(RANDOM_ORDER_ALIAS) {
            return self;
        }
        let alias = self.add_expression(RANDOM_ORDER_EXPRESSION, RANDOM_ORDER_ALIAS);
        self.order_by(&alias, Direction::Asc);
        self
    }
}
