//! WHERE conditions consumed by the UPDATE compiler.
//!
//! Condition trees are built elsewhere; this crate only needs the compiled
//! fragment and its arguments. [`SqlCondition`] is a flat AND-list for
//! callers that have no condition library of their own.

use crate::connection::Dialect;
use crate::param::ParamList;
use crate::value::Value;

/// Placeholder prefix used by [`SqlCondition`].
pub const CONDITION_PLACEHOLDER_PREFIX: &str = ":db_condition_placeholder_";

/// A condition compiled against a dialect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledCondition {
    /// SQL text placed after `WHERE`.
    pub sql: String,
    /// Arguments for the placeholders in `sql`, in binding order.
    pub arguments: ParamList,
}

/// A WHERE condition capability.
pub trait Condition {
    /// Whether there is nothing to compile (no WHERE clause is emitted).
    fn is_empty(&self) -> bool;

    /// Compile to SQL text and arguments. Compiling twice yields the same result.
    fn compile(&self, dialect: &dyn Dialect) -> CompiledCondition;
}

#[derive(Debug, Clone)]
enum Clause {
    Raw { sql: String, arguments: ParamList },
    Compare { column: String, operator: &'static str, value: Value },
    Null { column: String, negated: bool },
}

/// A conjunction of simple clauses.
///
/// # Example
/// ```ignore
/// let cond = SqlCondition::new().eq("id", 5).is_null("deleted_at");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlCondition {
    clauses: Vec<Clause>,
}

impl SqlCondition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw SQL fragment with its own named arguments.
    ///
    /// # Safety
    /// Be careful with SQL injection when using raw conditions.
    pub fn raw(mut self, sql: impl Into<String>, arguments: ParamList) -> Self {
        self.clauses.push(Clause::Raw {
            sql: sql.into(),
            arguments,
        });
        self
    }

    fn compare(mut self, column: &str, operator: &'static str, value: Value) -> Self {
        self.clauses.push(Clause::Compare {
            column: column.to_string(),
            operator,
            value,
        });
        self
    }

    /// column = value
    pub fn eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.compare(column, "=", value.into())
    }

    /// column <> value
    pub fn ne(self, column: &str, value: impl Into<Value>) -> Self {
        self.compare(column, "<>", value.into())
    }

    /// column > value
    pub fn gt(self, column: &str, value: impl Into<Value>) -> Self {
        self.compare(column, ">", value.into())
    }

    /// column >= value
    pub fn gte(self, column: &str, value: impl Into<Value>) -> Self {
        self.compare(column, ">=", value.into())
    }

    /// column < value
    pub fn lt(self, column: &str, value: impl Into<Value>) -> Self {
        self.compare(column, "<", value.into())
    }

    /// column <= value
    pub fn lte(self, column: &str, value: impl Into<Value>) -> Self {
        self.compare(column, "<=", value.into())
    }

    /// column IS NULL
    pub fn is_null(mut self, column: &str) -> Self {
        self.clauses.push(Clause::Null {
            column: column.to_string(),
            negated: false,
        });
        self
    }

    /// column IS NOT NULL
    pub fn is_not_null(mut self, column: &str) -> Self {
        self.clauses.push(Clause::Null {
            column: column.to_string(),
            negated: true,
        });
        self
    }
}

impl Condition for SqlCondition {
    fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    fn compile(&self, dialect: &dyn Dialect) -> CompiledCondition {
        let mut arguments = ParamList::new();
        let mut parts = Vec::with_capacity(self.clauses.len());
        for clause in &self.clauses {
            match clause {
                Clause::Raw { sql, arguments: args } => {
                    arguments.extend(args);
                    parts.push(sql.clone());
                }
                Clause::Compare {
                    column,
                    operator,
                    value,
                } => {
                    let placeholder = format!("{CONDITION_PLACEHOLDER_PREFIX}{}", arguments.len());
                    parts.push(format!(
                        "{} {operator} {placeholder}",
                        dialect.quote_identifier(column)
                    ));
                    arguments.push(placeholder, value.clone());
                }
                Clause::Null { column, negated } => {
                    let not = if *negated { " NOT" } else { "" };
                    parts.push(format!("{} IS{not} NULL", dialect.quote_identifier(column)));
                }
            }
        }

        let sql = if parts.len() > 1 {
            parts
                .iter()
                .map(|p| format!("({p})"))
                .collect::<Vec<_>>()
                .join(" AND ")
        } else {
            parts.join("")
        };
        CompiledCondition { sql, arguments }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;
    impl Dialect for Plain {}

    #[test]
    fn single_comparison_is_not_parenthesized() {
        let compiled = SqlCondition::new().eq("id", 5).compile(&Plain);
        assert_eq!(compiled.sql, "[id] = :db_condition_placeholder_0");
        assert_eq!(
            compiled.arguments.get(":db_condition_placeholder_0"),
            Some(&Value::Int(5))
        );
    }

    #[test]
    fn clauses_are_anded_in_order() {
        let compiled = SqlCondition::new()
            .raw("status = :status", ParamList::new().with(":status", "active"))
            .gt("age", 18)
            .is_not_null("email")
            .compile(&Plain);
        assert_eq!(
            compiled.sql,
            "(status = :status) AND ([age] > :db_condition_placeholder_1) AND ([email] IS NOT NULL)"
        );
        assert_eq!(compiled.arguments.len(), 2);
    }

    #[test]
    fn compile_is_repeatable() {
        let cond = SqlCondition::new().eq("a", 1).lte("b", 2);
        assert_eq!(cond.compile(&Plain), cond.compile(&Plain));
    }

    #[test]
    fn empty_condition() {
        assert!(SqlCondition::new().is_empty());
        assert_eq!(SqlCondition::new().compile(&Plain).sql, "");
    }
}
