//! Query execution interface shared by the dialect's query types.

use crate::connection::{Connection, Dialect};
use crate::error::OrmResult;

/// A data-modifying query compiled for SQL Server.
pub trait MutationQuery {
    /// Compile to SQL text.
    fn to_sql(&self, dialect: &dyn Dialect) -> String;

    /// Validate the query before execution.
    fn validate(&self) -> OrmResult<()> {
        Ok(())
    }

    /// Execute and return the number of affected rows.
    fn execute<C: Connection>(&self, conn: &C) -> OrmResult<u64>;
}
