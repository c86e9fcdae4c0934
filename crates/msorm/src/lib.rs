//! # msorm
//!
//! A SQL Server dialect layer for query builders.
//!
//! ## Features
//!
//! - **UPDATE compilation**: expression fields override literal fields, numbered placeholders
//!   bind in the same order they are emitted
//! - **Identity protection**: writes to a table's identity column are dropped before execution
//! - **Typed result binding**: result columns are classified from their declared type and bound
//!   to integer, UTF-8 or streamed binary buffers
//! - **Technical columns**: columns prefixed with `__` (or listed explicitly) are hidden from
//!   callers
//! - **Error reconciliation**: connection- and statement-level error reports collapse into one
//!   `SQLSTATE[..]` error
//! - **Query logging**: `tracing`-based and statistics loggers
//!
//! The crate does not talk to a server. A driver implements [`Connection`] and
//! [`NativeStatement`]; everything here is composed on top of those handles.
//!
//! ```ignore
//! use msorm::{MutationQuery, SqlCondition, UpdateQuery};
//!
//! let affected = UpdateQuery::new("users")
//!     .set("name", "Bob")
//!     .expression("updated_at", "GETDATE()")
//!     .condition(SqlCondition::new().eq("id", 5))
//!     .execute(&conn)?;
//! ```

pub mod bind;
pub mod binder;
pub mod column;
pub mod condition;
pub mod config;
pub mod connection;
pub mod error;
pub mod error_info;
pub mod monitor;
pub mod param;
pub mod row;
pub mod select;
pub mod statement;
pub mod traits;
pub mod update;
pub mod value;

pub use bind::{BlobHolder, ExpressionField};
pub use binder::{Encoding, OutputBuffer, TECHNICAL_COLUMN_PREFIX};
pub use column::{ColumnDescriptor, ColumnKind, NativeColumnMeta};
pub use condition::{CompiledCondition, Condition, SqlCondition};
pub use config::{Fetch, FetchMode, PrepareOptions, QueryOptions};
pub use connection::{ColumnInformation, Connection, Dialect, NativeStatement, Schema};
pub use error::{OrmError, OrmResult};
pub use error_info::{ErrorInfo, SUCCESS_SQLSTATE};
pub use monitor::{
    CompositeLogger, NoopLogger, QueryLogger, QueryStats, QueryType, StatsLogger, TracingLogger,
};
pub use param::{Param, ParamList};
pub use row::Row;
pub use select::{Direction, RANDOM_ORDER_ALIAS, RANDOM_ORDER_EXPRESSION, SelectQuery};
pub use statement::Statement;
pub use traits::MutationQuery;
pub use update::{DEFAULT_PLACEHOLDER_PREFIX, UpdateQuery};
pub use value::Value;
