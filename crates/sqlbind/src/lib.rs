//! # sqlbind
//!
//! A fluent SQL statement builder with named parameters.
//!
//! ## Features
//!
//! - **Fluent builder**: table, columns, WHERE, ORDER BY and LIMIT/page on one value
//! - **Named parameters**: every value is bound as `:name`, never spliced into SQL text
//! - **Nested conditions**: AND/OR groups of any depth via [`Condition`]
//! - **Page-aware counting**: paginated selects only issue a COUNT query when the page is ambiguous
//! - **Pluggable execution**: anything implementing [`Connection`] can run the statements
//! - **Query monitoring**: hooks and monitors around execution via [`InstrumentedConnection`]
//!
//! ## Example
//!
//! ```
//! use sqlbind::{Condition, Predicate, QueryBuilder};
//!
//! let mut status = Condition::or();
//! status
//!     .add(Predicate::eq("status", "active"))
//!     .add(Predicate::eq("role", "admin"));
//!
//! let mut qb = QueryBuilder::new("users");
//! qb.column("*").where_group(status).order_by_asc("id").limit(10);
//!
//! assert_eq!(
//!     qb.select_query(),
//!     "SELECT users.*\nFROM users\nWHERE (status = :status OR role = :role)\nORDER BY id ASC\nLIMIT 10;"
//! );
//! assert_eq!(qb.bound_params().len(), 2);
//! ```

pub mod builder;
pub mod clause;
pub mod condition;
pub mod connection;
pub mod error;
pub mod monitor;
pub mod params;
pub mod result;
pub mod row;
pub mod value;

/// Marker that starts a named parameter in SQL text.
pub const BIND_PREFIX: char = ':';

pub use builder::{COUNT_COLUMN, QueryBuilder};
pub use clause::{ClauseList, OrderBy, WhereClause};
pub use condition::{Combinator, Condition, Predicate};
pub use connection::Connection;
pub use error::{BoxError, Error, Result};
pub use monitor::{
    CompositeHook, CompositeMonitor, HookAction, InstrumentedConnection, LoggingMonitor,
    MonitorConfig, NoopMonitor, QueryContext, QueryHook, QueryMonitor, QueryResult, QueryStats,
    QueryType, StatsMonitor,
};
pub use params::Params;
pub use result::{PaginatedResultSet, ResultSet, Selected};
pub use row::Row;
pub use value::{FromScalar, Scalar};

#[cfg(feature = "tracing")]
pub use monitor::TracingSqlHook;
