//! The execution-layer trait statements run against.

use crate::error::Result;
use crate::params::Params;
use crate::row::Row;

/// A database connection that runs finished SQL with named parameters.
///
/// Implementations substitute `:name` placeholders from `params` and map their
/// own failures into [`Error::Database`](crate::Error::Database). The builder
/// adds no retry or recovery around these calls.
pub trait Connection {
    /// Run a query and return its first row, if any.
    fn select_first(&self, sql: &str, params: &Params) -> Result<Option<Row>>;

    /// Run a query and return every row.
    fn select_all(&self, sql: &str, params: &Params) -> Result<Vec<Row>>;

    /// Run a statement and return the number of affected rows.
    fn exec(&self, sql: &str, params: &Params) -> Result<u64>;

    /// Id generated by the most recent successful INSERT on this connection.
    fn last_inserted_id(&self) -> Result<i64>;
}

impl<C: Connection + ?Sized> Connection for &C {
    fn select_first(&self, sql: &str, params: &Params) -> Result<Option<Row>> {
        (**self).select_first(sql, params)
    }

    fn select_all(&self, sql: &str, params: &Params) -> Result<Vec<Row>> {
        (**self).select_all(sql, params)
    }

    fn exec(&self, sql: &str, params: &Params) -> Result<u64> {
        (**self).exec(sql, params)
    }

    fn last_inserted_id(&self) -> Result<i64> {
        (**self).last_inserted_id()
    }
}

impl<C: Connection + ?Sized> Connection for Box<C> {
    fn select_first(&self, sql: &str, params: &Params) -> Result<Option<Row>> {
        (**self).select_first(sql, params)
    }

    fn select_all(&self, sql: &str, params: &Params) -> Result<Vec<Row>> {
        (**self).select_all(sql, params)
    }

    fn exec(&self, sql: &str, params: &Params) -> Result<u64> {
        (**self).exec(sql, params)
    }

    fn last_inserted_id(&self) -> Result<i64> {
        (**self).last_inserted_id()
    }
}
