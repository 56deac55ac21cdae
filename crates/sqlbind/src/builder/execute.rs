//! Running built statements on a [`Connection`].

use super::{COUNT_COLUMN, QueryBuilder};
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::params::Params;
use crate::result::{PaginatedResultSet, ResultSet, Selected};
use crate::value::FromScalar;

impl QueryBuilder {
    /// Run the SELECT.
    ///
    /// A page whose offset overflows `u64` is rejected with
    /// [`Error::Validation`] before the connection is called.
    ///
    /// - `LIMIT 1`: returns [`Selected::One`] straight from `select_first`.
    /// - no limit: returns every row as [`Selected::All`].
    /// - otherwise returns [`Selected::Page`] with a total row count. The total
    ///   is derived from the page when it is partial; a second COUNT query is
    ///   issued only when the page is full, or empty past page 1.
    pub fn select<C: Connection + ?Sized>(&self, conn: &C) -> Result<Selected> {
        self.validate()?;
        let offset = self.offset()?;
        let sql = self.select_query();

        if self.limit == Some(1) {
            return Ok(Selected::One(conn.select_first(&sql, &self.params)?));
        }

        let rows = conn.select_all(&sql, &self.params)?;

        let Some(limit) = self.limit else {
            return Ok(Selected::All(ResultSet::new(rows)));
        };

        let page = self.get_page();
        let count = rows.len() as u64;

        let total_count = if (count == 0 && page > 1) || count == limit {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                target: "sqlbind.pagination",
                table = %self.table,
                limit,
                page,
                count,
                "page is ambiguous, counting rows"
            );
            self.count(conn)?
        } else {
            offset.saturating_add(count)
        };

        Ok(Selected::Page(PaginatedResultSet::new(
            rows,
            total_count,
            limit,
            page,
        )))
    }

    /// Count rows matching the WHERE clause.
    ///
    /// Runs on a copy of the builder with columns and ORDER BY replaced, so
    /// `self` is left as it was. A missing row or column counts as 0.
    pub fn count<C: Connection + ?Sized>(&self, conn: &C) -> Result<u64> {
        self.validate()?;
        let counter = self.count_builder();
        let sql = counter.select_query();

        let Some(row) = conn.select_first(&sql, &counter.params)? else {
            return Ok(0);
        };
        match row.get(COUNT_COLUMN) {
            Some(value) => Ok(Option::<u64>::from_scalar(COUNT_COLUMN, value)?.unwrap_or(0)),
            None => Ok(0),
        }
    }

    /// Insert one row built from `values`.
    ///
    /// Returns the generated id when a row was inserted, `None` when the
    /// statement affected nothing.
    pub fn insert<C: Connection + ?Sized>(
        &mut self,
        conn: &C,
        values: &Params,
    ) -> Result<Option<i64>> {
        if values.is_empty() {
            return Err(Error::validation("INSERT requires at least one value"));
        }
        self.params.merge(values);
        let sql = self.insert_query(values);

        let affected = conn.exec(&sql, &self.params)?;
        if affected == 0 {
            return Ok(None);
        }
        conn.last_inserted_id().map(Some)
    }

    /// Update rows matching the WHERE clause; returns the affected row count.
    pub fn update<C: Connection + ?Sized>(&mut self, conn: &C, values: &Params) -> Result<u64> {
        self.validate()?;
        if values.is_empty() {
            return Err(Error::validation("UPDATE requires at least one value"));
        }
        self.params.merge(values);
        let sql = self.update_query(values);
        conn.exec(&sql, &self.params)
    }

    /// Delete rows matching the WHERE clause; returns the affected row count.
    pub fn delete<C: Connection + ?Sized>(&self, conn: &C) -> Result<u64> {
        self.validate()?;
        let sql = self.delete_query();
        conn.exec(&sql, &self.params)
    }
}
