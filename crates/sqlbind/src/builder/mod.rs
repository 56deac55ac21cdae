//! Fluent statement builder.
//!
//! [`QueryBuilder`] accumulates a table, columns, WHERE predicates, ORDER BY
//! and LIMIT/page settings plus named parameters, renders SELECT / INSERT /
//! UPDATE / DELETE text from them and runs it on a [`Connection`](crate::Connection).
//!
//! ```
//! use sqlbind::QueryBuilder;
//!
//! let mut qb = QueryBuilder::new("users");
//! qb.column("id")
//!     .column_as("name", "username")
//!     .eq("status", "active")
//!     .order_by_desc("created_at")
//!     .paginate(2, 20);
//!
//! assert_eq!(
//!     qb.select_query(),
//!     "SELECT id,name as username\nFROM users\nWHERE status = :status\nORDER BY created_at DESC\nLIMIT 20 OFFSET 20;"
//! );
//! ```

mod execute;

use crate::clause::{OrderBy, WhereClause};
use crate::condition::{Condition, Predicate};
use crate::error::{Error, Result};
use crate::params::Params;
use crate::value::Scalar;
use crate::BIND_PREFIX;

/// Column alias used by the row-count query.
pub const COUNT_COLUMN: &str = "count";

/// Statement builder over one table.
///
/// Cloning is a deep copy: WHERE, ORDER BY and parameters of the clone can be
/// changed without touching the original.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    alias: Option<String>,
    columns: Vec<String>,
    wheres: WhereClause,
    order_by: OrderBy,
    limit: Option<u64>,
    page: Option<u64>,
    params: Params,
}

impl QueryBuilder {
    /// Create a builder for `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
            columns: Vec::new(),
            wheres: WhereClause::new(),
            order_by: OrderBy::new(),
            limit: None,
            page: None,
            params: Params::new(),
        }
    }

    // ==================== Table & columns ====================

    /// Switch to another table (clears any alias).
    pub fn table(&mut self, name: impl Into<String>) -> &mut Self {
        self.table = name.into();
        self.alias = None;
        self
    }

    /// Switch to another table, rendered as `name as alias`.
    pub fn table_as(&mut self, name: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        self.table = name.into();
        self.alias = Some(alias.into());
        self
    }

    /// Append a column.
    ///
    /// `"*"` appends `{table}.*` (or `{alias}.*`). Duplicates are not checked.
    pub fn column(&mut self, name: &str) -> &mut Self {
        if name == "*" {
            let qualifier = self.alias.as_deref().unwrap_or(self.table.as_str());
            self.columns.push(format!("{qualifier}.*"));
        } else {
            self.columns.push(name.to_string());
        }
        self
    }

    /// Append a column rendered as `name as alias`.
    pub fn column_as(&mut self, name: &str, alias: &str) -> &mut Self {
        self.columns.push(format!("{name} as {alias}"));
        self
    }

    /// Append several columns.
    pub fn columns<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> &mut Self {
        for name in names {
            self.column(name);
        }
        self
    }

    /// Drop every selected column (back to `SELECT *`).
    pub fn clear_columns(&mut self) -> &mut Self {
        self.columns.clear();
        self
    }

    // ==================== WHERE ====================

    /// Add a predicate to the root AND group.
    pub fn and_where(&mut self, predicate: impl Into<Predicate>) -> &mut Self {
        self.wheres.add(predicate.into(), &mut self.params);
        self
    }

    /// Add WHERE: column = value
    pub fn eq(&mut self, column: &str, value: impl Into<Scalar>) -> &mut Self {
        self.and_where(Predicate::eq(column, value))
    }

    /// Add WHERE: column operator value
    pub fn compare(&mut self, column: &str, operator: &str, value: impl Into<Scalar>) -> &mut Self {
        self.and_where(Predicate::compare(column, operator, value))
    }

    /// Add WHERE: column IN (values...)
    pub fn in_list<V: Into<Scalar>>(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.and_where(Predicate::in_list(column, values))
    }

    /// Add a raw WHERE fragment.
    ///
    /// Placeholders inside `sql` are not bound; use [`param`](Self::param),
    /// or [`where_group`](Self::where_group) for a [`Condition`].
    pub fn raw(&mut self, sql: &str) -> &mut Self {
        self.and_where(Predicate::raw(sql))
    }

    /// Add WHERE: id = value
    pub fn where_id(&mut self, id: i64) -> &mut Self {
        self.and_where(Predicate::id(id))
    }

    /// Add a nested AND/OR group.
    pub fn where_group(&mut self, group: Condition) -> &mut Self {
        self.and_where(Predicate::group(group))
    }

    // ==================== ORDER BY ====================

    /// Add ORDER BY column ASC (`ascending`) or DESC.
    pub fn order_by(&mut self, column: &str, ascending: bool) -> &mut Self {
        self.order_by.push(column, ascending);
        self
    }

    /// Add ORDER BY column ASC.
    pub fn order_by_asc(&mut self, column: &str) -> &mut Self {
        self.order_by(column, true)
    }

    /// Add ORDER BY column DESC.
    pub fn order_by_desc(&mut self, column: &str) -> &mut Self {
        self.order_by(column, false)
    }

    /// Drop every ordering.
    pub fn clear_order_by(&mut self) -> &mut Self {
        self.order_by.clear();
        self
    }

    // ==================== Pagination ====================

    /// Set LIMIT. `0` removes the limit.
    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    /// Set the 1-based page (clamped to >= 1). Only used when a limit is set.
    pub fn page(&mut self, page: u64) -> &mut Self {
        self.page = Some(page.max(1));
        self
    }

    /// Set page and page size in one call.
    ///
    /// Note the order: `paginate(page, limit)` is `limit(limit).page(page)`.
    pub fn paginate(&mut self, page: u64, limit: u64) -> &mut Self {
        self.page(page);
        self.limit(limit)
    }

    /// Configured LIMIT, if any.
    pub fn get_limit(&self) -> Option<u64> {
        self.limit
    }

    /// Effective page: the configured page, or 1.
    pub fn get_page(&self) -> u64 {
        self.page.unwrap_or(1)
    }

    /// Rows skipped before the current page: `limit * (page - 1)`.
    ///
    /// Fails with [`Error::Validation`] when the offset does not fit in a `u64`.
    pub fn offset(&self) -> Result<u64> {
        let limit = self.limit.unwrap_or(0);
        let page = self.get_page();
        limit.checked_mul(page - 1).ok_or_else(|| {
            Error::validation(format!("page {page} with limit {limit} overflows the row offset"))
        })
    }

    // ==================== Parameters ====================

    /// Bind one named parameter.
    pub fn param(&mut self, key: &str, value: impl Into<Scalar>) -> &mut Self {
        self.params.set(key, value);
        self
    }

    /// Merge named parameters (last write wins).
    pub fn params(&mut self, values: &Params) -> &mut Self {
        self.params.merge(values);
        self
    }

    /// Every parameter bound so far.
    pub fn bound_params(&self) -> &Params {
        &self.params
    }

    /// Check builder state before execution.
    pub fn validate(&self) -> Result<()> {
        match self.wheres.build_error() {
            Some(err) => Err(Error::Validation(err.to_string())),
            None => Ok(()),
        }
    }

    // ==================== Rendering ====================

    fn from_expr(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} as {}", self.table, alias),
            None => self.table.clone(),
        }
    }

    fn limit_clause(&self) -> String {
        let Some(limit) = self.limit else {
            return String::new();
        };
        if self.get_page() > 1 {
            let offset = self.offset().unwrap_or(u64::MAX);
            format!("LIMIT {limit} OFFSET {offset}")
        } else {
            format!("LIMIT {limit}")
        }
    }

    fn set_clause(values: &Params) -> String {
        let sets: Vec<String> = values.keys().map(|col| format!("{col} = {BIND_PREFIX}{col}")).collect();
        format!("SET {}", sets.join(","))
    }

    /// Join non-empty clauses with newlines and terminate with `;`.
    pub fn build_query<I, S>(parts: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sql = parts
            .into_iter()
            .filter(|part| !part.as_ref().is_empty())
            .map(|part| part.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        sql.push(';');
        sql
    }

    /// Render the SELECT statement.
    pub fn select_query(&self) -> String {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(",")
        };

        Self::build_query([
            format!("SELECT {columns}"),
            format!("FROM {}", self.from_expr()),
            self.wheres.render(),
            self.order_by.render(),
            self.limit_clause(),
        ])
    }

    /// The builder rewritten to fetch a single row count under the same WHERE.
    fn count_builder(&self) -> Self {
        let mut counter = self.clone();
        counter.columns.clear();
        counter.order_by.clear();
        counter.column_as("COUNT(*)", COUNT_COLUMN);
        counter.paginate(1, 1);
        counter
    }

    /// Render the row-count query (same WHERE, no ORDER BY).
    pub fn count_query(&self) -> String {
        self.count_builder().select_query()
    }

    /// Render `INSERT INTO table SET col = :col,...` for `values`.
    pub fn insert_query(&self, values: &Params) -> String {
        Self::build_query([
            format!("INSERT INTO {}", self.from_expr()),
            Self::set_clause(values),
        ])
    }

    /// Render `UPDATE table SET ... WHERE ...` for `values`.
    pub fn update_query(&self, values: &Params) -> String {
        Self::build_query([
            format!("UPDATE {}", self.from_expr()),
            Self::set_clause(values),
            self.wheres.render(),
        ])
    }

    /// Render `DELETE FROM table WHERE ...`.
    pub fn delete_query(&self) -> String {
        Self::build_query([format!("DELETE FROM {}", self.from_expr()), self.wheres.render()])
    }
}
