//! Read-only result containers returned by [`QueryBuilder::select`](crate::QueryBuilder::select).
//!
//! Containers are immutable once built: there is no way to add, replace or
//! remove rows. Collect into a `Vec<Row>` with [`ResultSet::into_rows`] when
//! rows need to be assembled incrementally.

use crate::row::Row;
use crate::value::Scalar;
use serde::Serialize;
use std::ops::{Deref, Index};

/// Ordered rows from a query without pagination.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    rows: Vec<Row>,
}

impl ResultSet {
    /// Wrap fetched rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Number of rows held.
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    /// Alias for [`count`](Self::count).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if no rows were returned.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total across all pages; for a plain set this is [`count`](Self::count).
    pub fn total_count(&self) -> u64 {
        self.rows.len() as u64
    }

    /// Row at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// First row, if any.
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Iterate rows in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// All rows as a slice.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Take the rows out of the container.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Values of one column across all rows, in row order.
    ///
    /// Rows without the column yield [`Scalar::Null`].
    pub fn pluck(&self, column: &str) -> Vec<Scalar> {
        self.rows
            .iter()
            .map(|row| row.get(column).cloned().unwrap_or(Scalar::Null))
            .collect()
    }

    /// Values of `column` keyed by the value of `key_column`.
    ///
    /// A repeated key overwrites the earlier value but keeps its position.
    pub fn pluck_keyed(&self, column: &str, key_column: &str) -> Vec<(Scalar, Scalar)> {
        let mut out: Vec<(Scalar, Scalar)> = Vec::new();
        for row in &self.rows {
            let key = row.get(key_column).cloned().unwrap_or(Scalar::Null);
            let value = row.get(column).cloned().unwrap_or(Scalar::Null);
            match out.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => out.push((key, value)),
            }
        }
        out
    }

    /// Partition rows by the value of `column`.
    ///
    /// Groups appear in first-seen order and keep their rows' relative order.
    pub fn group_by(&self, column: &str) -> Vec<(Scalar, ResultSet)> {
        let mut groups: Vec<(Scalar, Vec<Row>)> = Vec::new();
        for row in &self.rows {
            let key = row.get(column).cloned().unwrap_or(Scalar::Null);
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, rows)) => rows.push(row.clone()),
                None => groups.push((key, vec![row.clone()])),
            }
        }
        groups
            .into_iter()
            .map(|(key, rows)| (key, ResultSet::new(rows)))
            .collect()
    }
}

impl Index<usize> for ResultSet {
    type Output = Row;

    fn index(&self, index: usize) -> &Row {
        &self.rows[index]
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// One page of rows plus the total row count across all pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedResultSet {
    rows: ResultSet,
    total_count: u64,
    limit: u64,
    page: u64,
}

impl PaginatedResultSet {
    /// Wrap one page of rows.
    pub fn new(rows: Vec<Row>, total_count: u64, limit: u64, page: u64) -> Self {
        Self {
            rows: ResultSet::new(rows),
            total_count,
            limit,
            page,
        }
    }

    /// Total rows matching the query across all pages.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Page size.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Current page, 1-based.
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Number of pages needed for [`total_count`](Self::total_count) rows.
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.limit)
    }

    /// Check whether a page after this one has rows.
    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Take the rows out of the container.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows.into_rows()
    }
}

impl Deref for PaginatedResultSet {
    type Target = ResultSet;

    fn deref(&self) -> &ResultSet {
        &self.rows
    }
}

impl<'a> IntoIterator for &'a PaginatedResultSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Outcome of [`QueryBuilder::select`](crate::QueryBuilder::select).
#[derive(Debug, Clone, PartialEq)]
pub enum Selected {
    /// `LIMIT 1` query: the single row, if any.
    One(Option<Row>),
    /// No limit configured.
    All(ResultSet),
    /// Limited query with page metadata.
    Page(PaginatedResultSet),
}

impl Selected {
    /// The single row of a `LIMIT 1` query.
    pub fn into_one(self) -> Option<Row> {
        match self {
            Selected::One(row) => row,
            Selected::All(rows) => rows.into_rows().into_iter().next(),
            Selected::Page(page) => page.into_rows().into_iter().next(),
        }
    }

    /// The unpaginated result set, if this is one.
    pub fn as_all(&self) -> Option<&ResultSet> {
        match self {
            Selected::All(rows) => Some(rows),
            _ => None,
        }
    }

    /// The paginated result set, if this is one.
    pub fn as_page(&self) -> Option<&PaginatedResultSet> {
        match self {
            Selected::Page(page) => Some(page),
            _ => None,
        }
    }

    /// All returned rows, whatever the shape.
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Selected::One(row) => row.into_iter().collect(),
            Selected::All(rows) => rows.into_rows(),
            Selected::Page(page) => page.into_rows(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> ResultSet {
        ResultSet::new(vec![
            Row::new().with("id", 1).with("team", "red").with("name", "ann"),
            Row::new().with("id", 2).with("team", "blue").with("name", "bob"),
            Row::new().with("id", 3).with("team", "red").with("name", "cid"),
        ])
    }

    #[test]
    fn counts_and_access() {
        let rows = people();
        assert_eq!(rows.count(), 3);
        assert_eq!(rows.total_count(), 3);
        assert_eq!(rows[1].get("name"), Some(&Scalar::from("bob")));
        assert!(rows.get(3).is_none());
        assert_eq!(rows.iter().count(), 3);
    }

    #[test]
    fn pluck_values() {
        let rows = people();
        assert_eq!(
            rows.pluck("name"),
            vec![Scalar::from("ann"), Scalar::from("bob"), Scalar::from("cid")]
        );
        assert_eq!(rows.pluck("missing"), vec![Scalar::Null; 3]);
    }

    #[test]
    fn pluck_keyed_overwrites_in_place() {
        let rows = people();
        assert_eq!(
            rows.pluck_keyed("name", "team"),
            vec![
                (Scalar::from("red"), Scalar::from("cid")),
                (Scalar::from("blue"), Scalar::from("bob")),
            ]
        );
    }

    #[test]
    fn group_by_preserves_order() {
        let groups = people().group_by("team");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Scalar::from("red"));
        assert_eq!(groups[0].1.pluck("id"), vec![Scalar::from(1), Scalar::from(3)]);
        assert_eq!(groups[1].0, Scalar::from("blue"));
        assert_eq!(groups[1].1.count(), 1);
    }

    #[test]
    fn paginated_metadata() {
        let page = PaginatedResultSet::new(people().into_rows(), 7, 3, 2);
        assert_eq!(page.count(), 3);
        assert_eq!(page.total_count(), 7);
        assert_eq!(page.limit(), 3);
        assert_eq!(page.page(), 2);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next_page());
        assert_eq!(page.first().and_then(|r| r.get("id")), Some(&Scalar::from(1)));
    }

    #[test]
    fn serializes_with_page_metadata() {
        let page = PaginatedResultSet::new(vec![Row::new().with("id", 1)], 1, 10, 1);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "rows": [{"id": 1}],
                "total_count": 1,
                "limit": 10,
                "page": 1
            })
        );
    }
}
