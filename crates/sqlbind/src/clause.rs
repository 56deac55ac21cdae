//! Clause containers: keyword-prefixed lists of rendered fragments.

use crate::condition::{Condition, Predicate};
use crate::params::Params;
use std::fmt;

/// An ordered list of fragments rendered as `KEYWORD a<sep>b<sep>c`.
///
/// Appending keeps insertion order; nothing is deduplicated or sorted. An
/// empty list renders as `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseList {
    keyword: &'static str,
    separator: &'static str,
    items: Vec<String>,
}

impl ClauseList {
    /// Create an empty clause with the given keyword and separator.
    pub fn new(keyword: &'static str, separator: &'static str) -> Self {
        Self {
            keyword,
            separator,
            items: Vec::new(),
        }
    }

    /// Append a rendered fragment.
    pub fn push(&mut self, item: impl Into<String>) -> &mut Self {
        self.items.push(item.into());
        self
    }

    /// Fragments in insertion order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Number of fragments.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the clause has no fragments.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every fragment.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Render the clause, or `""` when empty.
    pub fn render(&self) -> String {
        if self.items.is_empty() {
            return String::new();
        }
        format!("{} {}", self.keyword, self.items.join(self.separator))
    }
}

impl fmt::Display for ClauseList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// `ORDER BY col ASC, col2 DESC`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy(ClauseList);

impl OrderBy {
    /// Create an empty ORDER BY clause.
    pub fn new() -> Self {
        Self(ClauseList::new("ORDER BY", ", "))
    }

    /// Append `column ASC` or `column DESC`.
    pub fn push(&mut self, column: &str, ascending: bool) -> &mut Self {
        let direction = if ascending { "ASC" } else { "DESC" };
        self.0.push(format!("{column} {direction}"));
        self
    }

    /// Append a pre-rendered ordering expression.
    pub fn push_raw(&mut self, expr: impl Into<String>) -> &mut Self {
        self.0.push(expr);
        self
    }

    /// Check if no ordering was added.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove every ordering.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Render the clause, or `""` when empty.
    pub fn render(&self) -> String {
        self.0.render()
    }
}

impl Default for OrderBy {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Root WHERE clause: an AND group rendered with a `WHERE` prefix.
///
/// Top-level predicates are joined with ` AND ` without outer parentheses;
/// nested groups keep their own.
#[derive(Debug, Clone)]
pub struct WhereClause {
    root: Condition,
}

impl WhereClause {
    /// Create an empty WHERE clause.
    pub fn new() -> Self {
        Self {
            root: Condition::and(),
        }
    }

    /// Add a predicate, binding its values into the statement's store.
    pub fn add(&mut self, predicate: Predicate, params: &mut Params) -> &mut Self {
        self.root.add_into(predicate, params);
        self
    }

    /// Check if no predicate was added.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// First malformed predicate seen, if any.
    pub fn build_error(&self) -> Option<&str> {
        self.root.build_error()
    }

    /// Render `WHERE ...`, or `""` when empty.
    pub fn render(&self) -> String {
        if self.root.is_empty() {
            return String::new();
        }
        format!("WHERE {}", self.root.render_members())
    }
}

impl Default for WhereClause {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
