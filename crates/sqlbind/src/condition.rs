//! WHERE composition: predicates and nested AND/OR condition groups.
//!
//! A [`Condition`] is a list of rendered fragments and nested groups joined by
//! one combinator. Adding a [`Predicate`] renders its fragment right away and
//! registers any placeholders it needs in a [`Params`] store.
//!
//! ```
//! use sqlbind::{Condition, Predicate};
//!
//! let mut any = Condition::or();
//! any.add(Predicate::eq("status", "active"))
//!     .add(Predicate::in_list("role", vec!["admin", "owner"]));
//!
//! assert_eq!(
//!     any.render(),
//!     "(status = :status OR role IN (:role_1, :role_2))"
//! );
//! assert_eq!(any.params().len(), 3);
//! ```

use crate::params::Params;
use crate::value::Scalar;
use crate::BIND_PREFIX;
use std::fmt;

/// Boolean operator joining the members of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// All members must hold.
    And,
    /// At least one member must hold.
    Or,
}

impl Combinator {
    /// SQL keyword for this combinator.
    pub fn as_str(self) -> &'static str {
        match self {
            Combinator::And => "AND",
            Combinator::Or => "OR",
        }
    }
}

/// One WHERE predicate, decided at the call site.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Already-valid SQL boolean fragment, appended verbatim.
    ///
    /// Nothing is bound. A rendered [`Condition`] passed this way keeps its
    /// SQL but loses its bindings; nest it with [`Predicate::Group`] instead.
    Raw(String),
    /// `column operator :column`, or `column operator :ref` when the value is
    /// text starting with `:` (an existing placeholder, not re-bound).
    Compare {
        column: String,
        operator: String,
        value: Scalar,
    },
    /// `column IN (:column_1, :column_2, ...)`.
    In { column: String, values: Vec<Scalar> },
    /// A nested condition group.
    Group(Condition),
}

impl Predicate {
    /// Raw SQL fragment.
    ///
    /// Be careful with SQL injection when using raw fragments. Any `:name`
    /// placeholders in `sql` must be bound separately.
    pub fn raw(sql: impl Into<String>) -> Self {
        Predicate::Raw(sql.into())
    }

    /// `column operator value`.
    pub fn compare(
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Scalar>,
    ) -> Self {
        Predicate::Compare {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// `column = value`.
    pub fn eq(column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::compare(column, "=", value)
    }

    /// `column IN (values...)`.
    pub fn in_list<V: Into<Scalar>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Predicate::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Primary-key lookup shorthand: `id = :id`.
    pub fn id(id: i64) -> Self {
        Self::eq("id", id)
    }

    /// Nest a condition group.
    pub fn group(condition: Condition) -> Self {
        Predicate::Group(condition)
    }

    /// Check the predicate can be rendered.
    fn check(&self) -> Result<(), String> {
        match self {
            Predicate::Raw(sql) if sql.trim().is_empty() => {
                Err("raw WHERE fragment is empty".to_string())
            }
            Predicate::Compare { column, .. } | Predicate::In { column, .. }
                if column.trim().is_empty() =>
            {
                Err("WHERE column name is empty".to_string())
            }
            Predicate::Compare {
                column, operator, ..
            } if operator.trim().is_empty() => {
                Err(format!("WHERE on '{column}' has an empty operator"))
            }
            Predicate::In { column, values } if values.is_empty() => {
                Err(format!("IN list for '{column}' is empty"))
            }
            Predicate::Group(group) => match group.build_error() {
                Some(err) => Err(err.to_string()),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Fragment(String),
    Group(Condition),
}

impl Node {
    fn render(&self) -> String {
        match self {
            Node::Fragment(sql) => sql.clone(),
            Node::Group(group) => group.render(),
        }
    }
}

/// A recursive AND/OR group of predicates.
///
/// Cloning is a deep copy: the clone's members and bindings are independent.
#[derive(Debug, Clone)]
pub struct Condition {
    combinator: Combinator,
    nodes: Vec<Node>,
    /// Bindings registered by [`Condition::add`] on a standalone group.
    params: Params,
    build_error: Option<String>,
}

impl Condition {
    /// Create an empty group.
    pub fn new(combinator: Combinator) -> Self {
        Self {
            combinator,
            nodes: Vec::new(),
            params: Params::new(),
            build_error: None,
        }
    }

    /// Empty AND group.
    pub fn and() -> Self {
        Self::new(Combinator::And)
    }

    /// Empty OR group.
    pub fn or() -> Self {
        Self::new(Combinator::Or)
    }

    /// The combinator joining this group's members.
    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    /// Add a predicate, binding its values into this group's own store.
    pub fn add(&mut self, predicate: Predicate) -> &mut Self {
        let mut params = std::mem::take(&mut self.params);
        self.add_into(predicate, &mut params);
        self.params = params;
        self
    }

    /// Add a predicate, binding its values into an outer store.
    ///
    /// The first malformed predicate is remembered as the build error and
    /// dropped; later predicates are still accepted.
    pub(crate) fn add_into(&mut self, predicate: Predicate, params: &mut Params) {
        if let Err(err) = predicate.check() {
            if self.build_error.is_none() {
                self.build_error = Some(err);
            }
            return;
        }

        let node = match predicate {
            Predicate::Raw(sql) => Node::Fragment(sql),
            Predicate::Compare {
                column,
                operator,
                value,
            } => {
                let placeholder = match value.as_placeholder() {
                    Some(existing) => existing.to_string(),
                    None => {
                        let placeholder = format!("{BIND_PREFIX}{column}");
                        params.set(column.as_str(), value);
                        placeholder
                    }
                };
                Node::Fragment(format!("{column} {operator} {placeholder}"))
            }
            Predicate::In { column, values } => {
                let placeholders: Vec<String> = values
                    .into_iter()
                    .enumerate()
                    .map(|(i, value)| {
                        let key = format!("{column}_{}", i + 1);
                        let placeholder = format!("{BIND_PREFIX}{key}");
                        params.set(key, value);
                        placeholder
                    })
                    .collect();
                Node::Fragment(format!("{column} IN ({})", placeholders.join(", ")))
            }
            Predicate::Group(group) => {
                params.merge(&group.params);
                Node::Group(group)
            }
        };

        self.nodes.push(node);
    }

    /// Number of direct members.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the group has no members.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bindings registered through [`Condition::add`] (including nested groups).
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// First malformed predicate seen, if any.
    pub fn build_error(&self) -> Option<&str> {
        self.build_error.as_deref()
    }

    /// Members joined by the combinator, without outer parentheses.
    pub(crate) fn render_members(&self) -> String {
        let separator = format!(" {} ", self.combinator.as_str());
        self.nodes
            .iter()
            .map(Node::render)
            .collect::<Vec<_>>()
            .join(&separator)
    }

    /// Render the group.
    ///
    /// Empty renders `""`, a single member renders bare, more than one member
    /// is wrapped in parentheses.
    pub fn render(&self) -> String {
        match self.nodes.len() {
            0 => String::new(),
            1 => self.render_members(),
            _ => format!("({})", self.render_members()),
        }
    }

    /// Remove every member and binding.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.params = Params::new();
        self.build_error = None;
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<Condition> for Predicate {
    fn from(condition: Condition) -> Self {
        Predicate::Group(condition)
    }
}
