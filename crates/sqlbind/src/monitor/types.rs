use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// The kind of statement being run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    /// SELECT query
    Select,
    /// INSERT statement
    Insert,
    /// UPDATE statement
    Update,
    /// DELETE statement
    Delete,
    /// Anything else (DDL, raw SQL)
    Other,
}

impl QueryType {
    /// Detect the statement kind from its leading keyword.
    ///
    /// `WITH ...` is reported as [`QueryType::Select`].
    pub fn from_sql(sql: &str) -> Self {
        let trimmed = sql.trim_start_matches(|c: char| c.is_whitespace() || c == '(');
        if starts_with_keyword(trimmed, "SELECT") || starts_with_keyword(trimmed, "WITH") {
            QueryType::Select
        } else if starts_with_keyword(trimmed, "INSERT") {
            QueryType::Insert
        } else if starts_with_keyword(trimmed, "UPDATE") {
            QueryType::Update
        } else if starts_with_keyword(trimmed, "DELETE") {
            QueryType::Delete
        } else {
            QueryType::Other
        }
    }
}

/// Case-insensitive keyword match that stops at a word boundary.
fn starts_with_keyword(sql: &str, keyword: &str) -> bool {
    let Some(head) = sql.get(..keyword.len()) else {
        return false;
    };
    if !head.eq_ignore_ascii_case(keyword) {
        return false;
    }
    sql[keyword.len()..]
        .chars()
        .next()
        .is_none_or(|c| !c.is_ascii_alphanumeric() && c != '_')
}

/// Information about the statement being run.
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// SQL used as the aggregation key for monitors.
    pub canonical_sql: String,
    /// SQL actually sent to the connection.
    pub exec_sql: String,
    /// Number of bound parameters.
    pub param_count: usize,
    /// Detected statement kind.
    pub query_type: QueryType,
    /// Optional name for the statement.
    pub tag: Option<String>,
    /// Optional low-cardinality fields for observability.
    pub fields: BTreeMap<String, String>,
}

impl QueryContext {
    /// Create a context for `sql`.
    pub fn new(sql: &str, param_count: usize) -> Self {
        Self {
            canonical_sql: sql.to_string(),
            exec_sql: sql.to_string(),
            param_count,
            query_type: QueryType::from_sql(sql),
            tag: None,
            fields: BTreeMap::new(),
        }
    }

    /// Attach a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Attach a structured field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Maximum length for error messages in `QueryResult::Error`.
const MAX_ERROR_LEN: usize = 512;

/// Outcome of a statement, as reported to hooks and monitors.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// `select_all` returned this many rows.
    Rows(usize),
    /// `select_first` found a row or not.
    OptionalRow(bool),
    /// `exec` affected this many rows.
    Affected(u64),
    /// The statement failed (message truncated to 512 bytes).
    Error(String),
}

impl QueryResult {
    /// Create an error result, truncating long messages.
    pub fn error(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        if msg.len() > MAX_ERROR_LEN {
            let truncated = super::truncate_sql_bytes(&msg, MAX_ERROR_LEN);
            Self::Error(format!("{truncated}..."))
        } else {
            Self::Error(msg)
        }
    }

    /// Check for a failed statement.
    pub fn is_error(&self) -> bool {
        matches!(self, QueryResult::Error(_))
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Rows(n) => write!(f, "{n} rows"),
            QueryResult::OptionalRow(found) => {
                write!(f, "{}", if *found { "1 row" } else { "0 rows" })
            }
            QueryResult::Affected(n) => write!(f, "{n} affected"),
            QueryResult::Error(e) => write!(f, "error: {e}"),
        }
    }
}

/// Observer of statement execution.
///
/// Implement this to collect metrics or log statements.
pub trait QueryMonitor: Send + Sync {
    /// Called before a statement runs.
    fn on_query_start(&self, _ctx: &QueryContext) {}

    /// Called after a statement completes, successfully or not.
    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult);

    /// Called when a statement exceeds the slow query threshold.
    fn on_slow_query(&self, _ctx: &QueryContext, _duration: Duration) {}
}

/// What to do after a hook looked at a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum HookAction {
    /// Run the statement unchanged.
    Continue,
    /// Run different SQL.
    ModifySql {
        /// SQL to send to the connection.
        exec_sql: String,
        /// Optional replacement for the canonical SQL.
        canonical_sql: Option<String>,
    },
    /// Refuse to run the statement.
    Abort(String),
}

/// Hook into the execution lifecycle.
pub trait QueryHook: Send + Sync {
    /// Called before a statement runs.
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        let _ = ctx;
        HookAction::Continue
    }

    /// Called after a statement completes, before monitors are notified.
    fn after_query(&self, _ctx: &QueryContext, _duration: Duration, _result: &QueryResult) {}
}
