use super::display_sql;
use super::types::{HookAction, QueryContext, QueryHook, QueryResult};
use std::time::Duration;
use tracing::Level;

const TARGET: &str = "sqlbind.sql";

/// Emits every statement as a `tracing` event on target `sqlbind.sql`.
///
/// Being a hook, it logs whether or not monitoring is enabled. Failed
/// statements get a second event at `WARN`.
#[derive(Debug, Clone)]
pub struct TracingSqlHook {
    pub level: Level,
    /// SQL is cut after this many bytes; `None` logs it whole.
    pub max_sql_length: Option<usize>,
}

impl Default for TracingSqlHook {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl TracingSqlHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }
}

impl QueryHook for TracingSqlHook {
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        let sql = display_sql(&ctx.exec_sql, self.max_sql_length);
        let tag = ctx.tag.as_deref().unwrap_or("-");
        let kind = ctx.query_type;
        let params = ctx.param_count;

        // `tracing` macros need the level as a constant.
        match self.level {
            Level::ERROR => tracing::error!(target: TARGET, ?kind, tag, params, %sql),
            Level::WARN => tracing::warn!(target: TARGET, ?kind, tag, params, %sql),
            Level::INFO => tracing::info!(target: TARGET, ?kind, tag, params, %sql),
            Level::DEBUG => tracing::debug!(target: TARGET, ?kind, tag, params, %sql),
            Level::TRACE => tracing::trace!(target: TARGET, ?kind, tag, params, %sql),
        }
        HookAction::Continue
    }

    fn after_query(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        if let QueryResult::Error(message) = result {
            tracing::warn!(
                target: TARGET,
                kind = ?ctx.query_type,
                ?duration,
                error = %message,
                "statement failed"
            );
        }
    }
}
