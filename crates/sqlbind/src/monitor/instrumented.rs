use super::config::MonitorConfig;
use super::monitors::{CompositeHook, NoopMonitor};
use super::types::{HookAction, QueryContext, QueryHook, QueryMonitor, QueryResult, QueryType};
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::params::Params;
use crate::row::Row;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A [`Connection`] wrapper that runs hooks and monitors around every statement.
///
/// Hooks always run. Monitors only receive events once monitoring is enabled
/// through [`MonitorConfig::enable_monitoring`] or
/// [`InstrumentedConnection::enable_monitoring`].
pub struct InstrumentedConnection<C> {
    conn: C,
    monitor: Arc<dyn QueryMonitor>,
    hook: Option<Arc<dyn QueryHook>>,
    config: MonitorConfig,
}

impl<C: Connection> InstrumentedConnection<C> {
    /// Wrap a connection with no monitoring.
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            monitor: Arc::new(NoopMonitor),
            hook: None,
            config: MonitorConfig::default(),
        }
    }

    /// Set the monitor configuration.
    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the query monitor.
    pub fn with_monitor<M: QueryMonitor + 'static>(mut self, monitor: M) -> Self {
        self.monitor = Arc::new(monitor);
        self
    }

    /// Set the query monitor from an Arc.
    pub fn with_monitor_arc(mut self, monitor: Arc<dyn QueryMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    /// Set the query hook, replacing any existing one.
    pub fn with_hook<H: QueryHook + 'static>(mut self, hook: H) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Add a query hook after any existing one.
    pub fn add_hook<H: QueryHook + 'static>(self, hook: H) -> Self {
        self.add_hook_arc(Arc::new(hook))
    }

    /// Add an Arc-wrapped query hook after any existing one.
    pub fn add_hook_arc(mut self, hook: Arc<dyn QueryHook>) -> Self {
        self.hook = Some(match self.hook.take() {
            None => hook,
            Some(existing) => Arc::new(CompositeHook::new().add_arc(existing).add_arc(hook)),
        });
        self
    }

    /// Enable monitoring.
    pub fn enable_monitoring(mut self) -> Self {
        self.config.monitoring_enabled = true;
        self
    }

    /// Disable monitoring.
    pub fn disable_monitoring(mut self) -> Self {
        self.config.monitoring_enabled = false;
        self
    }

    /// Check if monitoring is enabled.
    pub fn is_monitoring_enabled(&self) -> bool {
        self.config.monitoring_enabled
    }

    /// Current configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// The wrapped connection.
    pub fn inner(&self) -> &C {
        &self.conn
    }

    /// Unwrap the connection.
    pub fn into_inner(self) -> C {
        self.conn
    }

    fn apply_hook(&self, ctx: &mut QueryContext) -> Result<()> {
        let Some(hook) = &self.hook else {
            return Ok(());
        };

        match hook.before_query(ctx) {
            HookAction::Continue => Ok(()),
            HookAction::ModifySql {
                exec_sql,
                canonical_sql,
            } => {
                ctx.exec_sql = exec_sql;
                if let Some(canonical_sql) = canonical_sql {
                    ctx.canonical_sql = canonical_sql;
                }
                ctx.query_type = QueryType::from_sql(&ctx.canonical_sql);
                Ok(())
            }
            HookAction::Abort(reason) => Err(Error::Aborted(reason)),
        }
    }

    fn report_result(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        if let Some(hook) = &self.hook {
            hook.after_query(ctx, duration, result);
        }

        if !self.config.monitoring_enabled {
            return;
        }

        self.monitor.on_query_complete(ctx, duration, result);
        if self.config.is_slow(duration) {
            self.monitor.on_slow_query(ctx, duration);
        }
    }

    /// Run one statement through hook, connection and monitor.
    fn run<T>(
        &self,
        sql: &str,
        params: &Params,
        op: impl FnOnce(&C, &str) -> Result<T>,
        summarize: impl FnOnce(&T) -> QueryResult,
    ) -> Result<T> {
        let mut ctx = QueryContext::new(sql, params.len());
        self.apply_hook(&mut ctx)?;

        if self.config.monitoring_enabled {
            self.monitor.on_query_start(&ctx);
        }

        let start = Instant::now();
        let result = op(&self.conn, &ctx.exec_sql);
        let duration = start.elapsed();

        let query_result = match &result {
            Ok(value) => summarize(value),
            Err(err) => QueryResult::error(err.to_string()),
        };

        self.report_result(&ctx, duration, &query_result);
        result
    }
}

impl<C: Connection> Connection for InstrumentedConnection<C> {
    fn select_first(&self, sql: &str, params: &Params) -> Result<Option<Row>> {
        self.run(
            sql,
            params,
            |conn, sql| conn.select_first(sql, params),
            |row| QueryResult::OptionalRow(row.is_some()),
        )
    }

    fn select_all(&self, sql: &str, params: &Params) -> Result<Vec<Row>> {
        self.run(
            sql,
            params,
            |conn, sql| conn.select_all(sql, params),
            |rows| QueryResult::Rows(rows.len()),
        )
    }

    fn exec(&self, sql: &str, params: &Params) -> Result<u64> {
        self.run(
            sql,
            params,
            |conn, sql| conn.exec(sql, params),
            |affected| QueryResult::Affected(*affected),
        )
    }

    fn last_inserted_id(&self) -> Result<i64> {
        self.conn.last_inserted_id()
    }
}
