use super::display_sql;
use super::types::{HookAction, QueryContext, QueryHook, QueryMonitor, QueryResult, QueryType};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A monitor that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMonitor;

impl QueryMonitor for NoopMonitor {
    fn on_query_complete(&self, _ctx: &QueryContext, _duration: Duration, _result: &QueryResult) {}
}

/// Writes one stderr line per statement: `prefix kind tag duration result | sql`.
#[derive(Debug, Clone)]
pub struct LoggingMonitor {
    /// Statements faster than this are skipped.
    pub min_duration: Option<Duration>,
    /// SQL is cut after this many bytes.
    pub max_sql_length: Option<usize>,
    /// Leading marker of every line.
    pub prefix: String,
}

impl Default for LoggingMonitor {
    fn default() -> Self {
        Self {
            min_duration: None,
            max_sql_length: Some(200),
            prefix: "[sqlbind]".to_string(),
        }
    }
}

impl LoggingMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_duration(mut self, duration: Duration) -> Self {
        self.min_duration = Some(duration);
        self
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// SQL part of a log line. A hook-rewritten statement shows both forms.
    pub(crate) fn format_sql(&self, ctx: &QueryContext) -> String {
        let canonical = display_sql(&ctx.canonical_sql, self.max_sql_length);
        if ctx.exec_sql == ctx.canonical_sql {
            return canonical;
        }
        let exec = display_sql(&ctx.exec_sql, self.max_sql_length);
        format!("{canonical} => {exec}")
    }
}

impl QueryMonitor for LoggingMonitor {
    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        if self.min_duration.is_some_and(|min| duration < min) {
            return;
        }
        eprintln!(
            "{} {:?} {} {duration:?} {result} | {}",
            self.prefix,
            ctx.query_type,
            ctx.tag.as_deref().unwrap_or("-"),
            self.format_sql(ctx)
        );
    }

    fn on_slow_query(&self, ctx: &QueryContext, duration: Duration) {
        eprintln!(
            "{} slow {:?} {duration:?} | {}",
            self.prefix,
            ctx.query_type,
            self.format_sql(ctx)
        );
    }
}

/// Counts statements per kind, failures, slow statements and time spent.
///
/// Counters saturate instead of wrapping.
#[derive(Debug, Default)]
pub struct StatsMonitor {
    /// Indexed by [`kind_slot`].
    by_kind: [AtomicU64; 5],
    failed: AtomicU64,
    slow: AtomicU64,
    total_nanos: AtomicU64,
    max_nanos: AtomicU64,
    slowest_query: Mutex<Option<String>>,
}

/// Snapshot of [`StatsMonitor`] counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryStats {
    pub total_queries: u64,
    pub failed_queries: u64,
    pub total_duration: Duration,
    pub select_count: u64,
    pub insert_count: u64,
    pub update_count: u64,
    pub delete_count: u64,
    /// Statements over the slow query threshold.
    pub slow_queries: u64,
    pub max_duration: Duration,
    /// Canonical SQL of the statement behind `max_duration`.
    pub slowest_query: Option<String>,
}

fn kind_slot(kind: QueryType) -> usize {
    match kind {
        QueryType::Select => 0,
        QueryType::Insert => 1,
        QueryType::Update => 2,
        QueryType::Delete => 3,
        QueryType::Other => 4,
    }
}

fn bump(counter: &AtomicU64, by: u64) {
    // fetch_update only fails when the closure returns None.
    let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
        Some(v.saturating_add(by))
    });
}

impl StatsMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> QueryStats {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        let kind = |kind| load(&self.by_kind[kind_slot(kind)]);

        QueryStats {
            total_queries: self
                .by_kind
                .iter()
                .map(load)
                .fold(0, u64::saturating_add),
            failed_queries: load(&self.failed),
            total_duration: Duration::from_nanos(load(&self.total_nanos)),
            select_count: kind(QueryType::Select),
            insert_count: kind(QueryType::Insert),
            update_count: kind(QueryType::Update),
            delete_count: kind(QueryType::Delete),
            slow_queries: load(&self.slow),
            max_duration: Duration::from_nanos(load(&self.max_nanos)),
            slowest_query: self
                .slowest_query
                .lock()
                .map(|slot| slot.clone())
                .unwrap_or_default(),
        }
    }

    pub fn reset(&self) {
        let scalars = [&self.failed, &self.slow, &self.total_nanos, &self.max_nanos];
        for counter in self.by_kind.iter().chain(scalars) {
            counter.store(0, Ordering::Relaxed);
        }
        if let Ok(mut slot) = self.slowest_query.lock() {
            *slot = None;
        }
    }
}

impl QueryMonitor for StatsMonitor {
    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);

        bump(&self.by_kind[kind_slot(ctx.query_type)], 1);
        bump(&self.total_nanos, nanos);
        if result.is_error() {
            bump(&self.failed, 1);
        }

        if self.max_nanos.fetch_max(nanos, Ordering::Relaxed) < nanos {
            if let Ok(mut slot) = self.slowest_query.lock() {
                *slot = Some(ctx.canonical_sql.clone());
            }
        }
    }

    fn on_slow_query(&self, _ctx: &QueryContext, _duration: Duration) {
        bump(&self.slow, 1);
    }
}

impl<M: QueryMonitor + ?Sized> QueryMonitor for Arc<M> {
    fn on_query_start(&self, ctx: &QueryContext) {
        (**self).on_query_start(ctx);
    }

    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        (**self).on_query_complete(ctx, duration, result);
    }

    fn on_slow_query(&self, ctx: &QueryContext, duration: Duration) {
        (**self).on_slow_query(ctx, duration);
    }
}

/// A monitor that forwards to several monitors in order.
#[derive(Default)]
pub struct CompositeMonitor {
    monitors: Vec<Arc<dyn QueryMonitor>>,
}

impl CompositeMonitor {
    /// Create an empty composite monitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a monitor.
    #[allow(clippy::should_implement_trait)]
    pub fn add<M: QueryMonitor + 'static>(mut self, monitor: M) -> Self {
        self.monitors.push(Arc::new(monitor));
        self
    }

    /// Add an Arc-wrapped monitor.
    pub fn add_arc(mut self, monitor: Arc<dyn QueryMonitor>) -> Self {
        self.monitors.push(monitor);
        self
    }

    /// Number of monitors.
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Check if no monitor was added.
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl QueryMonitor for CompositeMonitor {
    fn on_query_start(&self, ctx: &QueryContext) {
        for monitor in &self.monitors {
            monitor.on_query_start(ctx);
        }
    }

    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        for monitor in &self.monitors {
            monitor.on_query_complete(ctx, duration, result);
        }
    }

    fn on_slow_query(&self, ctx: &QueryContext, duration: Duration) {
        for monitor in &self.monitors {
            monitor.on_slow_query(ctx, duration);
        }
    }
}

/// A hook that runs several hooks in sequence.
///
/// Each hook sees the SQL as rewritten by the ones before it; the first
/// `Abort` stops the chain.
#[derive(Default)]
pub struct CompositeHook {
    hooks: Vec<Arc<dyn QueryHook>>,
}

impl CompositeHook {
    /// Create an empty composite hook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hook.
    #[allow(clippy::should_implement_trait)]
    pub fn add<H: QueryHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Add an Arc-wrapped hook.
    pub fn add_arc(mut self, hook: Arc<dyn QueryHook>) -> Self {
        self.hooks.push(hook);
        self
    }
}

impl QueryHook for CompositeHook {
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        let mut current = ctx.clone();
        for hook in &self.hooks {
            match hook.before_query(&current) {
                HookAction::Continue => {}
                HookAction::ModifySql {
                    exec_sql,
                    canonical_sql,
                } => {
                    current.exec_sql = exec_sql;
                    if let Some(canonical_sql) = canonical_sql {
                        current.canonical_sql = canonical_sql;
                    }
                    current.query_type = QueryType::from_sql(&current.canonical_sql);
                }
                action @ HookAction::Abort(_) => return action,
            }
        }

        if current.exec_sql == ctx.exec_sql && current.canonical_sql == ctx.canonical_sql {
            return HookAction::Continue;
        }
        HookAction::ModifySql {
            canonical_sql: (current.canonical_sql != ctx.canonical_sql)
                .then_some(current.canonical_sql),
            exec_sql: current.exec_sql,
        }
    }

    fn after_query(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        for hook in &self.hooks {
            hook.after_query(ctx, duration, result);
        }
    }
}
