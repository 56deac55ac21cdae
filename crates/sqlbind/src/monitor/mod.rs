//! Query monitoring and hooks around statement execution.
//!
//! This module provides:
//! - Timing of every statement run through a [`Connection`](crate::Connection)
//! - Hooks that can inspect, rewrite or abort SQL before it runs
//! - Logging and counter monitors
//!
//! # Example
//!
//! ```
//! use sqlbind::{InstrumentedConnection, MonitorConfig, StatsMonitor};
//! # use sqlbind::{Connection, Params, Result, Row};
//! # struct Db;
//! # impl Connection for Db {
//! #     fn select_first(&self, _: &str, _: &Params) -> Result<Option<Row>> { Ok(None) }
//! #     fn select_all(&self, _: &str, _: &Params) -> Result<Vec<Row>> { Ok(vec![]) }
//! #     fn exec(&self, _: &str, _: &Params) -> Result<u64> { Ok(0) }
//! #     fn last_inserted_id(&self) -> Result<i64> { Ok(0) }
//! # }
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let stats = Arc::new(StatsMonitor::new());
//! let conn = InstrumentedConnection::new(Db)
//!     .with_config(
//!         MonitorConfig::new()
//!             .with_slow_query_threshold(Duration::from_millis(250))
//!             .enable_monitoring(),
//!     )
//!     .with_monitor_arc(stats.clone());
//!
//! sqlbind::QueryBuilder::new("users").select(&conn).unwrap();
//! assert_eq!(stats.stats().select_count, 1);
//! ```

mod config;
mod instrumented;
mod monitors;
mod types;

#[cfg(feature = "tracing")]
mod tracing_hook;


pub use config::MonitorConfig;
pub use instrumented::InstrumentedConnection;
pub use monitors::{
    CompositeHook, CompositeMonitor, LoggingMonitor, NoopMonitor, QueryStats, StatsMonitor,
};
pub use types::{HookAction, QueryContext, QueryHook, QueryMonitor, QueryResult, QueryType};

#[cfg(feature = "tracing")]
pub use tracing_hook::TracingSqlHook;

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// One-line form of `sql` for log output, cut to `max_bytes` with a `...` marker.
pub(crate) fn display_sql(sql: &str, max_bytes: Option<usize>) -> String {
    let shown = match max_bytes {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    };
    shown.replace('\n', " ")
}
