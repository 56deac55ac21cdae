use std::time::Duration;

/// Monitoring switches for an [`InstrumentedConnection`](super::InstrumentedConnection).
///
/// Monitors stay silent until `enable_monitoring`; hooks run regardless.
#[derive(Debug, Clone, Default)]
pub struct MonitorConfig {
    /// Statements slower than this trigger `on_slow_query`.
    pub slow_query_threshold: Option<Duration>,
    /// Whether monitors receive events.
    pub monitoring_enabled: bool,
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    pub fn enable_monitoring(mut self) -> Self {
        self.monitoring_enabled = true;
        self
    }

    pub(crate) fn is_slow(&self, duration: Duration) -> bool {
        self.slow_query_threshold
            .is_some_and(|threshold| duration > threshold)
    }
}
