//! Prometheus metrics for the task API.
//!
//! Lifecycle counters are incremented by the task service, request counters
//! and latencies by the request middleware. The `tasks_current` and
//! `tasks_pending` gauges are never updated incrementally: they are set from a
//! full scan of the task bucket each time the scrape endpoint runs.
//!
//! Request labels use the matched route template (`/tasks/{id}/complete`,
//! `/get/{key}`), so label cardinality is bounded by the route table.
//! Requests that match no route share the [`UNMATCHED_PATH`] label.

use std::sync::Arc;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Path label for requests that matched no route.
pub const UNMATCHED_PATH: &str = "unmatched";

/// Task lifecycle events that are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEvent {
    Created,
    Completed,
    Incompleted,
    Deleted,
}

#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    tasks_created: IntCounter,
    tasks_completed: IntCounter,
    tasks_incompleted: IntCounter,
    tasks_deleted: IntCounter,
    health_check_failures: IntCounter,
    tasks_current: IntGauge,
    tasks_pending: IntGauge,
    requests_total: IntCounterVec,
    request_duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let tasks_created =
            IntCounter::new("tasks_created_total", "Total number of tasks created")?;
        let tasks_completed =
            IntCounter::new("tasks_completed_total", "Total number of tasks marked completed")?;
        let tasks_incompleted = IntCounter::new(
            "tasks_incompleted_total",
            "Total number of tasks marked incomplete again",
        )?;
        let tasks_deleted =
            IntCounter::new("tasks_deleted_total", "Total number of tasks deleted")?;
        let health_check_failures = IntCounter::new(
            "health_check_failures_total",
            "Total number of health checks that could not reach the store",
        )?;

        let tasks_current = IntGauge::new("tasks_current", "Number of tasks currently stored")?;
        let tasks_pending =
            IntGauge::new("tasks_pending", "Number of stored tasks not yet completed")?;

        let requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )?;
        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request latency in seconds",
            ),
            &["method", "path"],
        )?;

        registry.register(Box::new(tasks_created.clone()))?;
        registry.register(Box::new(tasks_completed.clone()))?;
        registry.register(Box::new(tasks_incompleted.clone()))?;
        registry.register(Box::new(tasks_deleted.clone()))?;
        registry.register(Box::new(health_check_failures.clone()))?;
        registry.register(Box::new(tasks_current.clone()))?;
        registry.register(Box::new(tasks_pending.clone()))?;
        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            tasks_created,
            tasks_completed,
            tasks_incompleted,
            tasks_deleted,
            health_check_failures,
            tasks_current,
            tasks_pending,
            requests_total,
            request_duration,
        })
    }

    pub fn record_task_event(&self, event: TaskEvent) {
        match event {
            TaskEvent::Created => self.tasks_created.inc(),
            TaskEvent::Completed => self.tasks_completed.inc(),
            TaskEvent::Incompleted => self.tasks_incompleted.inc(),
            TaskEvent::Deleted => self.tasks_deleted.inc(),
        }
    }

    pub fn record_health_failure(&self) {
        self.health_check_failures.inc();
    }

    /// `path` is a route template or [`UNMATCHED_PATH`], never a raw URI path.
    pub fn record_request(&self, method: &str, path: &str, status: u16, seconds: f64) {
        let status = status.to_string();
        self.requests_total
            .with_label_values(&[method, path, status.as_str()])
            .inc();
        self.request_duration
            .with_label_values(&[method, path])
            .observe(seconds);
    }

    /// Sets the task gauges from a complete scan of the bucket.
    pub fn refresh_task_gauges(&self, current: u64, pending: u64) {
        self.tasks_current.set(current as i64);
        self.tasks_pending.set(pending as i64);
    }

    /// Encodes every registered metric in the text exposition format.
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;

        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    #[cfg(test)]
    pub fn task_event_count(&self, event: TaskEvent) -> u64 {
        match event {
            TaskEvent::Created => self.tasks_created.get(),
            TaskEvent::Completed => self.tasks_completed.get(),
            TaskEvent::Incompleted => self.tasks_incompleted.get(),
            TaskEvent::Deleted => self.tasks_deleted.get(),
        }
    }
}
