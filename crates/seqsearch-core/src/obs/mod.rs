//! Observability: per-endpoint dispatch telemetry and sink abstractions.
//!
//! Dispatch logic never touches metrics state directly; all instrumentation
//! flows through `MetricsEvent` and `MetricsSink`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EndpointCounters, EventOps, EventReport};
pub use sink::{
    MetricsEvent, MetricsSink, RejectKind, metrics_report, metrics_reset_all, with_metrics_sink,
};
