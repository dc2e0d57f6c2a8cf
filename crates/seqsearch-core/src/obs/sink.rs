//! Metrics sink boundary.
//!
//! Dispatch logic MUST NOT depend on `obs::metrics` directly. All
//! instrumentation flows through `MetricsEvent` and `MetricsSink`; this
//! module is the only bridge between dispatch and the global metrics state.

use crate::obs::metrics;
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = const { RefCell::new(None) };
}

///
/// RejectKind
///

#[derive(Clone, Copy, Debug)]
pub enum RejectKind {
    Decode,
    Request,
    LookupMiss,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent {
    SearchStart {
        endpoint: &'static str,
    },
    SearchFinish {
        endpoint: &'static str,
        items_returned: u64,
        continued: bool,
    },
    GetCall {
        endpoint: &'static str,
    },
    Rejected {
        endpoint: &'static str,
        kind: RejectKind,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default process-local sink that writes into global metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::SearchStart { endpoint } => {
                metrics::with_state_mut(|m| {
                    m.ops.search_calls = m.ops.search_calls.saturating_add(1);
                    let entry = m.endpoints.entry(endpoint.to_string()).or_default();
                    entry.calls = entry.calls.saturating_add(1);
                });
            }

            MetricsEvent::SearchFinish {
                endpoint,
                items_returned,
                continued,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.items_returned = m.ops.items_returned.saturating_add(items_returned);
                    if continued {
                        m.ops.pages_continued = m.ops.pages_continued.saturating_add(1);
                    } else {
                        m.ops.pages_final = m.ops.pages_final.saturating_add(1);
                    }

                    let entry = m.endpoints.entry(endpoint.to_string()).or_default();
                    entry.items_returned = entry.items_returned.saturating_add(items_returned);
                });
            }

            MetricsEvent::GetCall { endpoint } => {
                metrics::with_state_mut(|m| {
                    m.ops.get_calls = m.ops.get_calls.saturating_add(1);
                    let entry = m.endpoints.entry(endpoint.to_string()).or_default();
                    entry.calls = entry.calls.saturating_add(1);
                });
            }

            MetricsEvent::Rejected { endpoint, kind } => {
                metrics::with_state_mut(|m| {
                    match kind {
                        RejectKind::Decode => {
                            m.ops.decode_rejections = m.ops.decode_rejections.saturating_add(1);
                        }
                        RejectKind::Request => {
                            m.ops.request_rejections =
                                m.ops.request_rejections.saturating_add(1);
                        }
                        RejectKind::LookupMiss => {
                            m.ops.lookup_misses = m.ops.lookup_misses.saturating_add(1);
                        }
                    }

                    let entry = m.endpoints.entry(endpoint.to_string()).or_default();
                    entry.rejections = entry.rejections.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` came from a valid `&dyn MetricsSink` in `with_metrics_sink`,
        //   which restores the previous pointer on every exit, including
        //   unwind, so `ptr` cannot dangle here.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        // - Only a shared reference is materialized, matching the shared
        //   borrow used to install the override.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current metrics state for endpoint/test plumbing.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override. Overrides nest;
/// the previous sink is restored when the closure returns or unwinds.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - The lifetime-erased pointer is installed only for this dynamic
    //   scope; `Guard` restores the previous slot on all exits, including
    //   panic.
    // - `record` only dereferences synchronously and never persists the
    //   pointer.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSink<'a> {
        calls: &'a AtomicUsize,
    }

    impl MetricsSink for CountingSink<'_> {
        fn record(&self, _: MetricsEvent) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn with_metrics_sink_routes_and_restores_nested_overrides() {
        SINK_OVERRIDE.with(|cell| {
            *cell.borrow_mut() = None;
        });

        let outer_calls = AtomicUsize::new(0);
        let inner_calls = AtomicUsize::new(0);
        let outer = CountingSink {
            calls: &outer_calls,
        };
        let inner = CountingSink {
            calls: &inner_calls,
        };

        with_metrics_sink(&outer, || {
            record(MetricsEvent::GetCall {
                endpoint: "datasets",
            });
            assert_eq!(outer_calls.load(Ordering::SeqCst), 1);
            assert_eq!(inner_calls.load(Ordering::SeqCst), 0);

            with_metrics_sink(&inner, || {
                record(MetricsEvent::GetCall {
                    endpoint: "datasets",
                });
            });

            // Inner override was restored to outer override.
            record(MetricsEvent::GetCall {
                endpoint: "datasets",
            });
        });

        assert_eq!(outer_calls.load(Ordering::SeqCst), 2);
        assert_eq!(inner_calls.load(Ordering::SeqCst), 1);

        // Outer override was restored to previous (none).
        SINK_OVERRIDE.with(|cell| {
            assert!(cell.borrow().is_none());
        });
    }

    #[test]
    fn with_metrics_sink_restores_override_on_panic() {
        SINK_OVERRIDE.with(|cell| {
            *cell.borrow_mut() = None;
        });

        let calls = AtomicUsize::new(0);
        let sink = CountingSink { calls: &calls };

        let panicked = catch_unwind(AssertUnwindSafe(|| {
            with_metrics_sink(&sink, || {
                record(MetricsEvent::SearchStart {
                    endpoint: "variants",
                });
                panic!("intentional panic for guard test");
            });
        }))
        .is_err();
        assert!(panicked);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Guard restored TLS slot after unwind.
        SINK_OVERRIDE.with(|cell| {
            assert!(cell.borrow().is_none());
        });
    }

    #[test]
    fn global_sink_accumulates_per_endpoint_counters() {
        metrics_reset_all();

        record(MetricsEvent::SearchStart {
            endpoint: "variants",
        });
        record(MetricsEvent::SearchFinish {
            endpoint: "variants",
            items_returned: 4,
            continued: true,
        });
        record(MetricsEvent::Rejected {
            endpoint: "variants",
            kind: RejectKind::LookupMiss,
        });

        let report = metrics_report();
        assert_eq!(report.ops.search_calls, 1);
        assert_eq!(report.ops.items_returned, 4);
        assert_eq!(report.ops.pages_continued, 1);
        assert_eq!(report.ops.lookup_misses, 1);

        let endpoint = report
            .endpoints
            .get("variants")
            .expect("endpoint counters should be present");
        assert_eq!(endpoint.calls, 1);
        assert_eq!(endpoint.items_returned, 4);
        assert_eq!(endpoint.rejections, 1);
    }
}
