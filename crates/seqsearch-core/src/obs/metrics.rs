//! Ephemeral, in-memory dispatch counters, global and per endpoint.

use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub endpoints: BTreeMap<String, EndpointCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Dispatch entrypoints
    pub search_calls: u64,
    pub get_calls: u64,

    // Page outcomes
    pub items_returned: u64,
    pub pages_continued: u64,
    pub pages_final: u64,

    // Rejections
    pub decode_rejections: u64,
    pub request_rejections: u64,
    pub lookup_misses: u64,
}

///
/// EndpointCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EndpointCounters {
    pub calls: u64,
    pub items_returned: u64,
    pub rejections: u64,
}

///
/// EventReport
/// Point-in-time snapshot handed to embedders and tests.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub endpoints: BTreeMap<String, EndpointCounters>,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Snapshot the current state.
pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport {
        ops: m.ops.clone(),
        endpoints: m.endpoints.clone(),
    })
}
