#![allow(dead_code)]

use herald::{BusOptions, EventBus, Handler, from_fn};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicI64, Ordering},
};

// ============================================================================
// Test Buses
// ============================================================================

/// A bus invoking listeners in the emitting turn.
pub fn sync_bus() -> EventBus {
    EventBus::with_options(BusOptions::new().with_sync(true))
}

/// A bus yielding to the scheduler before each listener.
pub fn deferred_bus() -> EventBus {
    EventBus::new()
}

// ============================================================================
// Test Payloads
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub author: String,
    pub body: String,
}

impl herald::Message for ChatMessage {}

impl ChatMessage {
    pub fn new(author: &str, body: &str) -> Self {
        Self {
            author: author.to_string(),
            body: body.to_string(),
        }
    }
}

// ============================================================================
// Test Handlers
// ============================================================================

/// Adds `delta + extra` to `counter`.
pub fn adder(counter: &Arc<AtomicI64>, extra: i64) -> impl Handler<i64> + use<> {
    let counter = counter.clone();
    from_fn(move |delta: i64| {
        counter.fetch_add(delta + extra, Ordering::SeqCst);
    })
}

/// Subtracts `delta` from `counter`.
pub fn subtractor(counter: &Arc<AtomicI64>) -> impl Handler<i64> + use<> {
    let counter = counter.clone();
    from_fn(move |delta: i64| {
        counter.fetch_sub(delta, Ordering::SeqCst);
    })
}

/// Appends every payload to `log`.
pub fn collector<T: herald::Payload>(log: &Arc<Mutex<Vec<T>>>) -> impl Handler<T> + use<T> {
    let log = log.clone();
    from_fn(move |payload: T| {
        log.lock().unwrap().push(payload);
    })
}
