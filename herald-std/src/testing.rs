//! Testing utilities for Herald.
//!
//! Handlers and sinks that record what the bus does, so tests can assert on
//! delivery order, counts and log output.
//!
//! # Features
//!
//! - [`RecordingHandler`]: records every payload it receives
//! - [`CountingHandler`]: counts invocations for any payload type
//! - [`FailingHandler`]: always fails, for error-path tests
//! - [`OrderRecorder`]: shared log of which tagged listener ran when
//! - [`LogCapture`]: a logger that keeps records instead of printing them

use crate::bus::LogRecord;
use herald_core::{BoxError, Handler, Message, Payload};
use std::{
    fmt::Debug,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};
use thiserror::Error;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records all payloads it receives.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingHandler::<i64>::new();
/// bus.on("add", recorder.clone());
///
/// bus.emit("add", 1_i64).await;
/// assert_eq!(recorder.payloads(), vec![1]);
/// ```
pub struct RecordingHandler<P> {
    payloads: Arc<Mutex<Vec<P>>>,
}

impl<P: Clone> RecordingHandler<P> {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self {
            payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a clone of the recorded payloads.
    pub fn payloads(&self) -> Vec<P> {
        lock(&self.payloads).clone()
    }

    /// Get the number of recorded payloads.
    pub fn count(&self) -> usize {
        lock(&self.payloads).len()
    }

    /// Clear all recorded payloads.
    pub fn clear(&self) {
        lock(&self.payloads).clear();
    }
}

impl<P: Clone> Default for RecordingHandler<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for RecordingHandler<P> {
    fn clone(&self) -> Self {
        Self {
            payloads: self.payloads.clone(),
        }
    }
}

impl<P: Payload> Handler<P> for RecordingHandler<P> {
    type Output = ();

    async fn call(&self, input: P) -> Self::Output {
        lock(&self.payloads).push(input);
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts invocations.
///
/// It accepts any payload type, so registering it usually needs the
/// payload named explicitly: `bus.on::<i32, _>("tick", counter.clone())`.
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Default for CountingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CountingHandler {
    fn clone(&self) -> Self {
        Self {
            count: self.count.clone(),
        }
    }
}

impl<E: Message> Handler<E> for CountingHandler {
    type Output = ();

    async fn call(&self, _input: E) -> Self::Output {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Failing Handler
// ============================================================================

/// The error returned by [`FailingHandler`].
#[derive(Debug, Clone, Error)]
#[error("injected failure: {0}")]
pub struct InjectedFailure(pub String);

/// A handler that counts its calls and always returns an error.
#[derive(Clone)]
pub struct FailingHandler {
    message: String,
    calls: Arc<AtomicUsize>,
}

impl FailingHandler {
    /// Create a handler failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times the handler was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<E: Message> Handler<E> for FailingHandler {
    type Output = Result<(), BoxError>;

    async fn call(&self, _input: E) -> Self::Output {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(InjectedFailure(self.message.clone()).into())
    }
}

// ============================================================================
// Order Recorder
// ============================================================================

/// A shared log of tagged listener invocations.
///
/// # Example
///
/// ```rust,ignore
/// let order = OrderRecorder::new();
/// bus.on("k", order.tagged::<i32>("A"));
/// bus.on_unique("k", order.tagged::<i32>("B"));
///
/// bus.emit("k", 0).await;
/// assert_eq!(order.take(), vec!["A", "B"]);
/// ```
#[derive(Clone, Default)]
pub struct OrderRecorder {
    entries: Arc<Mutex<Vec<String>>>,
}

impl OrderRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler for payload `P` that appends `tag` when it runs.
    pub fn tagged<P: Message>(&self, tag: &str) -> impl Handler<P> + use<P> {
        let entries = self.entries.clone();
        let tag = tag.to_string();
        move |_: P| {
            let entries = entries.clone();
            let tag = tag.clone();
            async move {
                lock(&entries).push(tag);
            }
        }
    }

    /// Tags recorded so far, in invocation order.
    pub fn entries(&self) -> Vec<String> {
        lock(&self.entries).clone()
    }

    /// Return the recorded tags and start over.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *lock(&self.entries))
    }
}

// ============================================================================
// Log Capture
// ============================================================================

/// A logger that keeps every record for later inspection.
///
/// # Example
///
/// ```rust,ignore
/// let capture = LogCapture::new();
/// let bus = EventBus::<String>::with_options(
///     BusOptions::new().with_log(true).with_logger(capture.logger()),
/// );
/// ```
#[derive(Clone, Default)]
pub struct LogCapture {
    entries: Arc<Mutex<Vec<(LogRecord, Option<String>)>>>,
}

impl LogCapture {
    /// Create an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// A logger writing into this capture.
    pub fn logger(&self) -> impl Fn(&LogRecord, Option<&dyn Debug>) + Send + Sync + use<> {
        let entries = self.entries.clone();
        move |record: &LogRecord, payload: Option<&dyn Debug>| {
            let payload = payload.map(|p| format!("{p:?}"));
            lock(&entries).push((record.clone(), payload));
        }
    }

    /// Records in the order they were logged.
    pub fn records(&self) -> Vec<LogRecord> {
        lock(&self.entries)
            .iter()
            .map(|(record, _)| record.clone())
            .collect()
    }

    /// `Debug` renderings of the payloads that were logged.
    pub fn payloads(&self) -> Vec<String> {
        lock(&self.entries)
            .iter()
            .filter_map(|(_, payload)| payload.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::{DynHandler, Mode};

    fn block_on<F: std::future::Future>(fut: F) -> F::Output {
        futures::executor::block_on(fut)
    }

    #[test]
    fn test_recording_handler() {
        let recorder = RecordingHandler::<i64>::new();
        block_on(recorder.call(1));
        block_on(recorder.clone().call(2));
        assert_eq!(recorder.payloads(), vec![1, 2]);
        recorder.clear();
        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn test_failing_handler() {
        let failing = FailingHandler::new("boom");
        let outcome = block_on(DynHandler::<u8>::call_dyn(&failing, 1));
        let err = outcome.unwrap_err();
        assert_eq!(err.to_string(), "injected failure: boom");
        assert_eq!(failing.calls(), 1);
    }

    #[test]
    fn test_order_recorder_take() {
        let order = OrderRecorder::new();
        block_on(order.tagged::<()>("A").call(()));
        block_on(order.tagged::<()>("B").call(()));
        assert_eq!(order.entries(), vec!["A", "B"]);
        assert_eq!(order.take(), vec!["A", "B"]);
        assert!(order.entries().is_empty());
    }

    #[test]
    fn test_log_capture() {
        let capture = LogCapture::new();
        let logger = capture.logger();
        logger(&LogRecord::Emit { key: "k".into() }, Some(&3_i32));
        logger(
            &LogRecord::On {
                key: "k".into(),
                mode: Mode::Unique,
            },
            None,
        );
        assert_eq!(capture.records().len(), 2);
        assert_eq!(capture.payloads(), vec!["3".to_string()]);
    }
}
