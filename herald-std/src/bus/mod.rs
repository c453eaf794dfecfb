//! # Dispatch Core
//!
//! [`EventBus`] owns a registry mapping event keys to ordered listener
//! records and delivers emitted payloads to them.
//!
//! # Registration
//!
//! - Anonymous registrations always append.
//! - A named registration replaces the handler and mode of the record with
//!   the same alias under that key, keeping its position.
//! - Every registration returns a [`ListenerHandle`] that removes exactly
//!   the handler passed to that call.
//!
//! # Delivery
//!
//! `emit` snapshots the listener list when it is called and returns an
//! [`Emission`]. Awaiting it runs listeners one at a time:
//!
//! | Mode | Behavior |
//! |------|----------|
//! | `Default` | Runs, then the next listener |
//! | `Unique` | Runs, then the emit ends |
//! | `Stack` | Deferred; only the last one reached runs, after the loop |
//!
//! With `sync` disabled (the default) each call is preceded by a yield to
//! the scheduler. Listener failures are logged and swallowed.

mod emission;
mod options;
mod registry;

pub use emission::Emission;
pub use options::{BusOptions, LogRecord, Logger};
pub use registry::{ANONYMOUS, ListenerRecord};

use crate::{
    handle::{HandleGroup, ListenerHandle},
    logging,
};
use emission::Timing;
use herald_core::{Callback, EventKey, Handler, HandlerId, Mode, Payload};
use registry::Registry;
use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc, OnceLock,
        atomic::{AtomicBool, Ordering},
    },
    time::SystemTime,
};

pub(crate) struct BusInner<K> {
    registry: Registry<K>,
    sync: AtomicBool,
    log: bool,
    logger: Logger,
    created_at: SystemTime,
}

impl<K: EventKey> BusInner<K> {
    fn log(&self, record: LogRecord, payload: Option<&dyn fmt::Debug>) {
        if self.log {
            (self.logger)(&record, payload);
        }
    }

    pub(crate) fn remove(&self, key: &K, id: HandlerId) -> bool {
        let removed = self.registry.remove(key, id);
        if removed {
            self.log(LogRecord::Off { key: key.to_string() }, None);
        }
        removed
    }
}

/// A typed publish/subscribe dispatcher.
///
/// Cloning is cheap; clones share one registry.
///
/// # Example
///
/// ```rust,ignore
/// let bus = EventBus::<String>::with_options(BusOptions::new().with_sync(true));
///
/// let handle = bus.on("add", from_fn(move |delta: i64| {
///     counter.fetch_add(delta, Ordering::SeqCst);
/// }));
///
/// bus.emit("add", 1_i64).await;
/// handle.cancel();
/// ```
pub struct EventBus<K: EventKey = String> {
    inner: Arc<BusInner<K>>,
}

impl<K: EventKey> EventBus<K> {
    /// Create a bus with deferred delivery and logging disabled.
    pub fn new() -> Self {
        Self::with_options(BusOptions::default())
    }

    /// Create a bus from options.
    pub fn with_options(options: BusOptions) -> Self {
        Self {
            inner: Arc::new(BusInner {
                registry: Registry::new(),
                sync: AtomicBool::new(options.sync),
                log: options.log,
                logger: options.logger.unwrap_or_else(logging::default_logger),
                created_at: SystemTime::now(),
            }),
        }
    }

    /// Register `handler` under `key`.
    ///
    /// With `alias` set and a record of that alias already present, its
    /// handler and mode are replaced in place. Otherwise a record is
    /// appended.
    ///
    /// The returned handle removes the handler passed here. If a later
    /// registration replaces it through the alias, the handle no longer
    /// matches anything and cancelling it does nothing.
    pub fn register<P, H>(
        &self,
        key: impl Into<K>,
        handler: H,
        alias: Option<&str>,
        mode: Mode,
    ) -> ListenerHandle<K>
    where
        P: Payload,
        H: Handler<P>,
    {
        let key = key.into();
        self.inner.log(
            LogRecord::On {
                key: key.to_string(),
                mode,
            },
            None,
        );

        let callback = Callback::new(handler);
        let id = callback.id();
        self.inner
            .registry
            .insert(key.clone(), ListenerRecord::new(alias, mode, callback));

        ListenerHandle::new(Arc::downgrade(&self.inner), key, id)
    }

    /// Register an anonymous listener.
    pub fn on<P, H>(&self, key: impl Into<K>, handler: H) -> ListenerHandle<K>
    where
        P: Payload,
        H: Handler<P>,
    {
        self.register(key, handler, None, Mode::Default)
    }

    /// Register a named listener, replacing any listener with that alias.
    pub fn on_named<P, H>(&self, key: impl Into<K>, alias: &str, handler: H) -> ListenerHandle<K>
    where
        P: Payload,
        H: Handler<P>,
    {
        self.register(key, handler, Some(alias), Mode::Default)
    }

    /// Register a listener that ends the emit after it runs.
    pub fn on_unique<P, H>(&self, key: impl Into<K>, handler: H) -> ListenerHandle<K>
    where
        P: Payload,
        H: Handler<P>,
    {
        self.register(key, handler, None, Mode::Unique)
    }

    /// Register a stack listener. Only the last one reached in an emit runs.
    pub fn on_stack<P, H>(&self, key: impl Into<K>, handler: H) -> ListenerHandle<K>
    where
        P: Payload,
        H: Handler<P>,
    {
        self.register(key, handler, None, Mode::Stack)
    }

    /// Register a listener that runs at most once.
    ///
    /// The registration removes itself before the handler runs, whether or
    /// not the handler succeeds. The returned handle cancels the wrapper.
    pub fn once<P, H>(&self, key: impl Into<K>, handler: H) -> ListenerHandle<K>
    where
        P: Payload,
        H: Handler<P>,
    {
        let handler = Callback::new(handler);
        let slot: Arc<OnceLock<ListenerHandle<K>>> = Arc::new(OnceLock::new());
        let fired = Arc::new(AtomicBool::new(false));

        let wrapper = {
            let slot = slot.clone();
            move |payload: P| {
                let handler = handler.clone();
                let slot = slot.clone();
                let fired = fired.clone();
                async move {
                    if let Some(handle) = slot.get() {
                        handle.cancel();
                    }
                    // Several emits may have snapshotted the wrapper.
                    if fired.swap(true, Ordering::AcqRel) {
                        return Ok(());
                    }
                    handler.call(payload).await
                }
            }
        };

        // The slot is filled before the wrapper becomes visible to emits.
        let key = key.into();
        let wrapper = Callback::<P>::new(wrapper);
        let handle = ListenerHandle::new(Arc::downgrade(&self.inner), key.clone(), wrapper.id());
        let _ = slot.set(handle);
        self.register::<P, _>(key, wrapper, None, Mode::Default)
    }

    /// Remove the first listener under `key` registered from `callback`.
    ///
    /// Does nothing if the key or the handler is unknown.
    pub fn off<P: Payload>(&self, key: impl Into<K>, callback: &Callback<P>) {
        self.off_id(key, callback.id());
    }

    /// Remove the first listener under `key` with the given identity.
    pub fn off_id(&self, key: impl Into<K>, id: HandlerId) {
        self.inner.remove(&key.into(), id);
    }

    /// Deliver `payload` to the listeners of `key`.
    ///
    /// The listener list is captured now; listeners added or removed while
    /// the emission runs do not change it.
    ///
    /// Nothing is delivered until the returned [`Emission`] is awaited or
    /// detached, even on a `sync` bus. Use [`EventBus::emit_detached`] to
    /// fire and forget.
    pub fn emit<P: Payload>(&self, key: impl Into<K>, payload: P) -> Emission {
        let key = key.into();
        self.inner.log(
            LogRecord::Emit {
                key: key.to_string(),
            },
            Some(&payload as &dyn fmt::Debug),
        );

        let listeners = self.inner.registry.snapshot(&key);
        if listeners.is_empty() {
            return Emission::ready();
        }

        let timing = Timing::from_sync(self.is_sync());
        Emission::new(emission::deliver(key, listeners, payload, timing))
    }

    /// Emit without waiting for delivery. See [`Emission::detach`].
    pub fn emit_detached<P: Payload>(&self, key: impl Into<K>, payload: P) {
        self.emit(key, payload).detach();
    }

    /// Snapshot of the registry.
    pub fn bus(&self) -> HashMap<K, Vec<ListenerRecord>> {
        self.inner.registry.entries()
    }

    /// Number of listeners registered under `key`.
    pub fn listener_count(&self, key: impl Into<K>) -> usize {
        self.inner.registry.len(&key.into())
    }

    /// Build a handle group pre-seeded with `handles`.
    pub fn create_group(&self, handles: impl IntoIterator<Item = ListenerHandle<K>>) -> HandleGroup {
        handles.into_iter().collect()
    }

    /// Whether listeners are invoked without yielding first.
    pub fn is_sync(&self) -> bool {
        self.inner.sync.load(Ordering::Acquire)
    }

    /// Switch delivery timing. Emissions already started keep their timing.
    pub fn set_sync(&self, sync: bool) {
        self.inner.sync.store(sync, Ordering::Release);
    }

    /// When this bus was created.
    pub fn created_at(&self) -> SystemTime {
        self.inner.created_at
    }
}

impl<K: EventKey> Default for EventBus<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EventKey> Clone for EventBus<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: EventKey> fmt::Debug for EventBus<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("sync", &self.is_sync())
            .field("log", &self.inner.log)
            .field("created_at", &self.inner.created_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingHandler, LogCapture};
    use herald_core::from_fn;
    use std::sync::{
        Mutex,
        atomic::{AtomicI64, AtomicUsize},
    };

    fn sync_bus() -> EventBus {
        EventBus::with_options(BusOptions::new().with_sync(true))
    }

    #[tokio::test]
    async fn test_emit_without_listeners_is_noop() {
        let bus = sync_bus();
        let emission = bus.emit("nothing", 1_i32);
        assert!(emission.is_empty());
        emission.await;
        assert!(bus.bus().is_empty());
    }

    #[tokio::test]
    async fn test_named_replacement() {
        let bus = sync_bus();
        let counter = Arc::new(AtomicI64::new(0));

        let c = counter.clone();
        bus.on_named("add", "add", from_fn(move |data: i64| {
            c.fetch_add(data * 2, Ordering::SeqCst);
        }));
        bus.emit("add", 1_i64).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        counter.store(0, Ordering::SeqCst);
        let c = counter.clone();
        bus.on_named("add", "add", from_fn(move |data: i64| {
            c.fetch_add(data, Ordering::SeqCst);
        }));
        bus.emit("add", 1_i64).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(bus.listener_count("add"), 1);
    }

    #[tokio::test]
    async fn test_once_removes_itself() {
        let bus = sync_bus();
        let counter = CountingHandler::new();
        bus.once::<i32, _>("tick", counter.clone());

        for n in 0..3 {
            bus.emit("tick", n).await;
        }
        assert_eq!(counter.count(), 1);
        assert_eq!(bus.listener_count("tick"), 0);
    }

    #[tokio::test]
    async fn test_once_handle_cancels_wrapper() {
        let bus = sync_bus();
        let counter = CountingHandler::new();
        let handle = bus.once::<(), _>("tick", counter.clone());
        handle.cancel();

        bus.emit("tick", ()).await;
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_once_handle_matches_registered_wrapper() {
        let bus = sync_bus();
        let handle = bus.once::<i32, _>("tick", CountingHandler::new());
        let records = bus.bus();
        assert_eq!(records["tick"].len(), 1);
        assert_eq!(records["tick"][0].handler_id(), handle.handler_id());
    }

    #[tokio::test]
    async fn test_off_by_callback() {
        let bus = sync_bus();
        let counter = CountingHandler::new();
        let callback = Callback::<u8>::new(counter.clone());
        bus.on("k", callback.clone());
        bus.on("k", callback.clone());

        bus.off("k", &callback);
        assert_eq!(bus.listener_count("k"), 1);

        bus.emit("k", 7_u8).await;
        assert_eq!(counter.count(), 1);
    }

    #[tokio::test]
    async fn test_off_unknown_is_silent() {
        let bus = sync_bus();
        let stranger = Callback::new(from_fn(|_: i32| {}));
        bus.off("missing", &stranger);
        bus.on("k", from_fn(|_: i32| {}));
        bus.off("k", &stranger);
        assert_eq!(bus.listener_count("k"), 1);
    }

    #[tokio::test]
    async fn test_logging_records() {
        let capture = LogCapture::new();
        let bus: EventBus = EventBus::with_options(
            BusOptions::new()
                .with_sync(true)
                .with_log(true)
                .with_logger(capture.logger()),
        );

        let handle = bus.on_stack("k", from_fn(|_: i32| {}));
        bus.emit("k", 5_i32).await;
        handle.cancel();
        handle.cancel();

        assert_eq!(
            capture.records(),
            vec![
                LogRecord::On {
                    key: "k".into(),
                    mode: Mode::Stack
                },
                LogRecord::Emit { key: "k".into() },
                LogRecord::Off { key: "k".into() },
            ]
        );
        assert_eq!(capture.payloads(), vec!["5".to_string()]);
    }

    #[tokio::test]
    async fn test_logging_disabled_by_default() {
        let capture = LogCapture::new();
        let bus: EventBus = EventBus::with_options(BusOptions::new().with_logger(capture.logger()));
        bus.on("k", from_fn(|_: i32| {}));
        bus.emit("k", 1_i32).await;
        assert!(capture.records().is_empty());
    }

    #[tokio::test]
    async fn test_set_sync_applies_to_next_emit() {
        let bus: EventBus = EventBus::new();
        assert!(!bus.is_sync());
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        bus.on("k", from_fn(move |_: ()| {
            h.fetch_add(1, Ordering::SeqCst);
        }));

        bus.set_sync(true);
        bus.emit_detached("k", ());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_listener_may_register_during_emit() {
        let bus = sync_bus();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let inner_bus = bus.clone();
        let s = seen.clone();
        bus.on("k", from_fn(move |n: i32| {
            s.lock().unwrap().push(n);
            let s = s.clone();
            inner_bus.on("k", from_fn(move |m: i32| {
                s.lock().unwrap().push(m * 100);
            }));
        }));

        bus.emit("k", 1_i32).await;
        assert_eq!(*seen.lock().unwrap(), vec![1]);

        bus.emit("k", 2_i32).await;
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 200]);
    }

    #[test]
    fn test_clones_share_registry() {
        let bus: EventBus = EventBus::new();
        let other = bus.clone();
        other.on("k", from_fn(|_: i32| {}));
        assert_eq!(bus.listener_count("k"), 1);
        assert!(bus.created_at() <= SystemTime::now());
    }
}
