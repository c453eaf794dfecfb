//! A channel bound to one event key.

use super::{ChannelConfig, compose_key};
use crate::{
    bus::{Emission, EventBus},
    handle::ListenerHandle,
};
use herald_core::{Callback, Handler, Payload};
use std::{fmt, marker::PhantomData};

/// A typed channel bound to a single key.
///
/// # Example
///
/// ```rust,ignore
/// let increase = StaticChannel::<i64>::with_config(
///     "addCounter",
///     ChannelConfig::new().with_options(BusOptions::new().with_sync(true)),
/// );
/// increase.on(from_fn(move |delta: i64| {
///     counter.fetch_add(delta, Ordering::SeqCst);
/// }));
/// increase.emit(1).await;
/// ```
pub struct StaticChannel<T> {
    bus: EventBus<String>,
    key: String,
    label: String,
    _payload: PhantomData<fn(T)>,
}

impl<T: Payload> StaticChannel<T> {
    /// A channel on a private bus with default options.
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_config(key, ChannelConfig::default())
    }

    /// A channel built from `config`. The label defaults to `key`.
    pub fn with_config(key: impl Into<String>, config: ChannelConfig) -> Self {
        let label = key.into();
        let (bus, suffix) = config.into_parts();
        Self {
            key: compose_key(&label, suffix.as_deref()),
            bus,
            label,
            _payload: PhantomData,
        }
    }

    /// Replace the human-readable label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Register a listener.
    pub fn on<H: Handler<T>>(&self, handler: H) -> ListenerHandle<String> {
        self.bus.on(self.key.as_str(), handler)
    }

    /// Register a listener that runs at most once.
    pub fn once<H: Handler<T>>(&self, handler: H) -> ListenerHandle<String> {
        self.bus.once(self.key.as_str(), handler)
    }

    /// Register a listener that ends delivery after it runs.
    pub fn unique<H: Handler<T>>(&self, handler: H) -> ListenerHandle<String> {
        self.bus.on_unique(self.key.as_str(), handler)
    }

    /// Register a stack listener.
    pub fn stack<H: Handler<T>>(&self, handler: H) -> ListenerHandle<String> {
        self.bus.on_stack(self.key.as_str(), handler)
    }

    /// Remove a listener registered from `callback`.
    pub fn off(&self, callback: &Callback<T>) {
        self.bus.off(self.key.as_str(), callback);
    }

    /// Deliver `data` to the listeners.
    ///
    /// Lazy like [`EventBus::emit`]: await or detach the returned
    /// [`Emission`], or call `emit_detached`.
    pub fn emit(&self, data: T) -> Emission {
        self.bus.emit(self.key.as_str(), data)
    }

    /// Deliver `data` without waiting. See [`Emission::detach`].
    pub fn emit_detached(&self, data: T) {
        self.bus.emit_detached(self.key.as_str(), data);
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The bus key, including the suffix if one was generated.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The bus this channel delivers through.
    pub fn bus(&self) -> &EventBus<String> {
        &self.bus
    }
}

impl<T> Clone for StaticChannel<T> {
    fn clone(&self) -> Self {
        Self {
            bus: self.bus.clone(),
            key: self.key.clone(),
            label: self.label.clone(),
            _payload: PhantomData,
        }
    }
}

impl<T> fmt::Display for StaticChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StaticChannel(\"{}\")[{}]", self.label, self.key)
    }
}

impl<T> fmt::Debug for StaticChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticChannel")
            .field("label", &self.label)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
