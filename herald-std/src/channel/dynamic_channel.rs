//! A channel taking its key per call.

use super::{ChannelConfig, compose_key};
use crate::{
    bus::{Emission, EventBus},
    handle::ListenerHandle,
};
use herald_core::{Callback, Handler, Payload};
use std::{fmt, marker::PhantomData};

/// A typed channel over a family of keys.
///
/// `K` bounds the key set; an enum implementing `AsRef<str>` restricts a
/// channel to its variants.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Copy)]
/// enum Counter { Plus, Minus }
///
/// impl AsRef<str> for Counter {
///     fn as_ref(&self) -> &str {
///         match self { Counter::Plus => "plus", Counter::Minus => "minus" }
///     }
/// }
///
/// let channel = DynamicChannel::<Counter, i64>::new("counter");
/// channel.on(Counter::Plus, from_fn(|delta: i64| { /* ... */ }));
/// channel.emit(Counter::Plus, 3).await;
/// ```
pub struct DynamicChannel<K, T> {
    bus: EventBus<String>,
    label: String,
    suffix: Option<String>,
    _marker: PhantomData<fn(K, T)>,
}

impl<K: AsRef<str>, T: Payload> DynamicChannel<K, T> {
    /// A channel on a private bus with default options.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_config(label, ChannelConfig::default())
    }

    /// A channel built from `config`.
    pub fn with_config(label: impl Into<String>, config: ChannelConfig) -> Self {
        let (bus, suffix) = config.into_parts();
        Self {
            bus,
            label: label.into(),
            suffix,
            _marker: PhantomData,
        }
    }

    /// The bus key used for `key`.
    pub fn key_for(&self, key: &K) -> String {
        compose_key(key.as_ref(), self.suffix.as_deref())
    }

    /// Register a listener.
    pub fn on<H: Handler<T>>(&self, key: K, handler: H) -> ListenerHandle<String> {
        self.bus.on(self.key_for(&key), handler)
    }

    /// Register a listener that runs at most once.
    pub fn once<H: Handler<T>>(&self, key: K, handler: H) -> ListenerHandle<String> {
        self.bus.once(self.key_for(&key), handler)
    }

    /// Register a listener that ends delivery after it runs.
    pub fn unique<H: Handler<T>>(&self, key: K, handler: H) -> ListenerHandle<String> {
        self.bus.on_unique(self.key_for(&key), handler)
    }

    /// Register a stack listener.
    pub fn stack<H: Handler<T>>(&self, key: K, handler: H) -> ListenerHandle<String> {
        self.bus.on_stack(self.key_for(&key), handler)
    }

    /// Remove a listener registered from `callback`.
    pub fn off(&self, key: K, callback: &Callback<T>) {
        self.bus.off(self.key_for(&key), callback);
    }

    /// Deliver `data` to the listeners of `key`.
    ///
    /// Lazy like [`EventBus::emit`]: await or detach the returned
    /// [`Emission`], or call `emit_detached`.
    pub fn emit(&self, key: K, data: T) -> Emission {
        self.bus.emit(self.key_for(&key), data)
    }

    /// Deliver `data` without waiting. See [`Emission::detach`].
    pub fn emit_detached(&self, key: K, data: T) {
        self.bus.emit_detached(self.key_for(&key), data);
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The bus this channel delivers through.
    pub fn bus(&self) -> &EventBus<String> {
        &self.bus
    }
}

impl<K, T> Clone for DynamicChannel<K, T> {
    fn clone(&self) -> Self {
        Self {
            bus: self.bus.clone(),
            label: self.label.clone(),
            suffix: self.suffix.clone(),
            _marker: PhantomData,
        }
    }
}

impl<K, T> fmt::Display for DynamicChannel<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DynamicChannel(\"{}\")", self.label)
    }
}

impl<K, T> fmt::Debug for DynamicChannel<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicChannel")
            .field("label", &self.label)
            .field("suffix", &self.suffix)
            .finish_non_exhaustive()
    }
}
