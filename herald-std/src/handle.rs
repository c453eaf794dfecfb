//! Cancellation handles and handle groups.

use crate::bus::BusInner;
use herald_core::{EventKey, HandlerId};
use std::{fmt, sync::Weak};

/// Something that can undo a registration.
pub trait Cancel: Send + Sync {
    /// Undo the registration. Calling it again does nothing.
    fn cancel(&self);
}

/// Removes one registered handler from its bus.
///
/// The handle holds the key and the identity of the handler passed at
/// registration time. It does not keep the bus alive; once the bus is
/// dropped, cancelling does nothing.
pub struct ListenerHandle<K: EventKey> {
    bus: Weak<BusInner<K>>,
    key: K,
    id: HandlerId,
}

impl<K: EventKey> ListenerHandle<K> {
    pub(crate) fn new(bus: Weak<BusInner<K>>, key: K, id: HandlerId) -> Self {
        Self { bus, key, id }
    }

    /// Remove the first listener under the key that still holds this
    /// handler.
    pub fn cancel(&self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.remove(&self.key, self.id);
        }
    }

    /// The key the handler was registered under.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Identity of the handler this handle removes.
    pub fn handler_id(&self) -> HandlerId {
        self.id
    }
}

impl<K: EventKey> Cancel for ListenerHandle<K> {
    fn cancel(&self) {
        ListenerHandle::cancel(self);
    }
}

impl<K: EventKey> Clone for ListenerHandle<K> {
    fn clone(&self) -> Self {
        Self {
            bus: Weak::clone(&self.bus),
            key: self.key.clone(),
            id: self.id,
        }
    }
}

impl<K: EventKey> fmt::Debug for ListenerHandle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("key", &self.key.to_string())
            .field("id", &self.id)
            .finish()
    }
}

/// A batch of handles cancelled together.
///
/// # Example
///
/// ```rust,ignore
/// let mut group = HandleGroup::new();
/// group.push(bus.on("add", add));
/// group.push(bus.on("minus", minus));
///
/// group.destroy(); // both listeners removed, group is empty and reusable
/// ```
#[derive(Default)]
pub struct HandleGroup {
    handles: Vec<Box<dyn Cancel>>,
}

impl HandleGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handle and return the new number of handles.
    pub fn push<C: Cancel + 'static>(&mut self, handle: C) -> usize {
        self.handles.push(Box::new(handle));
        self.handles.len()
    }

    /// Number of handles held.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` if the group holds no handles.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Cancel every handle in insertion order and empty the group.
    pub fn destroy(&mut self) {
        for handle in std::mem::take(&mut self.handles) {
            handle.cancel();
        }
    }
}

impl<C: Cancel + 'static> Extend<C> for HandleGroup {
    fn extend<I: IntoIterator<Item = C>>(&mut self, iter: I) {
        for handle in iter {
            self.push(handle);
        }
    }
}

impl<C: Cancel + 'static> FromIterator<C> for HandleGroup {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        let mut group = Self::new();
        group.extend(iter);
        group
    }
}

impl fmt::Debug for HandleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleGroup")
            .field("len", &self.handles.len())
            .finish()
    }
}
