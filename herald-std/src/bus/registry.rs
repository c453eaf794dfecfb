//! Listener registry: key → ordered listener records.

use herald_core::{Callback, Handler, HandlerId, ListenerError, Mode, Payload};
use std::{
    any::{Any, type_name},
    collections::HashMap,
    fmt,
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// Alias rendered for listeners registered without a name.
pub const ANONYMOUS: &str = "@anonymous";

/// Type-erased handler stored in the registry.
///
/// The payload arrives as `&dyn Any` and is downcast to the type the
/// handler was registered for.
pub(crate) trait ErasedHandler: Send + Sync {
    fn call_erased<'a>(
        &'a self,
        payload: &'a (dyn Any + Send + Sync),
    ) -> Pin<Box<dyn Future<Output = Result<(), ListenerError>> + Send + 'a>>;
}

struct Erased<P>(Callback<P>);

impl<P: Payload> ErasedHandler for Erased<P> {
    fn call_erased<'a>(
        &'a self,
        payload: &'a (dyn Any + Send + Sync),
    ) -> Pin<Box<dyn Future<Output = Result<(), ListenerError>> + Send + 'a>> {
        let Some(payload) = payload.downcast_ref::<P>() else {
            return Box::pin(std::future::ready(Err(ListenerError::PayloadMismatch {
                expected: type_name::<P>(),
            })));
        };
        let payload = payload.clone();
        Box::pin(async move { self.0.call(payload).await.map_err(ListenerError::Failed) })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Alias {
    Anonymous,
    Named(String),
}

/// One registered listener: alias, mode and handler.
#[derive(Clone)]
pub struct ListenerRecord {
    alias: Alias,
    mode: Mode,
    id: HandlerId,
    handler: Arc<dyn ErasedHandler>,
}

impl ListenerRecord {
    pub(crate) fn new<P: Payload>(alias: Option<&str>, mode: Mode, callback: Callback<P>) -> Self {
        Self {
            alias: alias.map_or(Alias::Anonymous, |name| Alias::Named(name.to_string())),
            mode,
            id: callback.id(),
            handler: Arc::new(Erased(callback)),
        }
    }

    /// The alias, or [`ANONYMOUS`] for unnamed listeners.
    pub fn alias(&self) -> &str {
        match &self.alias {
            Alias::Anonymous => ANONYMOUS,
            Alias::Named(name) => name,
        }
    }

    /// Returns `true` if the listener was registered without an alias.
    pub fn is_anonymous(&self) -> bool {
        self.alias == Alias::Anonymous
    }

    /// Delivery mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Identity of the stored handler.
    pub fn handler_id(&self) -> HandlerId {
        self.id
    }

    pub(crate) fn handler(&self) -> &dyn ErasedHandler {
        &*self.handler
    }
}

impl fmt::Debug for ListenerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRecord")
            .field("alias", &self.alias())
            .field("mode", &self.mode)
            .field("id", &self.id)
            .finish()
    }
}

pub(crate) struct Registry<K> {
    map: Mutex<HashMap<K, Vec<ListenerRecord>>>,
}

impl<K: herald_core::EventKey> Registry<K> {
    pub(crate) fn new() -> Self {
        Self {
            map: Mutex::new(HashMap::new()),
        }
    }

    // Never held across a handler call, so a poisoned lock still holds
    // consistent data.
    fn lock(&self) -> MutexGuard<'_, HashMap<K, Vec<ListenerRecord>>> {
        self.map.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the record with the same named alias in place, or append.
    pub(crate) fn insert(&self, key: K, record: ListenerRecord) {
        let mut map = self.lock();
        let listeners = map.entry(key).or_default();
        let existing = match &record.alias {
            Alias::Anonymous => None,
            named => listeners.iter_mut().find(|item| &item.alias == named),
        };
        match existing {
            Some(slot) => {
                slot.mode = record.mode;
                slot.id = record.id;
                slot.handler = record.handler;
            }
            None => listeners.push(record),
        }
    }

    /// Remove the first record holding `id`. Returns whether one was removed.
    pub(crate) fn remove(&self, key: &K, id: HandlerId) -> bool {
        let mut map = self.lock();
        let Some(listeners) = map.get_mut(key) else {
            return false;
        };
        match listeners.iter().position(|item| item.id == id) {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn snapshot(&self, key: &K) -> Vec<ListenerRecord> {
        self.lock().get(key).cloned().unwrap_or_default()
    }

    pub(crate) fn len(&self, key: &K) -> usize {
        self.lock().get(key).map_or(0, Vec::len)
    }

    pub(crate) fn entries(&self) -> HashMap<K, Vec<ListenerRecord>> {
        self.lock().clone()
    }
}
