//! Emit algorithm and the awaitable returned by `emit`.

use super::registry::ListenerRecord;
use crate::logging;
use futures::FutureExt;
use herald_core::{EventKey, ListenerError, Mode, Payload};
use std::{
    fmt,
    future::Future,
    panic::AssertUnwindSafe,
    pin::Pin,
    task::{Context, Poll},
};

/// When listener calls happen relative to the emitting task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Timing {
    /// In the current poll.
    Immediate,
    /// After yielding to the scheduler once.
    Deferred,
}

impl Timing {
    pub(crate) fn from_sync(sync: bool) -> Self {
        if sync {
            Timing::Immediate
        } else {
            Timing::Deferred
        }
    }

    async fn schedule(self) {
        if self == Timing::Deferred {
            tokio::task::yield_now().await;
        }
    }
}

/// Delivers `payload` to a snapshot of listeners.
///
/// Default listeners run in order, each awaited before the next. A unique
/// listener runs and ends the emit. Stack listeners are held back; only the
/// last one reached runs, after the loop.
pub(crate) async fn deliver<K: EventKey, P: Payload>(
    key: K,
    listeners: Vec<ListenerRecord>,
    payload: P,
    timing: Timing,
) {
    let mut stacked: Option<ListenerRecord> = None;

    for listener in listeners {
        match listener.mode() {
            Mode::Default => invoke(&key, &listener, &payload, timing).await,
            Mode::Unique => {
                invoke(&key, &listener, &payload, timing).await;
                return;
            }
            Mode::Stack => stacked = Some(listener),
        }
    }

    if let Some(listener) = stacked {
        invoke(&key, &listener, &payload, timing).await;
    }
}

async fn invoke<K: EventKey, P: Payload>(
    key: &K,
    listener: &ListenerRecord,
    payload: &P,
    timing: Timing,
) {
    timing.schedule().await;

    let payload: &(dyn std::any::Any + Send + Sync) = payload;
    let outcome = AssertUnwindSafe(async { listener.handler().call_erased(payload).await })
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(ListenerError::from_panic(panic)));

    if let Err(error) = outcome {
        logging::listener_failed(key, listener, &error);
    }
}

/// The pending delivery of one emit.
///
/// Await it to wait until every applicable listener ran. Listener failures
/// are logged and never surface here. Dropping it unpolled cancels the
/// delivery; use [`Emission::detach`] to let it run on its own.
#[must_use = "an emission does nothing unless awaited or detached"]
pub struct Emission {
    inner: Option<Pin<Box<dyn Future<Output = ()> + Send>>>,
}

impl Emission {
    pub(crate) fn new<F>(delivery: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            inner: Some(Box::pin(delivery)),
        }
    }

    /// An emission with nothing to deliver.
    pub(crate) fn ready() -> Self {
        Self { inner: None }
    }

    /// Returns `true` if there is nothing left to deliver.
    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// Runs the emission without waiting for it.
    ///
    /// The emission is polled once right away, so with immediate timing
    /// synchronous listeners have run when this returns. Whatever is left
    /// is spawned onto the current tokio runtime, or driven to completion
    /// in place when there is none.
    pub fn detach(mut self) {
        let mut cx = Context::from_waker(futures::task::noop_waker_ref());
        if Pin::new(&mut self).poll(&mut cx).is_ready() {
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(self);
            }
            Err(_) => {
                logging::driving_in_place();
                futures::executor::block_on(self);
            }
        }
    }
}

impl Future for Emission {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let Some(delivery) = self.inner.as_mut() else {
            return Poll::Ready(());
        };
        match delivery.as_mut().poll(cx) {
            Poll::Ready(()) => {
                self.inner = None;
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl fmt::Debug for Emission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emission")
            .field("pending", &self.inner.is_some())
            .finish()
    }
}
