//! # Handler Layer
//!
//! Wraps user-defined functions so the bus can call them uniformly.
//!
//! # Usage Patterns
//!
//! 1. **Async closure**: `|delta: i32| async move { ... }`
//! 2. **Sync closure**: `from_fn(|delta: i32| { ... })`
//! 3. **Struct implementation**: `impl Handler<MyEvent> for MyHandler`
//! 4. **Shared callback**: [`Callback::new`] when the same handler must later be
//!    removed by identity with `off`.

use crate::{error::BoxError, message::Message, response::IntoOutcome};
use std::{
    any::Any,
    fmt,
    future::Future,
    marker::PhantomData,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

/// A listener callback receiving an owned payload.
///
/// Each listener gets its own clone of the emitted payload and performs
/// async business logic with it. The output is converted with
/// [`IntoOutcome`]; an `Err` is logged by the bus and never propagated.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle payloads of type `{In}`",
    label = "missing `Handler<{In}>` implementation",
    note = "Closures must look like `|payload: {In}| async move {{ ... }}`; wrap synchronous closures with `from_fn`."
)]
pub trait Handler<In: Message>: Send + Sync + 'static {
    /// The output of the handler, usually `()` or a `Result`.
    type Output: IntoOutcome;

    /// Executes the handler logic.
    fn call(&self, input: In) -> impl Future<Output = Self::Output> + Send;
}

// Blanket impl for async closures
impl<F, In, Out, Fut> Handler<In> for F
where
    In: Message,
    Out: IntoOutcome,
    F: Fn(In) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Out> + Send,
{
    type Output = Out;

    fn call(&self, input: In) -> impl Future<Output = Self::Output> + Send {
        (self)(input)
    }
}

/// Dynamic object-safe version of [`Handler`].
pub trait DynHandler<In>: Send + Sync + 'static {
    /// Calls the handler and converts its output into an outcome.
    fn call_dyn<'a>(
        &'a self,
        input: In,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>>;
}

impl<In: Message, T: Handler<In>> DynHandler<In> for T {
    fn call_dyn<'a>(
        &'a self,
        input: In,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>> {
        Box::pin(async move { self.call(input).await.into_outcome() })
    }
}

/// A handler built from a synchronous closure.
///
/// Created by [`from_fn`]. The closure runs when the bus invokes the
/// handler, with no suspension point of its own.
pub struct SyncHandler<F> {
    f: F,
}

/// Wraps a synchronous closure into a [`Handler`].
///
/// ```rust,ignore
/// bus.on("add", from_fn(move |delta: i64| {
///     counter.fetch_add(delta, Ordering::SeqCst);
/// }));
/// ```
pub fn from_fn<F>(f: F) -> SyncHandler<F> {
    SyncHandler { f }
}

impl<F, In, Out> Handler<In> for SyncHandler<F>
where
    In: Message,
    Out: IntoOutcome + Send,
    F: Fn(In) -> Out + Send + Sync + 'static,
{
    type Output = Out;

    fn call(&self, input: In) -> impl Future<Output = Self::Output> + Send {
        std::future::ready((self.f)(input))
    }
}

/// Identity of a registered handler.
///
/// Two registrations share an id exactly when they were made from the same
/// [`Callback`] (or clones of it). Ids are never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

impl HandlerId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        HandlerId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler#{:x}", self.0)
    }
}

/// A shared, identity-carrying handler.
///
/// Registering a handler through the bus wraps it in a fresh `Callback`.
/// Keep your own `Callback` when you need to remove that exact handler
/// later:
///
/// ```rust,ignore
/// let cb = Callback::new(from_fn(|n: i32| println!("{n}")));
/// bus.on("tick", cb.clone());
/// bus.off("tick", &cb);
/// ```
pub struct Callback<P> {
    id: HandlerId,
    inner: Arc<dyn DynHandler<P>>,
    _payload: PhantomData<fn(P)>,
}

impl<P: Message> Callback<P> {
    /// Wrap a handler, allocating a new identity.
    ///
    /// Passing a `Callback` (or a clone) returns it unchanged, so its
    /// identity is kept.
    pub fn new<H: Handler<P>>(handler: H) -> Self {
        if let Some(existing) = (&handler as &dyn Any).downcast_ref::<Self>() {
            return existing.clone();
        }
        Self {
            id: HandlerId::next(),
            inner: Arc::new(handler),
            _payload: PhantomData,
        }
    }

    /// The identity used for removal.
    pub fn id(&self) -> HandlerId {
        self.id
    }

    /// Returns `true` if both callbacks share one identity.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl<P> Clone for Callback<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            _payload: PhantomData,
        }
    }
}

impl<P> fmt::Debug for Callback<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("id", &self.id)
            .field("payload", &std::any::type_name::<P>())
            .finish_non_exhaustive()
    }
}

impl<P: Message> Handler<P> for Callback<P> {
    type Output = Result<(), BoxError>;

    fn call(&self, input: P) -> impl Future<Output = Self::Output> + Send {
        self.inner.call_dyn(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn block_on<F: Future>(fut: F) -> F::Output {
        // Every handler in these tests resolves without suspending.
        let waker = std::task::Waker::noop();
        let mut cx = std::task::Context::from_waker(waker);
        let mut fut = std::pin::pin!(fut);
        match fut.as_mut().poll(&mut cx) {
            std::task::Poll::Ready(out) => out,
            std::task::Poll::Pending => panic!("future was not ready"),
        }
    }

    #[test]
    fn test_callback_new_keeps_identity() {
        let cb = Callback::new(from_fn(|_: i32| {}));
        let again = Callback::new(cb.clone());
        assert!(cb.ptr_eq(&again));
        assert_eq!(cb.id(), again.id());
    }

    #[test]
    fn test_distinct_callbacks_differ() {
        let a = Callback::new(from_fn(|_: i32| {}));
        let b = Callback::new(from_fn(|_: i32| {}));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_id_not_reused_after_drop() {
        let first = Callback::new(from_fn(|_: i32| {}));
        let first_id = first.id();
        drop(first);
        for _ in 0..16 {
            let next = Callback::new(from_fn(|_: i32| {}));
            assert_ne!(next.id(), first_id);
        }
    }

    #[test]
    fn test_sync_handler_runs() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let handler = from_fn(move |n: usize| {
            h.fetch_add(n, Ordering::SeqCst);
        });
        block_on(handler.call(3));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_async_closure_error_outcome() {
        let handler = |n: i32| async move {
            if n < 0 { Err("negative") } else { Ok(()) }
        };
        assert!(block_on(handler.call_dyn(1_i32)).is_ok());
        assert!(block_on(handler.call_dyn(-1_i32)).is_err());
    }

    #[test]
    fn test_callback_delegates() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let cb = Callback::new(from_fn(move |_: ()| {
            h.fetch_add(1, Ordering::SeqCst);
        }));
        block_on(cb.call(())).unwrap();
        block_on(cb.clone().call(())).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
