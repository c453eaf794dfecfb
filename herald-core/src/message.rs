//! Marker traits for payloads and event keys.

use std::{fmt, hash::Hash};

/// A marker trait for values that can travel through an event bus.
///
/// Messages must be `Send + Sync + 'static` to be safe for async use.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Debug)]
/// struct UserJoined { id: u64 }
///
/// impl Message for UserJoined {}
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Message",
    label = "must be `Send + Sync + 'static`",
    note = "Implement `Message` (or `#[derive(Message)]`) for payload types."
)]
pub trait Message: Send + Sync + 'static {}

// Common Message implementations
impl Message for () {}
impl Message for bool {}
impl Message for char {}
impl Message for String {}
impl Message for &'static str {}
impl<T: Message> Message for Box<T> {}
impl<T: Message> Message for std::sync::Arc<T> {}
impl<T: Message> Message for Vec<T> {}
impl<T: Message> Message for Option<T> {}
impl<T: Message, E: Message> Message for Result<T, E> {}

macro_rules! impl_message {
    ($($ty:ty),* $(,)?) => {
        $(impl Message for $ty {})*
    };
}

impl_message!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

// Multi-argument payloads travel as tuples.
macro_rules! impl_message_tuple {
    ($($name:ident),+) => {
        impl<$($name: Message),+> Message for ($($name,)+) {}
    };
}

impl_message_tuple!(A);
impl_message_tuple!(A, B);
impl_message_tuple!(A, B, C);
impl_message_tuple!(A, B, C, D);

/// A message that can be delivered to several listeners and logged.
///
/// Every emit hands each listener its own clone of the payload.
pub trait Payload: Message + Clone + fmt::Debug {}

impl<T: Message + Clone + fmt::Debug> Payload for T {}

/// An identifier scoping a class of events within one bus.
pub trait EventKey: Eq + Hash + Clone + fmt::Display + Send + Sync + 'static {}

impl<T: Eq + Hash + Clone + fmt::Display + Send + Sync + 'static> EventKey for T {}
