//! Derive macros for Herald.
//!
//! - `#[derive(Message)]`: implements `herald::Message`
//! - `#[derive(EventName)]`: maps the variants of a fieldless enum to
//!   event keys, for use with `DynamicChannel`

use proc_macro::TokenStream;

mod event_name;
mod message;

/// Derive macro for implementing the `Message` trait.
///
/// The crate path defaults to `::herald`; override it with
/// `#[message(crate = "path")]` when depending on `herald-core` directly.
#[proc_macro_derive(Message, attributes(message))]
pub fn derive_message(input: TokenStream) -> TokenStream {
    message::derive_message_impl(input)
}

/// Derive macro implementing `AsRef<str>` and `Display` for a fieldless
/// enum, one key per variant.
///
/// The key is the variant name unless `#[event(rename = "...")]` says
/// otherwise.
///
/// ```rust,ignore
/// #[derive(Clone, Copy, EventName)]
/// enum Counter {
///     #[event(rename = "plus")]
///     Plus,
///     Minus,
/// }
///
/// assert_eq!(Counter::Plus.as_ref(), "plus");
/// assert_eq!(Counter::Minus.as_ref(), "Minus");
/// ```
#[proc_macro_derive(EventName, attributes(event))]
pub fn derive_event_name(input: TokenStream) -> TokenStream {
    event_name::derive_event_name_impl(input)
}
