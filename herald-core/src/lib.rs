//! # herald-core
//!
//! Core traits for the Herald event dispatch library.
//!
//! This crate has minimal dependencies and is meant to be imported by code
//! that defines handlers or payloads without needing the bus itself.
//!
//! # Building Blocks
//!
//! ## Payloads ([`Message`], [`Payload`])
//!
//! Anything delivered through a bus is a `Message`. Payloads are also
//! `Clone + Debug`: each listener receives its own clone, and log records
//! can show what was emitted.
//!
//! ## Handlers ([`Handler`], [`Callback`])
//!
//! A `Handler` turns a payload into an async outcome. Closures returning a
//! future implement it directly; synchronous closures go through
//! [`from_fn`]. A [`Callback`] is a shared handler with a stable identity,
//! which is what removal by reference compares.
//!
//! ## Modes ([`Mode`])
//!
//! - `Default`: delivered on every emit, in order
//! - `Unique`: delivered, then the emit stops
//! - `Stack`: only the last one reached runs, after everything else
//!
//! # Error Types
//!
//! - [`ListenerError`] - Failures of a single listener invocation
//! - [`BoxError`] - Boxed error returned by handlers

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod handler;
mod message;
mod mode;
mod response;

// Re-exports
pub use error::{BoxError, ListenerError};
pub use handler::{Callback, DynHandler, Handler, HandlerId, SyncHandler, from_fn};
pub use message::{EventKey, Message, Payload};
pub use mode::Mode;
pub use response::IntoOutcome;
