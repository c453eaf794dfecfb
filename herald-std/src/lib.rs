//! # herald-std
//!
//! The event bus for the Herald event dispatch library.
//!
//! This crate provides:
//! - **Dispatch core**: [`EventBus`], [`Emission`], [`BusOptions`]
//! - **Cancellation**: [`ListenerHandle`], [`HandleGroup`]
//! - **Typed channels**: [`StaticChannel`], [`DynamicChannel`]
//! - **Logging**: the default sink in [`logging`]
//! - **Test doubles**: [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use herald_core;

// Modules
pub mod bus;
pub mod channel;
pub mod handle;
pub mod logging;
pub mod testing;

pub use bus::{ANONYMOUS, BusOptions, Emission, EventBus, ListenerRecord, LogRecord, Logger};
pub use channel::{ChannelConfig, DynamicChannel, StaticChannel};
pub use handle::{Cancel, HandleGroup, ListenerHandle};
