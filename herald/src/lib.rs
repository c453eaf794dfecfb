//! # herald - Typed Event Dispatch
//!
//! `herald` is a small publish/subscribe library. Listeners subscribe to a
//! key on an [`EventBus`]; emitting a payload under that key delivers it to
//! them one at a time, in registration order.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use herald::prelude::*;
//!
//! let bus = EventBus::<String>::with_options(BusOptions::new().with_sync(true));
//!
//! let handle = bus.on("greet", from_fn(|name: String| println!("hello {name}")));
//! bus.emit("greet", "world".to_string()).await;
//!
//! handle.cancel();
//! ```
//!
//! ## Delivery modes
//!
//! - [`Mode::Default`]: every listener runs.
//! - [`Mode::Unique`]: the listener runs and the emit ends there.
//! - [`Mode::Stack`]: only the last stack listener reached runs, after the
//!   others.
//!
//! ## Typed channels
//!
//! [`StaticChannel`] binds one key and one payload type; [`DynamicChannel`]
//! takes the key per call, typically from an enum (see
//! `#[derive(EventName)]` with the `macros` feature).

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use herald_core::{
    // Error types
    BoxError,
    // Handler
    Callback,
    DynHandler,
    // Message
    EventKey,
    Handler,
    HandlerId,
    // Response
    IntoOutcome,
    ListenerError,
    Message,
    // Dispatch mode
    Mode,
    Payload,
    SyncHandler,
    from_fn,
};

// Dispatch core
pub use herald_std::{
    ANONYMOUS, BusOptions, Emission, EventBus, ListenerRecord, LogRecord, Logger,
    handle::{Cancel, HandleGroup, ListenerHandle},
};

// Channels
pub use herald_std::channel::{ChannelConfig, DynamicChannel, StaticChannel};

/// Log sinks.
pub mod logging {
    pub use herald_std::logging::default_logger;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use herald_std::testing::*;
}

/// Prelude module - common imports for Herald.
///
/// # Usage
///
/// ```rust,ignore
/// use herald::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Options
        BusOptions,
        // Handlers
        Callback,
        // Channels
        ChannelConfig,
        DynamicChannel,
        // Core
        EventBus,
        HandleGroup,
        Handler,
        ListenerHandle,
        Message,
        Mode,
        StaticChannel,
        from_fn,
    };
}

#[cfg(feature = "macros")]
pub use herald_macros::{EventName, Message};
