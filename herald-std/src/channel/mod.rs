//! Typed channels over a string-keyed [`EventBus`].
//!
//! Channels fix the payload type and the key naming, then delegate every
//! call to their bus. They add no dispatch semantics of their own.
//!
//! - [`StaticChannel`]: one fixed key.
//! - [`DynamicChannel`]: a key per call, typically from a caller enum.
//!
//! Each channel creates a private bus unless [`ChannelConfig::with_bus`]
//! injects a shared one. On a shared bus, [`ChannelConfig::with_suffix`]
//! keeps the keys of different channel instances apart.

mod dynamic_channel;
mod static_channel;

pub use dynamic_channel::DynamicChannel;
pub use static_channel::StaticChannel;

use crate::bus::{BusOptions, EventBus};
use uuid::Uuid;

/// Construction options shared by both channel kinds.
#[derive(Debug, Clone, Default)]
pub struct ChannelConfig {
    options: BusOptions,
    bus: Option<EventBus<String>>,
    suffix: bool,
}

impl ChannelConfig {
    /// Private bus with default options, no key suffix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for the private bus. Ignored when a shared bus is injected.
    pub fn with_options(mut self, options: BusOptions) -> Self {
        self.options = options;
        self
    }

    /// Deliver through an existing bus instead of a private one.
    pub fn with_bus(mut self, bus: EventBus<String>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Append a random per-instance suffix to every key.
    pub fn with_suffix(mut self, suffix: bool) -> Self {
        self.suffix = suffix;
        self
    }

    pub(crate) fn into_parts(self) -> (EventBus<String>, Option<String>) {
        let bus = self
            .bus
            .unwrap_or_else(|| EventBus::with_options(self.options));
        let suffix = self.suffix.then(random_suffix);
        (bus, suffix)
    }
}

fn random_suffix() -> String {
    let mut suffix = Uuid::new_v4().simple().to_string();
    suffix.truncate(8);
    suffix
}

pub(crate) fn compose_key(key: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) => format!("{key}#{suffix}"),
        None => key.to_string(),
    }
}
