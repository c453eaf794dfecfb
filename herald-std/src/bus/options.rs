//! Bus configuration and log records.

use herald_core::Mode;
use std::{fmt, sync::Arc};

/// A log sink receiving a structured record and, for emits, the payload.
pub type Logger = Arc<dyn Fn(&LogRecord, Option<&dyn fmt::Debug>) + Send + Sync>;

/// Structured description of a bus operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    /// A listener was registered.
    On {
        /// Event key, rendered with `Display`.
        key: String,
        /// Mode the listener was registered with.
        mode: Mode,
    },
    /// A listener was removed.
    Off {
        /// Event key, rendered with `Display`.
        key: String,
    },
    /// An event was emitted.
    Emit {
        /// Event key, rendered with `Display`.
        key: String,
    },
}

impl LogRecord {
    /// `"on"`, `"off"` or `"emit"`.
    pub fn action(&self) -> &'static str {
        match self {
            LogRecord::On { .. } => "on",
            LogRecord::Off { .. } => "off",
            LogRecord::Emit { .. } => "emit",
        }
    }

    /// The event key.
    pub fn key(&self) -> &str {
        match self {
            LogRecord::On { key, .. } | LogRecord::Off { key } | LogRecord::Emit { key } => key,
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogRecord::On { key, mode } => write!(f, "on {key} ({mode})"),
            other => write!(f, "{} {}", other.action(), other.key()),
        }
    }
}

/// Options recognized by [`EventBus::with_options`](crate::EventBus::with_options).
///
/// # Example
///
/// ```rust,ignore
/// let bus = EventBus::<String>::with_options(
///     BusOptions::new()
///         .with_sync(true)
///         .with_log(true),
/// );
/// ```
#[derive(Clone, Default)]
pub struct BusOptions {
    /// Invoke listeners in the emitting turn instead of after a yield.
    pub sync: bool,
    /// Emit log records on `on`, `off` and `emit`.
    pub log: bool,
    /// Replaces the default log sink.
    pub logger: Option<Logger>,
}

impl BusOptions {
    /// Deferred delivery, logging disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delivery timing.
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Enable or disable log records.
    pub fn with_log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    /// Install a custom log sink.
    pub fn with_logger<F>(mut self, logger: F) -> Self
    where
        F: Fn(&LogRecord, Option<&dyn fmt::Debug>) + Send + Sync + 'static,
    {
        self.logger = Some(Arc::new(logger));
        self
    }
}

impl fmt::Debug for BusOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusOptions")
            .field("sync", &self.sync)
            .field("log", &self.log)
            .field("logger", &self.logger.as_ref().map(|_| "custom"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = BusOptions::new();
        assert!(!options.sync);
        assert!(!options.log);
        assert!(options.logger.is_none());
    }

    #[test]
    fn test_builder() {
        let options = BusOptions::new()
            .with_sync(true)
            .with_log(true)
            .with_logger(|_, _| {});
        assert!(options.sync && options.log);
        assert!(options.logger.is_some());
    }

    #[test]
    fn test_record_accessors() {
        let on = LogRecord::On {
            key: "add".into(),
            mode: Mode::Stack,
        };
        assert_eq!(on.action(), "on");
        assert_eq!(on.key(), "add");
        assert_eq!(on.to_string(), "on add (STACK)");

        let emit = LogRecord::Emit { key: "add".into() };
        assert_eq!(emit.to_string(), "emit add");
    }
}
