//! Log sinks.
//!
//! Uses the `tracing` crate when the `tracing` feature is enabled (the
//! default) and falls back to plain standard output/error otherwise.

use crate::bus::{ListenerRecord, LogRecord, Logger};
use herald_core::ListenerError;
use std::{fmt::Debug, sync::Arc};

/// The sink used when no custom logger is configured.
///
/// Writes `[EventBus] <action> <key>` followed by the payload, if any.
pub fn default_logger() -> Logger {
    Arc::new(log_line)
}

fn log_line(record: &LogRecord, payload: Option<&dyn Debug>) {
    #[cfg(feature = "tracing")]
    {
        match payload {
            Some(payload) => tracing::info!(
                action = record.action(),
                key = record.key(),
                "[EventBus] {record} {payload:?}"
            ),
            None => tracing::info!(
                action = record.action(),
                key = record.key(),
                "[EventBus] {record}"
            ),
        }
    }

    #[cfg(not(feature = "tracing"))]
    {
        match payload {
            Some(payload) => println!("[EventBus] {record} {payload:?}"),
            None => println!("[EventBus] {record}"),
        }
    }
}

/// Reports a listener failure. Always on, independent of the `log` option.
pub(crate) fn listener_failed(key: &dyn std::fmt::Display, listener: &ListenerRecord, error: &ListenerError) {
    #[cfg(feature = "tracing")]
    {
        tracing::error!(
            key = %key,
            alias = listener.alias(),
            mode = %listener.mode(),
            error = %error,
            "listener failed"
        );
    }

    #[cfg(not(feature = "tracing"))]
    {
        eprintln!(
            "[EventBus] {key}: listener {} ({}) failed: {error}",
            listener.alias(),
            listener.mode()
        );
    }
}

/// Notes that a detached emission is driven in place for lack of a runtime.
pub(crate) fn driving_in_place() {
    #[cfg(feature = "tracing")]
    tracing::debug!("no tokio runtime, driving detached emission in place");
}
