//! Error types for Herald.
//!
//! The dispatch core never fails on its own: unknown keys and unknown
//! handlers are silent no-ops. The only failures are the ones listeners
//! produce while an event is delivered, described by [`ListenerError`].

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that a single listener invocation can produce.
///
/// These are caught at the bus boundary and logged; they never reach the
/// caller of `emit`.
#[derive(Error, Debug)]
pub enum ListenerError {
    /// The listener returned an error.
    #[error("listener failed: {0}")]
    Failed(#[source] BoxError),

    /// The listener panicked.
    #[error("listener panicked: {0}")]
    Panic(String),

    /// The emitted payload does not match the type the listener accepts.
    #[error("payload type mismatch, listener expects `{expected}`")]
    PayloadMismatch {
        /// Type name the listener was registered for.
        expected: &'static str,
    },
}

impl ListenerError {
    /// Build a [`ListenerError::Panic`] from a caught panic payload.
    pub fn from_panic(panic: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = panic.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        ListenerError::Panic(message)
    }
}

impl From<BoxError> for ListenerError {
    fn from(err: BoxError) -> Self {
        ListenerError::Failed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_panic_str() {
        let err = ListenerError::from_panic(Box::new("boom"));
        assert_eq!(err.to_string(), "listener panicked: boom");
    }

    #[test]
    fn test_from_panic_string() {
        let err = ListenerError::from_panic(Box::new(String::from("bang")));
        assert!(matches!(err, ListenerError::Panic(ref m) if m == "bang"));
    }

    #[test]
    fn test_from_panic_opaque() {
        let err = ListenerError::from_panic(Box::new(42_u8));
        assert!(matches!(err, ListenerError::Panic(_)));
    }

    #[test]
    fn test_mismatch_display() {
        let err = ListenerError::PayloadMismatch { expected: "i32" };
        assert_eq!(
            err.to_string(),
            "payload type mismatch, listener expects `i32`"
        );
    }
}
