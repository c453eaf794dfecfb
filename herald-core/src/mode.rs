//! Admission modes for registered listeners.

use std::fmt;

/// How a listener takes part in an emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Runs on every emit, in registration order.
    #[default]
    Default,
    /// Runs, then ends the emit: nothing later in the list is delivered.
    Unique,
    /// Only the last stack listener reached in an emit runs, after all others.
    Stack,
}

impl Mode {
    /// Upper-case name, as shown in log records.
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Default => "DEFAULT",
            Mode::Unique => "UNIQUE",
            Mode::Stack => "STACK",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
