//! Status lines for operation feedback.

use std::fmt;

/// Tone of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Notice,
    Failure,
}

impl StatusKind {
    fn prefix(self) -> &'static str {
        match self {
            StatusKind::Success => "Success:",
            StatusKind::Notice => "Note:",
            StatusKind::Failure => "Error:",
        }
    }
}

/// Wrapper type for displaying a one-line outcome of an operation.
#[derive(Debug, Clone)]
pub struct OperationStatus {
    pub message: String,
    pub kind: StatusKind,
}

impl OperationStatus {
    /// Create a new success status.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Success,
        }
    }

    /// Create a new informational status.
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Notice,
        }
    }

    /// Create a new failure status.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Failure,
        }
    }

    /// True unless this reports a failure.
    pub fn is_success(&self) -> bool {
        self.kind != StatusKind::Failure
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "**{}** {}", self.kind.prefix(), self.message)
    }
}
