use std::fmt::{Display, Formatter};

/// Specifies failure categories which map to distinct process exit codes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// An unexpected failure inside the solver, treated as a bug.
    Internal,
    /// A problem definition which cannot be accepted or scheduled.
    Input,
    /// A travel cost provider failure.
    Routing,
}

/// An error type which keeps failure category and a human readable message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SolverError {
    kind: ErrorKind,
    message: String,
}

/// A type alias for result type with `SolverError`.
pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    /// Creates an input error.
    pub fn input<T: Into<String>>(message: T) -> Self {
        Self { kind: ErrorKind::Input, message: message.into() }
    }

    /// Creates a routing error.
    pub fn routing<T: Into<String>>(message: T) -> Self {
        Self { kind: ErrorKind::Routing, message: message.into() }
    }

    /// Creates an internal error.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self { kind: ErrorKind::Internal, message: message.into() }
    }

    /// Returns failure category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns a human readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for SolverError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SolverError {}

impl From<String> for SolverError {
    fn from(message: String) -> Self {
        Self { kind: ErrorKind::Internal, message }
    }
}

impl<'a> From<&'a str> for SolverError {
    fn from(message: &'a str) -> Self {
        Self { kind: ErrorKind::Internal, message: message.to_string() }
    }
}

impl From<std::io::Error> for SolverError {
    fn from(error: std::io::Error) -> Self {
        Self { kind: ErrorKind::Internal, message: error.to_string() }
    }
}
