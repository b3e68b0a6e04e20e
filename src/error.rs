//! Error kinds and the records stored in the error log.

use std::fmt;
use thiserror::Error;

/// Failure kinds raised by built-in commands.
///
/// Each kind carries a fixed name, message and code. Kinds compare by value, so a
/// record can be matched against a kind regardless of where it was created.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinError {
    /// A command received fewer arguments than it requires.
    #[error("insufficient arguments were provided")]
    InsufficientArguments,

    /// An argument was present but could not be used (bad path, unknown flag).
    #[error("invalid arguments were provided")]
    InvalidArguments,

    /// An argument that must be an integer was not one.
    #[error("invalid data was provided")]
    InvalidData,

    /// Input data was incomplete.
    #[error("insufficient data was provided")]
    InsufficientData,

    /// An unrecognized selector or mode was given.
    #[error("an invalid token was provided")]
    InvalidToken,

    /// Anything else.
    #[error("an unknown error occurred")]
    Unknown,
}

impl BuiltinError {
    pub fn name(self) -> &'static str {
        match self {
            Self::InsufficientArguments => "InsufficientArguments",
            Self::InvalidArguments => "InvalidArguments",
            Self::InvalidData => "InvalidData",
            Self::InsufficientData => "InsufficientData",
            Self::InvalidToken => "InvalidToken",
            Self::Unknown => "Unknown",
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::InsufficientArguments => 1,
            Self::InvalidArguments => 2,
            Self::InvalidData => 3,
            Self::InsufficientData => 4,
            Self::InvalidToken => 5,
            Self::Unknown => 6,
        }
    }
}

/// Origin of an [`ErrorRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Raised by a built-in command.
    Standard,
    /// Raised by the user through `throw`.
    UserDefined,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("Standard Error"),
            Self::UserDefined => f.write_str("User Defined Error"),
        }
    }
}

/// A single entry of the error log. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub name: String,
    pub message: String,
    pub code: i32,
    pub kind: RecordKind,
}

impl ErrorRecord {
    /// Record created by the `throw` command.
    pub fn user_defined(name: impl Into<String>, code: i32, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            code,
            kind: RecordKind::UserDefined,
        }
    }

    /// Returns the built-in kind this record was created from, if any.
    pub fn builtin(&self) -> Option<BuiltinError> {
        if self.kind != RecordKind::Standard {
            return None;
        }
        [
            BuiltinError::InsufficientArguments,
            BuiltinError::InvalidArguments,
            BuiltinError::InvalidData,
            BuiltinError::InsufficientData,
            BuiltinError::InvalidToken,
            BuiltinError::Unknown,
        ]
        .into_iter()
        .find(|kind| kind.code() == self.code && kind.name() == self.name)
    }
}

impl From<BuiltinError> for ErrorRecord {
    fn from(err: BuiltinError) -> Self {
        Self {
            name: err.name().to_string(),
            message: err.to_string(),
            code: err.code(),
            kind: RecordKind::Standard,
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, code {}): {}", self.name, self.kind, self.code, self.message)
    }
}
