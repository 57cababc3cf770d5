//! Distinguishable error type definition

use thiserror::Error;

/// The category of a [WireError], for callers that only need to decide how to react.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedInput,
    TruncatedInput,
    InvalidArgument,
}

/// An error produced while encoding, decoding or modifying a message.
///
/// Decode errors abort the whole decode of the containing message. The message being decoded into
/// is left as it was.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WireError {
    /// The bytes do not parse as a valid entry (bad wire type, bad varint, invalid UTF-8, ...)
    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },
    /// A varint or a declared payload length runs past the end of the buffer
    #[error("Truncated input: needed {needed} bytes, but only {remaining} are left")]
    TruncatedInput { needed: usize, remaining: usize },
    /// A value handed to a setter or serializer violates its contract
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

impl WireError {
    pub fn malformed(reason: impl ToString) -> Self {
        Self::MalformedInput {
            reason: reason.to_string(),
        }
    }

    pub fn truncated(needed: usize, remaining: usize) -> Self {
        Self::TruncatedInput { needed, remaining }
    }

    pub fn invalid_argument(reason: impl ToString) -> Self {
        Self::InvalidArgument {
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedInput { .. } => ErrorKind::MalformedInput,
            Self::TruncatedInput { .. } => ErrorKind::TruncatedInput,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
        }
    }
}
