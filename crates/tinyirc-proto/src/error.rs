//! Error types for the protocol library.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoded line would exceed the wire limit.
    ///
    /// Raised instead of truncating so callers can reflow the content.
    #[error("message too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Encoded length including the CRLF terminator.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// Failed to parse a line into a message.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The offending line.
        string: String,
        /// Why it could not be parsed.
        #[source]
        cause: MessageParseError,
    },
}

/// Errors raised while parsing a single line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageParseError {
    /// The line was empty (or only whitespace).
    #[error("empty message")]
    EmptyMessage,

    /// The command token was neither alphabetic nor a three-digit numeric.
    #[error("invalid command at position {position}")]
    InvalidCommand {
        /// Byte offset where the command was expected.
        position: usize,
    },

    /// The prefix could not be parsed.
    #[error("invalid prefix: {0}")]
    InvalidPrefix(String),
}

impl ProtocolError {
    /// Returns the encoded length when this is a [`ProtocolError::MessageTooLong`].
    pub fn too_long(&self) -> Option<usize> {
        match self {
            Self::MessageTooLong { actual, .. } => Some(*actual),
            _ => None,
        }
    }
}
