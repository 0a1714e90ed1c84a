//! Error types for the chat relay
//!
//! A single error enum covers the whole server; what varies is the blast
//! radius, not the type. Bind and accept failures take the process down,
//! a worker's read failure ends only that connection, and a broadcast
//! send failure is logged and skipped by the registry.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Relay-level errors
#[derive(Debug, Error)]
pub enum RelayError {
    /// IO error: bind, accept, read, or write on a socket
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame payload was not valid UTF-8
    #[error("invalid UTF-8 in frame: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Outbound message does not fit the 2-byte length prefix
    #[error("frame payload too long: {0} bytes")]
    FrameTooLong(usize),
}
