//! Error types for dirsearch-core.

use thiserror::Error;

/// Result type for directory search operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers of the search façade.
#[derive(Debug, Error)]
pub enum Error {
    /// A required setting is missing or invalid. Carries the setting name.
    /// Raised before any connection is attempted.
    #[error("configuration error: `{0}` is missing or invalid")]
    Configuration(String),

    /// A query expression variant this build does not understand.
    #[error("unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// The directory client reported a failure other than truncation.
    #[error("search failed: {0}")]
    Search(#[from] ClientError),

    /// The worker task running the search panicked or was cancelled.
    #[error("search task did not complete: {0}")]
    Task(String),
}

/// Failures reported by a directory client implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The connection to the server could not be established.
    #[error("cannot connect to {host}:{port}: {reason}")]
    Connect {
        host: String,
        port: u16,
        reason: String,
    },

    /// The server answered with a non-success result code.
    #[error("server rejected the operation (code {code}): {message}")]
    Rejected { code: u32, message: String },

    /// Transport or decoding failure below the result-code level.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// An operation was issued before `connect` or after `disconnect`.
    #[error("client is not connected")]
    NotConnected,
}
