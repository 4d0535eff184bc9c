//! Error types for the server.

use thiserror::Error;

/// Errors raised while reading or writing framed messages.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying stream failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A complete frame arrived but its body is not a JSON-RPC message.
    #[error("malformed message body: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors raised by request and notification handlers.
///
/// Only the dispatch boundary turns these into wire errors; handlers never
/// build error responses themselves.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The `params` member did not match the method's expected shape.
    #[error("invalid params for {method}: {source}")]
    InvalidParams {
        /// The method whose params failed to decode.
        method: String,
        /// The decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// A handler result could not be serialized.
    #[error("failed to serialize result: {0}")]
    Serialize(#[source] serde_json::Error),
}
