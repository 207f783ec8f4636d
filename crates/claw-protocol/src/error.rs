//! Protocol error types

use thiserror::Error;

/// Errors that can occur while encoding or decoding gateway messages
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Failed to encode an outbound message
    #[error("Failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),

    /// Failed to decode an inbound payload
    #[error("Failed to decode payload: {0}")]
    Decode(#[source] serde_json::Error),
}
