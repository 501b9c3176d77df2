//! Protocol decode errors.
//!
//! Every variant here is recoverable: the router logs the frame and drops
//! it, the connection stays up.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame was not a valid message envelope at all.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),

    /// The tag was recognized but its payload did not have the expected
    /// shape.
    #[error("bad payload for {tag:?}: {source}")]
    BadPayload {
        tag: String,
        #[source]
        source: serde_json::Error,
    },
}
