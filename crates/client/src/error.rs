//! Client-side error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid gateway url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Outbound sends are attempted only while the connection is open;
    /// callers treat this as "retry after reconnect", not as fatal.
    #[error("not connected to the gateway")]
    NotConnected,

    #[error("outbound queue full")]
    QueueFull,

    #[error("command bus closed")]
    BusClosed,

    #[error("websocket transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),
}
