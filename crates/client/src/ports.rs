//! Outbound port used by the session engine.
//!
//! The engine depends on this trait rather than the concrete WebSocket
//! client so the submission path can be exercised against a scripted
//! gateway in tests.

use wordsplat_protocol::ClientMessage;

use crate::connection::ConnectionState;
use crate::error::ClientError;

#[cfg_attr(test, mockall::automock)]
pub trait OutboundGateway: Send + Sync + 'static {
    /// Current connection state, readable synchronously.
    fn connection_state(&self) -> ConnectionState;

    /// Queue a message for the writer task. Fails when not connected;
    /// fire-and-forget otherwise.
    fn enqueue(&self, message: ClientMessage) -> Result<(), ClientError>;

    /// Tear the connection down and cancel any pending reconnect timer.
    fn shutdown(&self);
}
