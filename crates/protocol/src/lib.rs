//! Wire message types for Gateway-Player communication.
//!
//! Outbound messages are a closed serde-tagged enum. Inbound messages are
//! decoded through an envelope so that unknown tags from newer servers are
//! ignored instead of failing the whole stream.

pub mod error;
pub mod messages;

pub use error::ProtocolError;
pub use messages::{
    decode, ChatPayload, ClientMessage, Decoded, IdentityPayload, PlayPayload, RoundEndedPayload,
    RoundResult, RoundStartedPayload, ServerMessage, TimerPayload,
};
