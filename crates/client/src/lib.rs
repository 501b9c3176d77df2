//! The WordSplat game-session synchronization engine.
//!
//! This crate keeps a resilient connection to the game gateway, keeps local
//! tile/word state consistent with the server-authoritative round lifecycle,
//! and guarantees a word is submitted at most once per round. Rendering,
//! audio playback, and identity flows live in external collaborators that
//! consume the [`events::SessionEvent`] stream and drive the engine through
//! the [`commands::CommandBus`].

pub mod commands;
pub mod config;
pub mod connection;
pub mod engine;
pub mod error;
pub mod events;
pub mod input;
pub mod ports;
pub mod router;

pub use commands::{CommandBus, SessionCommand};
pub use config::ClientConfig;
pub use connection::{ConnectionState, GatewayClient, PlayerIdentity};
pub use engine::{Inbound, SessionEngine};
pub use error::ClientError;
pub use events::{EventBus, SessionEvent};
pub use input::{translate, Key};
pub use ports::OutboundGateway;
pub use router::route;
