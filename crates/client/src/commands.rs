//! Command bus for driving the session engine.
//!
//! The UI (and the keyboard adapter) push commands here; the engine's event
//! loop consumes them in order. Everything is fire-and-forget: this protocol
//! has no request/response correlation, the only acknowledgment is the next
//! inbound message.

use tokio::sync::mpsc;

use wordsplat_domain::TileId;

use crate::error::ClientError;

/// Player-facing operations on the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Play a tile into the first empty slot.
    Place(TileId),
    /// Keyboard resolution for one alphabetic keypress.
    TypeLetter(char),
    /// Return the last occupied slot to the rack.
    Backspace,
    /// Return a specific slot to the rack.
    ReturnSlot(usize),
    Clear,
    Shuffle,
    ResolveWildcard { tile: TileId, letter: char },
    CancelWildcard,
    Submit,
    /// Chat pass-through to the gateway.
    Chat(String),
    /// Locale-selection pass-through to the gateway.
    SetLanguage(String),
    /// Stop the engine and tear down the connection.
    Shutdown,
}

/// Cloneable sender half used by collaborators.
#[derive(Clone)]
pub struct CommandBus {
    tx: mpsc::Sender<SessionCommand>,
}

impl CommandBus {
    pub fn new(tx: mpsc::Sender<SessionCommand>) -> Self {
        Self { tx }
    }

    /// Queue a command without blocking.
    pub fn send(&self, command: SessionCommand) -> Result<(), ClientError> {
        self.tx.try_send(command).map_err(|error| match error {
            mpsc::error::TrySendError::Full(_) => ClientError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => ClientError::BusClosed,
        })
    }
}
