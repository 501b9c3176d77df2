//! Event stream for external collaborators.
//!
//! Push-based subscription: the UI, audio, play-feed, and chat collaborators
//! register callbacks that are invoked as the engine processes events. All
//! notifications are fire-and-forget; none returns a value to the engine.

use std::sync::Arc;

use tokio::sync::Mutex;

use wordsplat_domain::{Cue, TileId};
use wordsplat_protocol::RoundEndedPayload;

use crate::connection::ConnectionState;

/// One discrete notification out of the session engine.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    ConnectionChanged(ConnectionState),
    IdentityAssigned {
        id: String,
        name: String,
        locale: Option<String>,
    },
    RoundStarted {
        round_id: String,
        slot_count: usize,
        time_left: u32,
        time_total: u32,
    },
    ClockUpdated {
        remaining: u32,
        total: u32,
    },
    TilePlaced {
        slot: usize,
    },
    /// A wildcard tile needs a letter before its slot fills; `proposed` is
    /// set when the wildcard was reached through the keyboard.
    WildcardChoiceRequested {
        tile: TileId,
        slot: usize,
        proposed: Option<char>,
    },
    SlotReturned {
        slot: usize,
    },
    GuessCleared,
    RackShuffled,
    /// A typed letter had no matching tile (buzzer).
    InputRejected,
    /// The guess first reached a notable length this round.
    WordMilestone {
        occupied: usize,
    },
    /// A play message left this client.
    SubmissionSent {
        word: String,
        auto: bool,
    },
    /// The server echoed our own play; the round lock is confirmed.
    PlayAccepted {
        word: String,
        score: Option<i64>,
    },
    /// Any player's play, for the play-feed collaborator. A later play by
    /// the same sender replaces their earlier entry.
    PlayPosted {
        sender: Option<String>,
        player_name: Option<String>,
        word: String,
        score: Option<i64>,
    },
    RoundOver(RoundEndedPayload),
    ChatReceived {
        sender: Option<String>,
        sender_name: Option<String>,
        text: String,
    },
    /// Transient user-facing feedback text (server-reported faults).
    Feedback {
        message: String,
    },
}

impl From<Cue> for SessionEvent {
    fn from(cue: Cue) -> Self {
        match cue {
            Cue::Placed { slot } => SessionEvent::TilePlaced { slot },
            Cue::WildcardPrompt {
                tile,
                slot,
                proposed,
            } => SessionEvent::WildcardChoiceRequested {
                tile,
                slot,
                proposed,
            },
            Cue::Returned { slot } => SessionEvent::SlotReturned { slot },
            Cue::Cleared => SessionEvent::GuessCleared,
            Cue::Shuffled => SessionEvent::RackShuffled,
            Cue::Rejected => SessionEvent::InputRejected,
            Cue::Milestone { occupied } => SessionEvent::WordMilestone { occupied },
        }
    }
}

/// Event bus for session events.
///
/// Push-based: subscribers register callbacks invoked for every event. The
/// bus holds strong references to subscribers until cleared or dropped.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Box<dyn FnMut(SessionEvent) + Send + 'static>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to all events.
    pub async fn subscribe(&self, callback: impl FnMut(SessionEvent) + Send + 'static) {
        self.subscribers.lock().await.push(Box::new(callback));
    }

    /// Dispatch an event to all subscribers, in subscription order.
    pub async fn dispatch(&self, event: SessionEvent) {
        let mut subscribers = self.subscribers.lock().await;
        for subscriber in subscribers.iter_mut() {
            subscriber(event.clone());
        }
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    pub async fn clear(&self) {
        self.subscribers.lock().await.clear();
    }
}
