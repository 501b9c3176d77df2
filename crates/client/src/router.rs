//! Inbound message dispatch.
//!
//! One decoded message in, the next session state plus outward effects out.
//! The router mutates the session it is handed and returns the events the
//! collaborators should see; it never captures state in closures and never
//! sends anything itself.

use wordsplat_domain::GameSession;
use wordsplat_protocol::{Decoded, ServerMessage};

use crate::events::SessionEvent;

/// Dispatch one inbound message. Unknown tags and invalid payloads change
/// nothing; round-lifecycle handlers reset state in dependency order
/// (board, clock, submission guard, then the UI notification).
pub fn route(session: &mut GameSession, decoded: Decoded) -> Vec<SessionEvent> {
    let message = match decoded {
        Decoded::Known(message) => message,
        Decoded::Unknown { .. } => return Vec::new(),
    };

    match message {
        ServerMessage::Identity(payload) => {
            session.assign_identity(payload.id.clone(), payload.name.clone());
            vec![SessionEvent::IdentityAssigned {
                id: payload.id,
                name: payload.name,
                locale: payload.locale,
            }]
        }

        ServerMessage::RoundStarted(payload) => match payload.round_setup() {
            Ok(setup) => {
                let (round_id, slot_count) = (setup.round_id.clone(), setup.slot_count);
                let (time_left, time_total) = (setup.time_left, setup.time_total);
                session.start_round(setup);
                tracing::info!(round_id = %round_id, slot_count, time_left, "round started");
                vec![
                    SessionEvent::RoundStarted {
                        round_id,
                        slot_count,
                        time_left,
                        time_total,
                    },
                    SessionEvent::ClockUpdated {
                        remaining: time_left,
                        total: time_total,
                    },
                ]
            }
            Err(error) => {
                tracing::warn!(%error, "dropping round_started with invalid rack");
                Vec::new()
            }
        },

        ServerMessage::Timer(payload) => {
            session.sync_clock(payload.time_left);
            vec![SessionEvent::ClockUpdated {
                remaining: session.clock().remaining(),
                total: session.clock().total(),
            }]
        }

        ServerMessage::Play { sender, payload } => {
            let mut events = Vec::new();
            let ours = sender
                .as_deref()
                .is_some_and(|sender| session.is_local_player(sender));
            if ours {
                session.confirm_submission();
                events.push(SessionEvent::PlayAccepted {
                    word: payload.word.clone(),
                    score: payload.score,
                });
            }
            events.push(SessionEvent::PlayPosted {
                sender,
                player_name: payload.player_name,
                word: payload.word,
                score: payload.score,
            });
            events
        }

        ServerMessage::RoundEnded(payload) => {
            session.lock_round();
            tracing::info!(results = payload.results.len(), "round ended");
            vec![SessionEvent::RoundOver(payload)]
        }

        ServerMessage::Chat { sender, payload } => vec![SessionEvent::ChatReceived {
            sender,
            sender_name: payload.sender_name,
            text: payload.text,
        }],

        ServerMessage::Error { message } => {
            // Transient feedback only; the board and clock are untouched.
            // An in-flight submission reopens so the player can retry a
            // rejected word.
            if session.reopen_input() {
                tracing::info!("server rejected our play; input reopened");
            }
            vec![SessionEvent::Feedback { message }]
        }
    }
}
