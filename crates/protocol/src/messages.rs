//! Gateway message types.
//!
//! Both directions use `{ type, payload }` JSON objects; broadcasts from the
//! gateway additionally carry `sender` and `timestamp` at the envelope level.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use wordsplat_domain::{DomainError, LetterScoring, RoundSetup, TileFace};

use crate::error::ProtocolError;

// =============================================================================
// Client Messages (Player -> Gateway)
// =============================================================================

/// Messages from the client to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Announce intent to join the active round. Idempotent server-side;
    /// safe to resend on every (re)connect.
    Join,
    /// Submit the round's word. Sent at most once per round.
    Play { word: String },
    /// Chat pass-through.
    Chat { text: String },
    /// Locale-selection pass-through.
    SetLanguage { language: String },
}

// =============================================================================
// Server Messages (Gateway -> Player)
// =============================================================================

/// Raw inbound envelope. `payload` stays untyped until the tag is matched so
/// unknown tags can be skipped without touching their payloads. The gateway
/// also stamps a `timestamp`; nothing client-side consumes it.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    tag: String,
    #[serde(default)]
    payload: serde_json::Value,
    #[serde(default)]
    sender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityPayload {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundStartedPayload {
    #[serde(alias = "uuid")]
    pub round_id: String,
    /// Wire letters: `"A"`..`"Z"` or `"_"` for a wildcard.
    pub rack: Vec<String>,
    /// Guess length; older gateways omit it and imply the rack length.
    #[serde(default)]
    pub slot_count: Option<usize>,
    pub time_left: u32,
    #[serde(default, alias = "time_total")]
    pub total_time: Option<u32>,
    /// Flat per-tile value or per-letter map.
    #[serde(default, alias = "letter_value", alias = "letter_values")]
    pub letter_scores: Option<LetterScoring>,
    /// Tile-frequency table, presentation-only.
    #[serde(default)]
    pub tile_counts: Option<HashMap<char, u32>>,
}

impl RoundStartedPayload {
    pub fn slots(&self) -> usize {
        self.slot_count.unwrap_or(self.rack.len())
    }

    pub fn total(&self) -> u32 {
        self.total_time.unwrap_or(self.time_left)
    }

    /// Convert into the domain round setup, validating the rack letters.
    pub fn round_setup(&self) -> Result<RoundSetup, DomainError> {
        let faces = self
            .rack
            .iter()
            .map(|raw| TileFace::from_wire(raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RoundSetup {
            round_id: self.round_id.clone(),
            faces,
            slot_count: self.slots(),
            time_left: self.time_left,
            time_total: self.total(),
            scoring: self.letter_scores.clone().unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerPayload {
    pub time_left: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayPayload {
    pub word: String,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default, alias = "playerName")]
    pub player_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub player: String,
    #[serde(default, alias = "playerName")]
    pub player_name: Option<String>,
    pub word: String,
    pub score: i64,
    /// Score adjustments, label -> delta (all-tiles bonus, dupe credits...).
    #[serde(default)]
    pub exceptions: Vec<HashMap<String, i64>>,
    /// Players whose identical word arrived later and scored zero.
    #[serde(default)]
    pub duped_by: Vec<String>,
    /// Dictionary definition, attached to the winning word only.
    #[serde(default)]
    pub definition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundEndedPayload {
    #[serde(default)]
    pub results: Vec<RoundResult>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub solo: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatPayload {
    pub text: String,
    pub sender_name: Option<String>,
}

/// Chat payloads come in two shapes: a bare string from older gateways, or
/// `{ text, senderName }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatWire {
    Full {
        text: String,
        #[serde(default, alias = "senderName")]
        sender_name: Option<String>,
    },
    Bare(String),
}

impl From<ChatWire> for ChatPayload {
    fn from(wire: ChatWire) -> Self {
        match wire {
            ChatWire::Bare(text) => ChatPayload {
                text,
                sender_name: None,
            },
            ChatWire::Full { text, sender_name } => ChatPayload { text, sender_name },
        }
    }
}

/// One decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    Identity(IdentityPayload),
    RoundStarted(RoundStartedPayload),
    Timer(TimerPayload),
    Play {
        sender: Option<String>,
        payload: PlayPayload,
    },
    RoundEnded(RoundEndedPayload),
    Chat {
        sender: Option<String>,
        payload: ChatPayload,
    },
    /// Server-reported fault; user-facing text, no game-state change.
    Error { message: String },
}

/// Decode result: known messages plus an explicit unknown-tag case so the
/// router can skip forward-compatibly.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Known(ServerMessage),
    Unknown { tag: String },
}

fn payload<T: serde::de::DeserializeOwned>(
    tag: &str,
    value: serde_json::Value,
) -> Result<T, ProtocolError> {
    serde_json::from_value(value).map_err(|source| ProtocolError::BadPayload {
        tag: tag.to_string(),
        source,
    })
}

/// Decode one inbound frame.
pub fn decode(text: &str) -> Result<Decoded, ProtocolError> {
    let envelope: Envelope =
        serde_json::from_str(text).map_err(ProtocolError::MalformedEnvelope)?;
    let Envelope {
        tag,
        payload: value,
        sender,
    } = envelope;

    let message = match tag.as_str() {
        "identity" => ServerMessage::Identity(payload(&tag, value)?),
        // `game_start`/`game_over` are the legacy tag spellings.
        "round_started" | "game_start" => ServerMessage::RoundStarted(payload(&tag, value)?),
        "timer" => ServerMessage::Timer(payload(&tag, value)?),
        "play" | "play_result" => ServerMessage::Play {
            sender,
            payload: payload(&tag, value)?,
        },
        "round_ended" | "game_over" => ServerMessage::RoundEnded(payload(&tag, value)?),
        "chat" => {
            let wire: ChatWire = payload(&tag, value)?;
            ServerMessage::Chat {
                sender,
                payload: wire.into(),
            }
        }
        "error" => {
            let message = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            ServerMessage::Error { message }
        }
        _ => {
            tracing::debug!(tag = %tag, "ignoring unknown message tag");
            return Ok(Decoded::Unknown { tag });
        }
    };
    Ok(Decoded::Known(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(text: &str) -> ServerMessage {
        match decode(text).expect("decodes") {
            Decoded::Known(msg) => msg,
            Decoded::Unknown { tag } => panic!("unexpected unknown tag {tag:?}"),
        }
    }

    #[test]
    fn outbound_messages_are_type_payload_tagged() {
        let join = serde_json::to_value(ClientMessage::Join).expect("serialize");
        assert_eq!(join, serde_json::json!({"type": "join"}));

        let play = serde_json::to_value(ClientMessage::Play {
            word: "CATs".to_string(),
        })
        .expect("serialize");
        assert_eq!(
            play,
            serde_json::json!({"type": "play", "payload": {"word": "CATs"}})
        );

        let lang = serde_json::to_value(ClientMessage::SetLanguage {
            language: "en".to_string(),
        })
        .expect("serialize");
        assert_eq!(
            lang,
            serde_json::json!({"type": "set_language", "payload": {"language": "en"}})
        );
    }

    #[test]
    fn decodes_identity() {
        let msg = known(r#"{"type":"identity","payload":{"id":"p1","name":"FunnyWizard"},"timestamp":1}"#);
        assert_eq!(
            msg,
            ServerMessage::Identity(IdentityPayload {
                id: "p1".to_string(),
                name: "FunnyWizard".to_string(),
                locale: None,
            })
        );
    }

    #[test]
    fn decodes_round_started_with_legacy_fields() {
        let msg = known(
            r#"{"type":"game_start","payload":{"uuid":"r1","rack":["C","A","T","_","R","E","X"],"time_left":30,"is_active":true,"letter_value":2}}"#,
        );
        let ServerMessage::RoundStarted(p) = msg else {
            panic!("expected round_started");
        };
        assert_eq!(p.round_id, "r1");
        assert_eq!(p.slots(), 7);
        assert_eq!(p.total(), 30);
        let setup = p.round_setup().expect("valid rack");
        assert_eq!(setup.faces[3], TileFace::Wildcard);
        assert_eq!(setup.scoring, LetterScoring::Flat(2));
    }

    #[test]
    fn decodes_round_started_with_per_letter_scoring_and_slots() {
        let msg = known(
            r#"{"type":"round_started","payload":{"round_id":"r2","rack":["Q","I"],"slot_count":8,"time_left":25,"total_time":30,"letter_scores":{"Q":10,"I":1}}}"#,
        );
        let ServerMessage::RoundStarted(p) = msg else {
            panic!("expected round_started");
        };
        assert_eq!(p.slots(), 8);
        assert_eq!(p.total(), 30);
        let setup = p.round_setup().expect("valid rack");
        assert_eq!(setup.scoring.value('Q'), 10);
    }

    #[test]
    fn round_started_with_bad_rack_is_invalid() {
        let msg = known(r##"{"type":"round_started","payload":{"round_id":"r","rack":["C","#"],"time_left":30}}"##);
        let ServerMessage::RoundStarted(p) = msg else {
            panic!("expected round_started");
        };
        assert!(p.round_setup().is_err());
    }

    #[test]
    fn decodes_play_with_envelope_sender() {
        let msg = known(
            r#"{"type":"play","payload":{"word":"CATs","score":5,"playerName":"FunnyWizard"},"sender":"p1","timestamp":9}"#,
        );
        assert_eq!(
            msg,
            ServerMessage::Play {
                sender: Some("p1".to_string()),
                payload: PlayPayload {
                    word: "CATs".to_string(),
                    score: Some(5),
                    player_name: Some("FunnyWizard".to_string()),
                },
            }
        );
    }

    #[test]
    fn decodes_round_ended_results() {
        let msg = known(
            r#"{"type":"game_over","payload":{"results":[{"player":"p1","word":"CATS","score":16,"exceptions":[{"Used all tiles!":10}],"duped_by":["p2"],"definition":"a cat"}],"summary":"p1 wins"}}"#,
        );
        let ServerMessage::RoundEnded(p) = msg else {
            panic!("expected round_ended");
        };
        assert_eq!(p.results.len(), 1);
        assert_eq!(p.results[0].duped_by, vec!["p2".to_string()]);
        assert_eq!(p.summary.as_deref(), Some("p1 wins"));
        assert!(!p.solo);
    }

    #[test]
    fn decodes_both_chat_shapes() {
        let bare = known(r#"{"type":"chat","payload":"hello","sender":"p2"}"#);
        let ServerMessage::Chat { sender, payload } = bare else {
            panic!("expected chat");
        };
        assert_eq!(sender.as_deref(), Some("p2"));
        assert_eq!(payload.text, "hello");
        assert_eq!(payload.sender_name, None);

        let full = known(
            r#"{"type":"chat","payload":{"text":"hi","senderName":"SaltyPanda"},"sender":"p3"}"#,
        );
        let ServerMessage::Chat { payload, .. } = full else {
            panic!("expected chat");
        };
        assert_eq!(payload.sender_name.as_deref(), Some("SaltyPanda"));
    }

    #[test]
    fn decodes_error_strings() {
        let msg = known(r#"{"type":"error","payload":"invalid word"}"#);
        assert_eq!(
            msg,
            ServerMessage::Error {
                message: "invalid word".to_string()
            }
        );
    }

    #[test]
    fn unknown_tags_are_skipped_not_failed() {
        let decoded = decode(r#"{"type":"matchmaking_hint","payload":{"x":1}}"#).expect("ok");
        assert_eq!(
            decoded,
            Decoded::Unknown {
                tag: "matchmaking_hint".to_string()
            }
        );
    }

    #[test]
    fn malformed_frames_and_payloads_error() {
        assert!(matches!(
            decode("not json"),
            Err(ProtocolError::MalformedEnvelope(_))
        ));
        assert!(matches!(
            decode(r#"{"type":"timer","payload":{"time_left":"soon"}}"#),
            Err(ProtocolError::BadPayload { .. })
        ));
    }
}
