//! Keyboard event adapter.
//!
//! Translates raw key events into session commands. The translation is
//! suppressed entirely while a text-entry collaborator (chat box, name
//! field) holds focus, while the round lock is engaged, and at clock zero;
//! the session enforces the same gates again, so a stale command that
//! slips through is still harmless.

use wordsplat_domain::GameSession;

use crate::commands::SessionCommand;

/// A raw key event, already stripped of modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Letter(char),
    Backspace,
    Enter,
}

/// Map one key to a session command, or `None` when input is suppressed.
pub fn translate(session: &GameSession, key: Key, text_entry_focused: bool) -> Option<SessionCommand> {
    if text_entry_focused || session.is_locked() || session.clock().is_expired() {
        return None;
    }
    match key {
        Key::Letter(c) if c.is_ascii_alphabetic() => Some(SessionCommand::TypeLetter(c)),
        Key::Letter(_) => None,
        Key::Backspace => Some(SessionCommand::Backspace),
        Key::Enter => Some(SessionCommand::Submit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordsplat_domain::{LetterScoring, RoundSetup, TileFace};

    fn in_round() -> GameSession {
        let mut session = GameSession::new();
        session.start_round(RoundSetup {
            round_id: "r1".to_string(),
            faces: vec![TileFace::Letter('C'), TileFace::Letter('A')],
            slot_count: 2,
            time_left: 30,
            time_total: 30,
            scoring: LetterScoring::default(),
        });
        session
    }

    #[test]
    fn letters_backspace_and_enter_translate() {
        let session = in_round();
        assert_eq!(
            translate(&session, Key::Letter('c'), false),
            Some(SessionCommand::TypeLetter('c'))
        );
        assert_eq!(
            translate(&session, Key::Backspace, false),
            Some(SessionCommand::Backspace)
        );
        assert_eq!(
            translate(&session, Key::Enter, false),
            Some(SessionCommand::Submit)
        );
        assert_eq!(translate(&session, Key::Letter('3'), false), None);
    }

    #[test]
    fn text_entry_focus_suppresses_everything() {
        let session = in_round();
        assert_eq!(translate(&session, Key::Letter('c'), true), None);
        assert_eq!(translate(&session, Key::Enter, true), None);
    }

    #[test]
    fn lock_and_clock_zero_suppress() {
        let mut session = in_round();
        session.mark_submitted();
        assert_eq!(translate(&session, Key::Letter('c'), false), None);

        let mut session = in_round();
        session.sync_clock(0);
        assert_eq!(translate(&session, Key::Enter, false), None);
    }

    #[test]
    fn no_round_is_suppressed() {
        let session = GameSession::new();
        assert_eq!(translate(&session, Key::Letter('c'), false), None);
    }
}
