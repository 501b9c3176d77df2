//! The game-session aggregate.
//!
//! `GameSession` owns the board, the round clock, and the submission guard,
//! and enforces the round lock across all of them: once a submission is in
//! flight or confirmed, no player input mutates the board until the next
//! round start. Handlers here are synchronous and run to completion; the
//! client's event loop serializes access.

use crate::board::{GameBoard, PlaceOutcome};
use crate::clock::RoundClock;
use crate::scoring::LetterScoring;
use crate::tile::{TileFace, TileId};

/// Submission guard states. `Locked` is terminal until the next round start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    /// No submission sent this round; input is open.
    Unlocked,
    /// A play was sent and not yet echoed back. Input stays blocked, which
    /// is what makes at-most-once hold even if the ack never arrives.
    AwaitingAck,
    /// The server confirmed our play, or the round ended.
    Locked,
}

/// Everything needed to begin a round, already parsed off the wire.
#[derive(Debug, Clone)]
pub struct RoundSetup {
    pub round_id: String,
    pub faces: Vec<TileFace>,
    pub slot_count: usize,
    pub time_left: u32,
    pub time_total: u32,
    pub scoring: LetterScoring,
}

/// Discrete notification for the UI/audio collaborators, produced by player
/// input handlers. Fire-and-forget; carries no game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// A tile landed in a slot (placement sound).
    Placed { slot: usize },
    /// A wildcard needs a letter; `proposed` is pre-filled when the wildcard
    /// was reached through the keyboard.
    WildcardPrompt {
        tile: TileId,
        slot: usize,
        proposed: Option<char>,
    },
    Returned { slot: usize },
    Cleared,
    Shuffled,
    /// No tile matched a typed letter (buzzer sound).
    Rejected,
    /// The guess first reached a notable length this round.
    Milestone { occupied: usize },
}

/// Word length that earns the first milestone cue; the second fires at the
/// full slot count (the all-tiles bonus).
const MILESTONE_LENGTH: usize = 5;

#[derive(Debug, Default, Clone)]
pub struct GameSession {
    board: GameBoard,
    clock: RoundClock,
    round_id: Option<String>,
    scoring: LetterScoring,
    submit: Option<SubmitState>,
    auto_fired: bool,
    peak_occupied: usize,
    player_id: Option<String>,
    display_name: Option<String>,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- round lifecycle -------------------------------------------------

    /// Reset for a new round: inventory and guess, then clock, then the
    /// submission guard and auto-submit latch.
    pub fn start_round(&mut self, setup: RoundSetup) {
        self.board.reset(setup.faces, setup.slot_count);
        self.clock.start(setup.time_left, setup.time_total);
        self.scoring = setup.scoring;
        self.round_id = Some(setup.round_id);
        self.submit = Some(SubmitState::Unlocked);
        self.auto_fired = false;
        self.peak_occupied = 0;
    }

    pub fn assign_identity(&mut self, id: String, name: String) {
        self.player_id = Some(id);
        self.display_name = Some(name);
    }

    pub fn is_local_player(&self, sender: &str) -> bool {
        self.player_id.as_deref() == Some(sender)
    }

    // ---- guards ----------------------------------------------------------

    pub fn submit_state(&self) -> SubmitState {
        self.submit.unwrap_or(SubmitState::Locked)
    }

    /// Locked covers both the in-flight and confirmed states: neither may
    /// mutate the guess.
    pub fn is_locked(&self) -> bool {
        !matches!(self.submit, Some(SubmitState::Unlocked))
    }

    fn can_mutate(&self) -> bool {
        !self.is_locked() && !self.clock.is_expired()
    }

    // ---- player input ----------------------------------------------------

    pub fn place(&mut self, tile: TileId) -> Vec<Cue> {
        if !self.can_mutate() {
            return Vec::new();
        }
        match self.board.place(tile) {
            PlaceOutcome::Placed { slot } => self.placed_cues(slot),
            PlaceOutcome::NeedsLetter { slot, tile } => vec![Cue::WildcardPrompt {
                tile,
                slot,
                proposed: None,
            }],
            PlaceOutcome::Rejected => Vec::new(),
        }
    }

    /// Keyboard resolution, in priority order: exact unused letter match,
    /// else an unused wildcard seeded with the typed letter, else a buzz.
    pub fn type_letter(&mut self, typed: char) -> Vec<Cue> {
        if !self.can_mutate() || !typed.is_ascii_alphabetic() {
            return Vec::new();
        }
        if let Some(tile) = self.board.find_unused_letter(typed) {
            return match self.board.place(tile) {
                PlaceOutcome::Placed { slot } => self.placed_cues(slot),
                _ => Vec::new(),
            };
        }
        if let Some(tile) = self.board.find_unused_wildcard() {
            return match self.board.place(tile) {
                PlaceOutcome::NeedsLetter { slot, tile } => vec![Cue::WildcardPrompt {
                    tile,
                    slot,
                    proposed: Some(typed.to_ascii_uppercase()),
                }],
                _ => Vec::new(),
            };
        }
        vec![Cue::Rejected]
    }

    pub fn resolve_wildcard(&mut self, tile: TileId, chosen: char) -> Vec<Cue> {
        if !self.can_mutate() {
            return Vec::new();
        }
        match self.board.resolve_wildcard(tile, chosen) {
            Ok(Some(slot)) => self.placed_cues(slot),
            Ok(None) | Err(_) => Vec::new(),
        }
    }

    /// Cancel a pending wildcard choice. Allowed even at clock zero so a
    /// stray modal never outlives the round's playable window.
    pub fn cancel_wildcard(&mut self) -> Vec<Cue> {
        if self.is_locked() {
            return Vec::new();
        }
        if self.board.cancel_wildcard() {
            vec![Cue::Cleared]
        } else {
            Vec::new()
        }
    }

    pub fn return_to_rack(&mut self, slot: Option<usize>) -> Vec<Cue> {
        if !self.can_mutate() {
            return Vec::new();
        }
        match self.board.return_to_rack(slot) {
            Some(slot) => vec![Cue::Returned { slot }],
            None => Vec::new(),
        }
    }

    pub fn clear(&mut self) -> Vec<Cue> {
        if !self.can_mutate() {
            return Vec::new();
        }
        if self.board.clear() > 0 {
            vec![Cue::Cleared]
        } else {
            Vec::new()
        }
    }

    /// Shuffle display positions. Presentation-only, so it is allowed while
    /// unlocked regardless of what has been placed.
    pub fn shuffle(&mut self, rng: impl FnMut(usize) -> usize) -> Vec<Cue> {
        if !self.can_mutate() {
            return Vec::new();
        }
        self.board.shuffle(rng);
        vec![Cue::Shuffled]
    }

    fn placed_cues(&mut self, slot: usize) -> Vec<Cue> {
        let mut cues = vec![Cue::Placed { slot }];
        let occupied = self.board.occupied_count();
        let full = self.board.slot_count();
        if occupied >= MILESTONE_LENGTH && self.peak_occupied < MILESTONE_LENGTH {
            cues.push(Cue::Milestone { occupied });
        }
        if occupied == full && full > MILESTONE_LENGTH && self.peak_occupied < full {
            cues.push(Cue::Milestone { occupied });
        }
        self.peak_occupied = self.peak_occupied.max(occupied);
        cues
    }

    // ---- clock -----------------------------------------------------------

    pub fn tick_clock(&mut self) -> u32 {
        self.clock.tick()
    }

    pub fn sync_clock(&mut self, remaining: u32) {
        self.clock.sync(remaining);
    }

    pub fn clock(&self) -> &RoundClock {
        &self.clock
    }

    // ---- submission guard ------------------------------------------------

    /// The word as it would be submitted right now.
    pub fn current_word(&self) -> String {
        self.board.word().trim().to_string()
    }

    /// Manual submission: the assembled word, if a send is permitted. The
    /// caller sends it (connection permitting) and then calls
    /// [`mark_submitted`](Self::mark_submitted); the guard never locks on
    /// its own, since the lock is confirmed by the server's echo.
    pub fn prepare_submission(&self) -> Option<String> {
        if self.is_locked() {
            return None;
        }
        let word = self.current_word();
        (!word.is_empty()).then_some(word)
    }

    /// Auto-submit latch: fires at most once per round, on the first
    /// clock-zero observation with an unlocked guard and a non-empty guess.
    /// Redundant zero observations are absorbed by the latch.
    pub fn observe_expiry(&mut self) -> Option<String> {
        if !self.clock.is_expired() || self.auto_fired || self.is_locked() {
            return None;
        }
        if self.board.occupied_count() == 0 {
            return None;
        }
        self.auto_fired = true;
        self.prepare_submission()
    }

    /// A play message left the client: input closes until the server
    /// confirms (or reopens) it.
    pub fn mark_submitted(&mut self) {
        if matches!(self.submit, Some(SubmitState::Unlocked)) {
            self.submit = Some(SubmitState::AwaitingAck);
        }
    }

    /// The server echoed our play: the lock is confirmed.
    pub fn confirm_submission(&mut self) {
        if self.submit.is_some() {
            self.submit = Some(SubmitState::Locked);
        }
    }

    /// Round over: terminal lock until the next round start.
    pub fn lock_round(&mut self) {
        if self.submit.is_some() {
            self.submit = Some(SubmitState::Locked);
        }
    }

    /// A server error arrived while our play was in flight (e.g. the word
    /// was rejected): reopen input so the player can retry. The auto-submit
    /// latch stays consumed.
    pub fn reopen_input(&mut self) -> bool {
        if matches!(self.submit, Some(SubmitState::AwaitingAck)) {
            self.submit = Some(SubmitState::Unlocked);
            true
        } else {
            false
        }
    }

    // ---- views -----------------------------------------------------------

    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    pub fn round_id(&self) -> Option<&str> {
        self.round_id.as_deref()
    }

    pub fn scoring(&self) -> &LetterScoring {
        &self.scoring
    }

    pub fn player_id(&self) -> Option<&str> {
        self.player_id.as_deref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn round_active(&self) -> bool {
        self.round_id.is_some() && !self.clock.is_expired()
    }
}
