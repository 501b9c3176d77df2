//! Pure game-session state for the WordSplat client.
//!
//! Everything in this crate is synchronous and IO-free: the rack/guess board,
//! the round clock, letter scoring, and the `GameSession` aggregate that ties
//! them together under the round lock. The client crate drives these types
//! from its event loop; this crate never spawns tasks or touches the wire.

pub mod board;
pub mod clock;
pub mod error;
pub mod scoring;
pub mod session;
pub mod tile;

pub use board::{GameBoard, PlaceOutcome, RackTile, Slot};
pub use clock::RoundClock;
pub use error::DomainError;
pub use scoring::LetterScoring;
pub use session::{Cue, GameSession, RoundSetup, SubmitState};
pub use tile::{Tile, TileFace, TileId, WILDCARD_MARKER};
