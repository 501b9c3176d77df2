//! The rack and the guess as one structure.
//!
//! `GameBoard` is the single source of truth for tile ownership: an arena of
//! tile records plus a fixed-length array of word slots referencing tiles by
//! id. A tile is "used" exactly when some `Filled` slot references it, so the
//! inventory and the guess cannot disagree.

use crate::error::DomainError;
use crate::tile::{Tile, TileFace, TileId};

/// One slot of the guess row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Empty,
    /// A wildcard was played here but its letter is not chosen yet. The tile
    /// is still unused; cancelling reverts to `Empty` with no other change.
    Pending { tile: TileId },
    /// An occupied slot. `rendered` is lowercase iff the slot came from a
    /// wildcard; `source` keeps the original face.
    Filled {
        tile: TileId,
        rendered: char,
        source: TileFace,
    },
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Slot::Filled { .. })
    }

    pub fn tile_id(&self) -> Option<TileId> {
        match self {
            Slot::Empty => None,
            Slot::Pending { tile } | Slot::Filled { tile, .. } => Some(*tile),
        }
    }
}

/// Result of attempting to play a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// The tile landed in `slot`.
    Placed { slot: usize },
    /// A wildcard needs a letter choice before `slot` fills.
    NeedsLetter { slot: usize, tile: TileId },
    /// Silently ignored (tile absent/used/pending, no empty slot, or a
    /// choice is already open).
    Rejected,
}

/// Rack entry as shown to the UI, ordered by display position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RackTile {
    pub id: TileId,
    pub face: TileFace,
    pub used: bool,
    pub pending: bool,
}

#[derive(Debug, Default, Clone)]
pub struct GameBoard {
    tiles: Vec<Tile>,
    slots: Vec<Slot>,
    next_id: u32,
}

impl GameBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wholesale-replace the rack and guess at round start. Prior tiles and
    /// slots are discarded regardless of round outcome; ids keep counting up
    /// so references into the old round dangle harmlessly.
    pub fn reset(&mut self, faces: Vec<TileFace>, slot_count: usize) {
        self.tiles = faces
            .into_iter()
            .enumerate()
            .map(|(position, face)| {
                let id = TileId(self.next_id + position as u32);
                Tile { id, face, position }
            })
            .collect();
        self.next_id += self.tiles.len() as u32;
        self.slots = vec![Slot::Empty; slot_count];
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Tiles in display order with derived used/pending flags.
    pub fn rack_view(&self) -> Vec<RackTile> {
        let mut view: Vec<RackTile> = self
            .tiles
            .iter()
            .map(|t| RackTile {
                id: t.id,
                face: t.face,
                used: self.is_used(t.id),
                pending: self.is_pending(t.id),
            })
            .collect();
        view.sort_by_key(|t| self.position_of(t.id));
        view
    }

    fn position_of(&self, id: TileId) -> usize {
        self.tiles
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.position)
            .unwrap_or(usize::MAX)
    }

    /// A tile is used exactly when a filled slot references it.
    pub fn is_used(&self, id: TileId) -> bool {
        self.slots
            .iter()
            .any(|s| matches!(s, Slot::Filled { tile, .. } if *tile == id))
    }

    pub fn is_pending(&self, id: TileId) -> bool {
        self.slots
            .iter()
            .any(|s| matches!(s, Slot::Pending { tile } if *tile == id))
    }

    /// The open wildcard choice, if any: `(slot_index, tile_id)`.
    pub fn pending_choice(&self) -> Option<(usize, TileId)> {
        self.slots.iter().enumerate().find_map(|(i, s)| match s {
            Slot::Pending { tile } => Some((i, *tile)),
            _ => None,
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_filled()).count()
    }

    fn first_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(Slot::is_empty)
    }

    fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    /// Play a tile into the first empty slot (left-to-right). Wildcards do
    /// not fill the slot; they open a pending choice instead.
    pub fn place(&mut self, id: TileId) -> PlaceOutcome {
        if self.pending_choice().is_some() || self.is_used(id) {
            return PlaceOutcome::Rejected;
        }
        let Some(tile) = self.tile(id).copied() else {
            // Stale reference from a previous round; must never panic.
            return PlaceOutcome::Rejected;
        };
        let Some(slot) = self.first_empty_slot() else {
            return PlaceOutcome::Rejected;
        };

        if tile.face.is_wildcard() {
            self.slots[slot] = Slot::Pending { tile: id };
            PlaceOutcome::NeedsLetter { slot, tile: id }
        } else {
            self.slots[slot] = Slot::Filled {
                tile: id,
                rendered: tile.face.display_char(),
                source: tile.face,
            };
            PlaceOutcome::Placed { slot }
        }
    }

    /// Resolve the open wildcard choice for `id` with a concrete letter.
    /// The rendered character is lowercased: the sentinel downstream scoring
    /// and UI use to recognize a zero-value blank.
    pub fn resolve_wildcard(&mut self, id: TileId, chosen: char) -> Result<Option<usize>, DomainError> {
        if !chosen.is_ascii_alphabetic() {
            return Err(DomainError::InvalidWildcardLetter(chosen));
        }
        let Some((slot, pending)) = self.pending_choice() else {
            return Ok(None);
        };
        if pending != id {
            return Ok(None);
        }
        self.slots[slot] = Slot::Filled {
            tile: id,
            rendered: chosen.to_ascii_lowercase(),
            source: TileFace::Wildcard,
        };
        Ok(Some(slot))
    }

    /// Cancel the open wildcard choice, if any. The tile was never marked
    /// used, so this only reverts the slot.
    pub fn cancel_wildcard(&mut self) -> bool {
        match self.pending_choice() {
            Some((slot, _)) => {
                self.slots[slot] = Slot::Empty;
                true
            }
            None => false,
        }
    }

    /// Return a slot's tile to the rack. With no index, targets the last
    /// (rightmost) filled slot. No-op on empty or pending slots.
    pub fn return_to_rack(&mut self, slot: Option<usize>) -> Option<usize> {
        let target = match slot {
            Some(i) => (i < self.slots.len() && self.slots[i].is_filled()).then_some(i),
            None => self.slots.iter().rposition(Slot::is_filled),
        }?;
        self.slots[target] = Slot::Empty;
        Some(target)
    }

    /// Empty every slot in one atomic update. Also closes an open wildcard
    /// choice. Returns the number of slots that held anything.
    pub fn clear(&mut self) -> usize {
        let occupied = self.slots.iter().filter(|s| !s.is_empty()).count();
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        occupied
    }

    /// Fisher-Yates over display positions only. Letter identity, used
    /// state, and ids are untouched; `rng(bound)` must return `0..bound`.
    pub fn shuffle(&mut self, mut rng: impl FnMut(usize) -> usize) {
        let n = self.tiles.len();
        let mut positions: Vec<usize> = self.tiles.iter().map(|t| t.position).collect();
        for i in (1..n).rev() {
            let j = rng(i + 1).min(i);
            positions.swap(i, j);
        }
        for (tile, position) in self.tiles.iter_mut().zip(positions) {
            tile.position = position;
        }
    }

    /// The current word: rendered characters of filled slots in slot order.
    /// Empty and pending slots contribute nothing.
    pub fn word(&self) -> String {
        self.slots
            .iter()
            .filter_map(|s| match s {
                Slot::Filled { rendered, .. } => Some(*rendered),
                _ => None,
            })
            .collect()
    }

    /// First unused tile whose face matches the typed letter exactly.
    pub fn find_unused_letter(&self, typed: char) -> Option<TileId> {
        self.tiles
            .iter()
            .find(|t| {
                t.face.matches_letter(typed) && !self.is_used(t.id) && !self.is_pending(t.id)
            })
            .map(|t| t.id)
    }

    /// First unused wildcard tile.
    pub fn find_unused_wildcard(&self) -> Option<TileId> {
        self.tiles
            .iter()
            .find(|t| t.face.is_wildcard() && !self.is_used(t.id) && !self.is_pending(t.id))
            .map(|t| t.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn board(letters: &str, slot_count: usize) -> GameBoard {
        let faces = letters
            .chars()
            .map(|c| {
                if c == crate::tile::WILDCARD_MARKER {
                    TileFace::Wildcard
                } else {
                    TileFace::Letter(c)
                }
            })
            .collect();
        let mut b = GameBoard::new();
        b.reset(faces, slot_count);
        b
    }

    fn tile_by_letter(b: &GameBoard, c: char) -> TileId {
        b.find_unused_letter(c).expect("tile available")
    }

    #[test]
    fn place_fills_first_empty_slot_left_to_right() {
        let mut b = board("CAT_REX", 8);
        let c = tile_by_letter(&b, 'C');
        let a = tile_by_letter(&b, 'A');
        assert_eq!(b.place(c), PlaceOutcome::Placed { slot: 0 });
        assert_eq!(b.place(a), PlaceOutcome::Placed { slot: 1 });
        assert_eq!(b.word(), "CA");
    }

    #[test]
    fn placing_a_used_tile_is_a_noop() {
        let mut b = board("CAT", 3);
        let c = tile_by_letter(&b, 'C');
        assert_eq!(b.place(c), PlaceOutcome::Placed { slot: 0 });
        assert_eq!(b.place(c), PlaceOutcome::Rejected);
        assert_eq!(b.occupied_count(), 1);
    }

    #[test]
    fn stale_tile_id_from_previous_round_is_harmless() {
        let mut b = board("CAT", 3);
        let stale = tile_by_letter(&b, 'C');
        b.reset(vec![TileFace::Letter('D'), TileFace::Letter('O')], 3);
        assert_eq!(b.place(stale), PlaceOutcome::Rejected);
        assert_eq!(b.occupied_count(), 0);
    }

    #[test]
    fn placement_with_no_empty_slot_is_rejected() {
        let mut b = board("ABC", 2);
        b.place(tile_by_letter(&b, 'A'));
        b.place(tile_by_letter(&b, 'B'));
        assert_eq!(b.place(tile_by_letter(&b, 'C')), PlaceOutcome::Rejected);
    }

    #[test]
    fn wildcard_opens_pending_choice_without_state_change() {
        let mut b = board("C_T", 3);
        let w = b.find_unused_wildcard().expect("wildcard");
        let outcome = b.place(w);
        assert_eq!(outcome, PlaceOutcome::NeedsLetter { slot: 0, tile: w });
        // Slot stays logically unfilled, tile stays unused.
        assert_eq!(b.occupied_count(), 0);
        assert!(!b.is_used(w));
        assert_eq!(b.word(), "");
        // Nothing else can be placed while the choice is open.
        assert_eq!(b.place(tile_by_letter(&b, 'C')), PlaceOutcome::Rejected);
    }

    #[test]
    fn wildcard_resolution_renders_lowercase_and_marks_used() {
        let mut b = board("C_T", 3);
        let w = b.find_unused_wildcard().expect("wildcard");
        b.place(w);
        let slot = b.resolve_wildcard(w, 'S').expect("valid letter");
        assert_eq!(slot, Some(0));
        assert!(b.is_used(w));
        assert_eq!(b.word(), "s");
        match b.slots()[0] {
            Slot::Filled { rendered, source, .. } => {
                assert_eq!(rendered, 's');
                assert_eq!(source, TileFace::Wildcard);
            }
            other => panic!("expected filled slot, got {other:?}"),
        }
    }

    #[test]
    fn wildcard_cancel_leaves_tile_unused() {
        let mut b = board("C_T", 3);
        let w = b.find_unused_wildcard().expect("wildcard");
        b.place(w);
        assert!(b.cancel_wildcard());
        assert!(!b.is_used(w));
        assert_eq!(b.pending_choice(), None);
        assert!(b.slots()[0].is_empty());
        // Tile is playable again.
        assert!(matches!(b.place(w), PlaceOutcome::NeedsLetter { .. }));
    }

    #[test]
    fn resolve_rejects_non_letters() {
        let mut b = board("_", 1);
        let w = b.find_unused_wildcard().expect("wildcard");
        b.place(w);
        assert!(b.resolve_wildcard(w, '3').is_err());
        // Choice still open.
        assert!(b.pending_choice().is_some());
    }

    #[test]
    fn return_targets_last_filled_slot_by_default() {
        let mut b = board("CAT", 3);
        let c = tile_by_letter(&b, 'C');
        let a = tile_by_letter(&b, 'A');
        b.place(c);
        b.place(a);
        assert_eq!(b.return_to_rack(None), Some(1));
        assert!(!b.is_used(a));
        assert!(b.is_used(c));
        assert_eq!(b.word(), "C");
        assert_eq!(b.return_to_rack(Some(5)), None);
    }

    #[test]
    fn clear_is_atomic_and_total() {
        let mut b = board("CA_T", 4);
        b.place(tile_by_letter(&b, 'C'));
        b.place(tile_by_letter(&b, 'A'));
        let w = b.find_unused_wildcard().expect("wildcard");
        b.place(w);
        assert_eq!(b.clear(), 3);
        assert_eq!(b.occupied_count(), 0);
        assert!(b.tiles().iter().all(|t| !b.is_used(t.id)));
        assert_eq!(b.pending_choice(), None);
    }

    #[test]
    fn tile_conservation_across_mutations() {
        let mut b = board("CAT_REX", 8);
        let granted: BTreeSet<TileId> = b.tiles().iter().map(|t| t.id).collect();

        b.place(tile_by_letter(&b, 'C'));
        b.place(tile_by_letter(&b, 'A'));
        b.return_to_rack(None);
        let w = b.find_unused_wildcard().expect("wildcard");
        b.place(w);
        b.resolve_wildcard(w, 'S').expect("valid letter");
        b.place(tile_by_letter(&b, 'T'));
        b.clear();
        b.place(tile_by_letter(&b, 'E'));

        let unused: BTreeSet<TileId> = b
            .tiles()
            .iter()
            .filter(|t| !b.is_used(t.id))
            .map(|t| t.id)
            .collect();
        let used: BTreeSet<TileId> = b
            .slots()
            .iter()
            .filter(|s| s.is_filled())
            .filter_map(Slot::tile_id)
            .collect();
        assert!(unused.is_disjoint(&used));
        let union: BTreeSet<TileId> = unused.union(&used).copied().collect();
        assert_eq!(union, granted);
    }

    #[test]
    fn shuffle_permutes_positions_only() {
        let mut b = board("CAT_REX", 8);
        b.place(tile_by_letter(&b, 'C'));
        let before: BTreeSet<(TileId, char, bool)> = b
            .tiles()
            .iter()
            .map(|t| (t.id, t.face.display_char(), b.is_used(t.id)))
            .collect();
        let positions_before: BTreeSet<usize> =
            b.tiles().iter().map(|t| t.position).collect();

        // Deterministic "rng": always pick 0, a full rotation-ish permutation.
        b.shuffle(|_| 0);

        let after: BTreeSet<(TileId, char, bool)> = b
            .tiles()
            .iter()
            .map(|t| (t.id, t.face.display_char(), b.is_used(t.id)))
            .collect();
        let positions_after: BTreeSet<usize> =
            b.tiles().iter().map(|t| t.position).collect();
        assert_eq!(before, after);
        assert_eq!(positions_before, positions_after);
        assert_eq!(b.word(), "C");
    }

    #[test]
    fn keyboard_lookup_prefers_exact_match_then_wildcard() {
        let b = board("CA_", 3);
        assert!(b.find_unused_letter('a').is_some());
        assert!(b.find_unused_letter('z').is_none());
        assert!(b.find_unused_wildcard().is_some());
    }
}
