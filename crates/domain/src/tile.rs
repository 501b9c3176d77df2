//! Letter tiles and their identities.

use crate::error::DomainError;

/// Wire marker for a blank tile.
pub const WILDCARD_MARKER: char = '_';

/// Opaque tile identifier, unique across rounds within one session so stale
/// references from a just-ended round can never alias a fresh tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

/// The face of a tile as dealt: a concrete uppercase letter or a blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileFace {
    Letter(char),
    Wildcard,
}

impl TileFace {
    /// Parse a rack entry from the wire (`"A"`..`"Z"` or `"_"`).
    pub fn from_wire(raw: &str) -> Result<Self, DomainError> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(WILDCARD_MARKER), None) => Ok(TileFace::Wildcard),
            (Some(c), None) if c.is_ascii_alphabetic() => {
                Ok(TileFace::Letter(c.to_ascii_uppercase()))
            }
            _ => Err(DomainError::InvalidRackLetter(raw.to_string())),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, TileFace::Wildcard)
    }

    /// The character shown on the tile face.
    pub fn display_char(&self) -> char {
        match self {
            TileFace::Letter(c) => *c,
            TileFace::Wildcard => WILDCARD_MARKER,
        }
    }

    /// Whether a typed letter matches this face exactly (wildcards never
    /// match here; they are a separate fallback in keyboard resolution).
    pub fn matches_letter(&self, typed: char) -> bool {
        matches!(self, TileFace::Letter(c) if *c == typed.to_ascii_uppercase())
    }
}

/// One tile in the current round's rack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub face: TileFace,
    /// Display slot index within the rack; the only field `shuffle` may touch.
    pub position: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_letters_and_wildcard() {
        assert_eq!(TileFace::from_wire("A"), Ok(TileFace::Letter('A')));
        assert_eq!(TileFace::from_wire("z"), Ok(TileFace::Letter('Z')));
        assert_eq!(TileFace::from_wire("_"), Ok(TileFace::Wildcard));
    }

    #[test]
    fn rejects_bad_wire_letters() {
        for raw in ["", "AB", "3", "??"] {
            assert!(TileFace::from_wire(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn letter_matching_is_case_insensitive_and_skips_wildcards() {
        assert!(TileFace::Letter('Q').matches_letter('q'));
        assert!(!TileFace::Letter('Q').matches_letter('r'));
        assert!(!TileFace::Wildcard.matches_letter('q'));
    }
}
