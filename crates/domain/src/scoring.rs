//! Letter scoring as pushed by the server at round start.
//!
//! The round payload carries either a flat per-tile value or a per-letter
//! map. Lowercase rendered letters are the played-blank sentinel and are
//! always worth zero regardless of the table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LetterScoring {
    /// Every concrete tile is worth the same value.
    Flat(u32),
    /// Per-letter values keyed by uppercase letter.
    PerLetter(HashMap<char, u32>),
}

impl Default for LetterScoring {
    fn default() -> Self {
        LetterScoring::Flat(1)
    }
}

impl LetterScoring {
    /// Value of one rendered character. Lowercase means "came from a
    /// wildcard" and scores zero.
    pub fn value(&self, rendered: char) -> u32 {
        if rendered.is_ascii_lowercase() {
            return 0;
        }
        match self {
            LetterScoring::Flat(v) => *v,
            LetterScoring::PerLetter(map) => map.get(&rendered).copied().unwrap_or(0),
        }
    }

    /// Display score for a whole rendered word.
    pub fn word_score(&self, word: &str) -> u32 {
        word.chars().map(|c| self.value(c)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_blanks_score_zero() {
        let flat = LetterScoring::Flat(3);
        assert_eq!(flat.value('A'), 3);
        assert_eq!(flat.value('a'), 0);

        let map = LetterScoring::PerLetter(HashMap::from([('Q', 10), ('A', 1)]));
        assert_eq!(map.value('Q'), 10);
        assert_eq!(map.value('q'), 0);
        assert_eq!(map.value('Z'), 0);
    }

    #[test]
    fn word_score_mixes_cases() {
        let map = LetterScoring::PerLetter(HashMap::from([('C', 3), ('A', 1), ('T', 1)]));
        // "CATs" - the s is a played blank
        assert_eq!(map.word_score("CATs"), 5);
    }

    #[test]
    fn decodes_both_wire_shapes() {
        let flat: LetterScoring = serde_json::from_str("2").expect("flat");
        assert_eq!(flat, LetterScoring::Flat(2));

        let map: LetterScoring = serde_json::from_str(r#"{"A":1,"B":3}"#).expect("map");
        assert_eq!(map.value('B'), 3);
    }
}
