//! Domain error types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A rack entry from the wire was not a single A-Z letter or the
    /// wildcard marker.
    #[error("invalid rack letter {0:?}")]
    InvalidRackLetter(String),

    /// A chosen wildcard letter was outside A-Z.
    #[error("invalid wildcard letter {0:?}")]
    InvalidWildcardLetter(char),
}
