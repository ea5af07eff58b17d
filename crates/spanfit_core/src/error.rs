use thiserror::Error;

/// Errors raised while assembling styled content
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContentError {
    #[error("range {start}..{end} is outside text of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("range {start}..{end} is reversed")]
    Reversed { start: usize, end: usize },

    #[error("offset {0} is not on a character boundary")]
    NotCharBoundary(usize),

    #[error("invalid color: {0}")]
    InvalidColor(String),
}
