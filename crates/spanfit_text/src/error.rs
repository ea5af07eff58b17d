use thiserror::Error;

/// Font lookup and parsing errors
///
/// These never escape measurement: the shaper logs them and falls back.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    #[error("font '{family}' (weight={weight}, italic={italic}) not found")]
    NotFound {
        family: String,
        weight: u16,
        italic: bool,
    },

    #[error("font source unavailable for face {0}")]
    SourceUnavailable(String),

    #[error("failed to parse font data (face index {0})")]
    Parse(u32),
}

/// Text measurement errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextError {
    #[error("measurement width must be positive and finite, got {0}")]
    InvalidWidth(f32),

    #[error(transparent)]
    Font(#[from] FontError),
}

pub type Result<T> = std::result::Result<T, TextError>;
