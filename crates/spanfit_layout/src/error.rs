use thiserror::Error;

/// Failure to open a tapped URL
#[derive(Error, Debug)]
pub enum OpenError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to open '{url}': {source}")]
    Launch {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("opening URLs is not supported on this platform")]
    Unsupported,
}

/// Layout tree errors
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("unknown layout node")]
    UnknownNode,

    #[error(transparent)]
    Taffy(#[from] taffy::TaffyError),
}
