use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading style rules
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to read style rules from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse style rules: {0}")]
    Parse(#[from] toml::de::Error),
}
