//! Spanfit configuration file handling

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use spanfit_markup::StyleRules;
use spanfit_text::{CachedMeasurer, LayoutMeasurer, MeasurementProvider, DEFAULT_CACHE_CAPACITY};

/// Name of the configuration file looked up in a directory
pub const CONFIG_FILE: &str = "spanfit.toml";

/// Top-level configuration (spanfit.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SpanfitConfig {
    #[serde(default)]
    pub rules: StyleRules,
    #[serde(default)]
    pub measure: MeasureConfig,
}

/// Which metrics back measurement
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Font-independent estimates; identical on every machine
    #[default]
    Estimated,
    /// Installed system fonts, falling back to estimates
    System,
}

/// Measurement configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct MeasureConfig {
    #[serde(default)]
    pub backend: Backend,
    /// Cached measurements kept per run
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Default line limit (0 = unlimited)
    #[serde(default)]
    pub max_lines: usize,
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            cache_capacity: default_cache_capacity(),
            max_lines: 0,
        }
    }
}

impl SpanfitConfig {
    /// Load configuration from a file or a directory containing spanfit.toml
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        };

        if !config_path.exists() {
            anyhow::bail!("No {} found in {}", CONFIG_FILE, path.display());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Load an explicit path, or spanfit.toml in the working directory if
    /// present, or the defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_dir(path),
            None if Path::new(CONFIG_FILE).is_file() => Self::load_from_dir(Path::new(CONFIG_FILE)),
            None => {
                tracing::debug!("no {} found, using defaults", CONFIG_FILE);
                Ok(Self::default())
            }
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: SpanfitConfig = toml::from_str(content)?;
        config.rules.normalize();
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// The measurement provider this configuration selects
    pub fn provider(&self) -> Arc<dyn MeasurementProvider> {
        let measurer = match self.measure.backend {
            Backend::Estimated => LayoutMeasurer::estimated(),
            Backend::System => LayoutMeasurer::system(),
        };
        Arc::new(CachedMeasurer::new(measurer, self.measure.cache_capacity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spanfit_core::Color;

    #[test]
    fn test_empty_file_is_default() {
        let config = SpanfitConfig::from_toml_str("").unwrap();
        assert_eq!(config.rules, StyleRules::default());
        assert_eq!(config.measure.backend, Backend::Estimated);
        assert_eq!(config.measure.cache_capacity, DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_sections_parse() {
        let config = SpanfitConfig::from_toml_str(
            r##"
            [rules]
            auto_detect_phone_numbers = false
            default_color = "#222222"

            [rules.tag_styles.Em]
            italic = true

            [measure]
            backend = "system"
            max_lines = 3
            "##,
        )
        .unwrap();

        assert!(!config.rules.auto_detect_phone_numbers);
        assert_eq!(config.rules.default_color, Color::from_hex(0x222222));
        assert!(config.rules.tag_style("em").is_some());
        assert_eq!(config.measure.backend, Backend::System);
        assert_eq!(config.measure.max_lines, 3);
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = SpanfitConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = SpanfitConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed.rules, config.rules);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(SpanfitConfig::from_toml_str("[measure]\nbackend = \"gpu\"").is_err());
    }
}
