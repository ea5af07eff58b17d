//! Style rules for markup production
//!
//! Rules describe the default font and color, per-tag overrides, the style
//! used for auto-detected links and phone numbers, and which detections are
//! enabled. They deserialize from TOML:
//!
//! ```toml
//! auto_detect_links = true
//! auto_detect_phone_numbers = false
//!
//! [default_font]
//! family = "Helvetica"
//! size = 14.0
//!
//! [tag_styles.a]
//! underline = "single"
//! color = "#0066cc"
//! link_attribute = "href"
//! detectable = true
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use spanfit_core::{Color, FontDescriptor, StyleAttributes, UnderlineStyle};

use crate::error::RulesError;

/// Overrides applied by one tag
///
/// Unset fields inherit from the enclosing tags and the defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u16>,
    /// Shorthand for weight 700
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<UnderlineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_offset: Option<f32>,
    /// Tag attribute whose value becomes the run's link target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_attribute: Option<String>,
    /// Taps on this tag report a custom-tag detection
    pub detectable: bool,
}

impl TagStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = Some(true);
        self
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn underline(mut self, underline: UnderlineStyle) -> Self {
        self.underline = Some(underline);
        self
    }

    pub fn baseline_offset(mut self, offset: f32) -> Self {
        self.baseline_offset = Some(offset);
        self
    }

    pub fn link_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.link_attribute = Some(attribute.into());
        self
    }

    pub fn detectable(mut self) -> Self {
        self.detectable = true;
        self
    }

    /// Whether this style changes the font at all
    pub fn touches_font(&self) -> bool {
        self.family.is_some()
            || self.size.is_some()
            || self.weight.is_some()
            || self.bold.is_some()
            || self.italic.is_some()
    }

    /// Apply the font overrides to `font`
    pub fn apply_font(&self, font: &mut FontDescriptor) {
        if let Some(family) = &self.family {
            font.family = Some(family.clone());
        }
        if let Some(size) = self.size {
            font.size = size;
        }
        if let Some(bold) = self.bold {
            font.weight = if bold { 700 } else { 400 };
        }
        if let Some(weight) = self.weight {
            font.weight = weight;
        }
        if let Some(italic) = self.italic {
            font.italic = italic;
        }
    }

    /// Non-font attributes (color, underline, baseline offset)
    pub fn decoration(&self) -> StyleAttributes {
        StyleAttributes {
            color: self.color,
            underline: self.underline,
            baseline_offset: self.baseline_offset,
            ..StyleAttributes::default()
        }
    }
}

/// Configuration for turning markup into styled content
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleRules {
    pub default_font: FontDescriptor,
    pub default_color: Color,
    /// Per-tag overrides, keyed by lowercase tag name
    pub tag_styles: IndexMap<String, TagStyle>,
    /// Style for auto-detected links and phone numbers
    pub link_style: TagStyle,
    pub auto_detect_links: bool,
    pub auto_detect_phone_numbers: bool,
}

impl Default for StyleRules {
    fn default() -> Self {
        let anchor = TagStyle::new()
            .underline(UnderlineStyle::Single)
            .link_attribute("href")
            .detectable();

        let mut tag_styles = IndexMap::new();
        tag_styles.insert("a".to_string(), anchor);
        tag_styles.insert("b".to_string(), TagStyle::new().bold());
        tag_styles.insert("strong".to_string(), TagStyle::new().bold());
        tag_styles.insert("i".to_string(), TagStyle::new().italic());
        tag_styles.insert("em".to_string(), TagStyle::new().italic());
        tag_styles.insert(
            "u".to_string(),
            TagStyle::new().underline(UnderlineStyle::Single),
        );
        tag_styles.insert("sup".to_string(), TagStyle::new().baseline_offset(4.0));
        tag_styles.insert("sub".to_string(), TagStyle::new().baseline_offset(-4.0));

        Self {
            default_font: FontDescriptor::default(),
            default_color: Color::BLACK,
            tag_styles,
            link_style: TagStyle::new().underline(UnderlineStyle::Single),
            auto_detect_links: true,
            auto_detect_phone_numbers: true,
        }
    }
}

impl StyleRules {
    /// The default product rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules with no tag styles and no auto-detection
    pub fn plain() -> Self {
        Self {
            tag_styles: IndexMap::new(),
            auto_detect_links: false,
            auto_detect_phone_numbers: false,
            ..Self::default()
        }
    }

    /// Parse rules from a TOML string
    pub fn from_toml_str(source: &str) -> Result<Self, RulesError> {
        let mut rules: StyleRules = toml::from_str(source)?;
        rules.normalize();
        Ok(rules)
    }

    /// Load rules from a TOML file
    pub fn load(path: &Path) -> Result<Self, RulesError> {
        let source = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Set or replace the style for a tag
    pub fn tag(mut self, name: &str, style: TagStyle) -> Self {
        self.tag_styles.insert(name.to_ascii_lowercase(), style);
        self
    }

    pub fn default_font(mut self, font: FontDescriptor) -> Self {
        self.default_font = font;
        self
    }

    pub fn default_color(mut self, color: Color) -> Self {
        self.default_color = color;
        self
    }

    pub fn link_style(mut self, style: TagStyle) -> Self {
        self.link_style = style;
        self
    }

    pub fn auto_detect_links(mut self, enabled: bool) -> Self {
        self.auto_detect_links = enabled;
        self
    }

    pub fn auto_detect_phone_numbers(mut self, enabled: bool) -> Self {
        self.auto_detect_phone_numbers = enabled;
        self
    }

    /// Style for a tag, if one is configured
    pub fn tag_style(&self, name: &str) -> Option<&TagStyle> {
        self.tag_styles.get(name)
    }

    /// Attributes applied underneath all markup styling
    pub fn base_attributes(&self) -> StyleAttributes {
        StyleAttributes::new()
            .font(self.default_font.clone())
            .color(self.default_color)
    }

    /// Lowercase tag names so lookups are case-insensitive
    ///
    /// [`from_toml_str`](Self::from_toml_str) does this already; call it
    /// after deserializing rules embedded in another document.
    pub fn normalize(&mut self) {
        if self.tag_styles.keys().any(|k| k.chars().any(|c| c.is_ascii_uppercase())) {
            self.tag_styles = std::mem::take(&mut self.tag_styles)
                .into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v))
                .collect();
        }
    }
}
