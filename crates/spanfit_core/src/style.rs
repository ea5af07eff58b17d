//! Style attributes carried by styled runs
//!
//! Every attribute key is optional. When runs overlap, attributes are folded
//! in application order and the last run to set a key wins for that key only.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::detection::DetectedSpan;

/// Default font family for unstyled text
pub const DEFAULT_FAMILY: &str = "Helvetica";

/// Default font size in points
pub const DEFAULT_SIZE: f32 = 12.0;

/// Font weight treated as bold by metric models
pub const BOLD_WEIGHT: u16 = 700;

/// Identifies a font by family, size, weight and slant
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontDescriptor {
    /// Family name; `None` selects the system sans-serif family
    pub family: Option<String>,
    /// Size in points
    pub size: f32,
    /// CSS-style weight (100-900, 400 is regular)
    pub weight: u16,
    pub italic: bool,
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: Some(family.into()),
            size,
            ..Default::default()
        }
    }

    /// The system sans-serif font at the given size
    pub fn system(size: f32) -> Self {
        Self {
            family: None,
            size,
            ..Default::default()
        }
    }

    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    pub fn bold(self) -> Self {
        self.with_weight(BOLD_WEIGHT)
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn is_bold(&self) -> bool {
        self.weight >= 600
    }

    pub(crate) fn hash_into<H: Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        self.size.to_bits().hash(state);
        self.weight.hash(state);
        self.italic.hash(state);
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: Some(DEFAULT_FAMILY.to_string()),
            size: DEFAULT_SIZE,
            weight: 400,
            italic: false,
        }
    }
}

/// Underline decoration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnderlineStyle {
    #[default]
    None,
    Single,
    Double,
}

/// Reference to an embedded image and the box it occupies inline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub name: String,
    pub width: f32,
    pub height: f32,
}

impl ImageRef {
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// A set of optional style attributes
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<FontDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<UnderlineStyle>,
    /// Link target URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_offset: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    /// What a tap on this range reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection: Option<DetectedSpan>,
}

impl StyleAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font(mut self, font: FontDescriptor) -> Self {
        self.font = Some(font);
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

    pub fn link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }

    pub fn baseline_offset(mut self, offset: f32) -> Self {
        self.baseline_offset = Some(offset);
        self
    }

    pub fn image(mut self, image: ImageRef) -> Self {
        self.image = Some(image);
        self
    }

    pub fn detection(mut self, detection: DetectedSpan) -> Self {
        self.detection = Some(detection);
        self
    }

    /// True if no key is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay `other` onto `self`; keys set in `other` replace ours
    pub fn merge(&mut self, other: &StyleAttributes) {
        if other.font.is_some() {
            self.font.clone_from(&other.font);
        }
        if other.color.is_some() {
            self.color = other.color;
        }
        if other.underline.is_some() {
            self.underline = other.underline;
        }
        if other.link.is_some() {
            self.link.clone_from(&other.link);
        }
        if other.baseline_offset.is_some() {
            self.baseline_offset = other.baseline_offset;
        }
        if other.image.is_some() {
            self.image.clone_from(&other.image);
        }
        if other.detection.is_some() {
            self.detection.clone_from(&other.detection);
        }
    }

    /// The effective font, falling back to the default descriptor
    pub fn font_or_default(&self) -> FontDescriptor {
        self.font.clone().unwrap_or_default()
    }

    pub(crate) fn hash_into<H: Hasher>(&self, state: &mut H) {
        match &self.font {
            Some(font) => {
                1u8.hash(state);
                font.hash_into(state);
            }
            None => 0u8.hash(state),
        }
        self.color.map(Color::to_rgba8).hash(state);
        self.underline.hash(state);
        self.link.hash(state);
        self.baseline_offset.map(f32::to_bits).hash(state);
        match &self.image {
            Some(image) => {
                image.name.hash(state);
                image.width.to_bits().hash(state);
                image.height.to_bits().hash(state);
            }
            None => 0u8.hash(state),
        }
        match &self.detection {
            Some(detection) => detection.hash_into(state),
            None => 0u8.hash(state),
        }
    }
}
