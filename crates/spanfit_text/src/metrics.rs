//! Glyph metric sources
//!
//! The layout engine only needs two things from a font: how far each
//! character advances and how tall a line is. [`Shaper`] abstracts over
//! real fonts ([`FontShaper`](crate::FontShaper)) and the deterministic
//! [`EstimatedMetrics`] model.

use spanfit_core::FontDescriptor;

/// Line height as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Supplies advances and line heights for styled text
pub trait Shaper: Send + Sync {
    /// Horizontal advance of every `char` in `text`, in order
    ///
    /// Characters merged into a preceding cluster report `0.0`.
    fn advances(&self, text: &str, font: &FontDescriptor) -> Vec<f32>;

    /// Height of a single line set in `font`
    fn line_height(&self, font: &FontDescriptor) -> f32;
}

/// Font-independent metrics derived from the font size alone
///
/// Used when no font data is available and as the final fallback of
/// [`FontShaper`](crate::FontShaper).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EstimatedMetrics {
    /// Advance of a visible glyph, in em
    pub glyph_em: f32,
    /// Advance of whitespace, in em
    pub space_em: f32,
    /// Line height multiplier
    pub line_height: f32,
    /// Advance multiplier applied to bold text
    pub bold_factor: f32,
}

impl Default for EstimatedMetrics {
    fn default() -> Self {
        Self {
            glyph_em: 0.55,
            space_em: 0.25,
            line_height: LINE_HEIGHT_FACTOR,
            bold_factor: 1.05,
        }
    }
}

impl EstimatedMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance of a single character
    pub fn advance(&self, ch: char, font: &FontDescriptor) -> f32 {
        if ch.is_control() {
            return 0.0;
        }
        let em = if ch.is_whitespace() {
            self.space_em
        } else {
            self.glyph_em
        };
        let advance = em * font.size;
        if font.is_bold() {
            advance * self.bold_factor
        } else {
            advance
        }
    }
}

impl Shaper for EstimatedMetrics {
    fn advances(&self, text: &str, font: &FontDescriptor) -> Vec<f32> {
        text.chars().map(|ch| self.advance(ch, font)).collect()
    }

    fn line_height(&self, font: &FontDescriptor) -> f32 {
        font.size * self.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimated_advances() {
        let metrics = EstimatedMetrics::new();
        let font = FontDescriptor::system(10.0);
        let advances = metrics.advances("a b\n", &font);
        let expected = [5.5, 2.5, 5.5, 0.0];
        assert_eq!(advances.len(), expected.len());
        for (got, want) in advances.iter().zip(expected) {
            assert!((got - want).abs() < 1e-4, "{got} != {want}");
        }
        assert!((metrics.line_height(&font) - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_wider() {
        let metrics = EstimatedMetrics::new();
        let regular = FontDescriptor::system(12.0);
        let bold = regular.clone().bold();
        assert!(metrics.advance('W', &bold) > metrics.advance('W', &regular));
        assert_eq!(metrics.line_height(&bold), metrics.line_height(&regular));
    }
}
