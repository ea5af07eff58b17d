//! Parsed font faces

use std::sync::Arc;

use crate::error::FontError;

/// Vertical metrics in font units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMetrics {
    pub units_per_em: u16,
    pub ascender: i16,
    /// Negative below the baseline
    pub descender: i16,
    pub line_gap: i16,
}

impl FontMetrics {
    fn scale(&self, size: f32) -> f32 {
        size / f32::from(self.units_per_em.max(1))
    }

    pub fn ascender_px(&self, size: f32) -> f32 {
        f32::from(self.ascender) * self.scale(size)
    }

    pub fn descender_px(&self, size: f32) -> f32 {
        f32::from(self.descender) * self.scale(size)
    }

    /// Distance between consecutive baselines
    pub fn line_height_px(&self, size: f32) -> f32 {
        let units = i32::from(self.ascender) - i32::from(self.descender) + i32::from(self.line_gap);
        units as f32 * self.scale(size)
    }
}

/// Raw font data plus the metrics parsed from it
#[derive(Clone)]
pub struct FontFace {
    data: Arc<Vec<u8>>,
    index: u32,
    family: Option<String>,
    metrics: FontMetrics,
}

impl FontFace {
    /// Parse the first face in `data`
    pub fn from_data(data: Vec<u8>) -> Result<Self, FontError> {
        Self::from_data_with_index(data, 0)
    }

    /// Parse face `index` of a font collection
    pub fn from_data_with_index(data: Vec<u8>, index: u32) -> Result<Self, FontError> {
        let face = ttf_parser::Face::parse(&data, index).map_err(|_| FontError::Parse(index))?;

        let metrics = FontMetrics {
            units_per_em: face.units_per_em(),
            ascender: face.ascender(),
            descender: face.descender(),
            line_gap: face.line_gap(),
        };
        let family = face
            .names()
            .into_iter()
            .filter(|name| name.name_id == ttf_parser::name_id::FAMILY)
            .find_map(|name| name.to_string());

        Ok(Self {
            data: Arc::new(data),
            index,
            family,
            metrics,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Family name from the `name` table, if it has a Unicode entry
    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("index", &self.index)
            .field("bytes", &self.data.len())
            .field("metrics", &self.metrics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_scale_to_pixels() {
        let metrics = FontMetrics {
            units_per_em: 1000,
            ascender: 800,
            descender: -200,
            line_gap: 200,
        };
        let close = |a: f32, b: f32| (a - b).abs() < 1e-4;
        assert!(close(metrics.ascender_px(10.0), 8.0));
        assert!(close(metrics.descender_px(10.0), -2.0));
        assert!(close(metrics.line_height_px(10.0), 12.0));
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let err = FontFace::from_data(vec![0, 1, 2, 3]).unwrap_err();
        assert_eq!(err, FontError::Parse(0));
    }
}
