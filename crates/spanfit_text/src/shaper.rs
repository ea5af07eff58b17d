//! Shaping with real fonts
//!
//! [`FontShaper`] resolves a [`FontDescriptor`] to a face in the
//! [`FontRegistry`], shapes with rustybuzz and falls back to
//! [`EstimatedMetrics`] when no face can be found.

use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;
use rustybuzz::UnicodeBuffer;
use spanfit_core::FontDescriptor;

use crate::font::FontFace;
use crate::metrics::{EstimatedMetrics, Shaper};
use crate::registry::{FontRegistry, GenericFont};

type ResolveKey = (Option<String>, u16, bool);

/// Font-backed [`Shaper`]
///
/// Resolution order for a descriptor: the named family, the generic
/// sans-serif family, then estimated metrics. Each descriptor is resolved
/// once and the outcome remembered.
pub struct FontShaper {
    registry: Arc<Mutex<FontRegistry>>,
    resolved: Mutex<FxHashMap<ResolveKey, Option<Arc<FontFace>>>>,
    fallback: EstimatedMetrics,
}

impl FontShaper {
    /// Shaper over the system font database
    pub fn new() -> Self {
        Self::with_registry(Arc::new(Mutex::new(FontRegistry::new())))
    }

    /// Shaper over a shared registry
    pub fn with_registry(registry: Arc<Mutex<FontRegistry>>) -> Self {
        Self {
            registry,
            resolved: Mutex::new(FxHashMap::default()),
            fallback: EstimatedMetrics::default(),
        }
    }

    pub fn registry(&self) -> Arc<Mutex<FontRegistry>> {
        Arc::clone(&self.registry)
    }

    /// The face used for `font`, or `None` when estimated metrics apply
    pub fn resolve(&self, font: &FontDescriptor) -> Option<Arc<FontFace>> {
        let key = (font.family.clone(), font.weight, font.italic);
        let mut resolved = self.resolved.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(face) = resolved.get(&key) {
            return face.clone();
        }
        let face = self.lookup(font);
        resolved.insert(key, face.clone());
        face
    }

    fn lookup(&self, font: &FontDescriptor) -> Option<Arc<FontFace>> {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());

        let generic = match font.family.as_deref() {
            Some(name) => match GenericFont::from_name(name) {
                Some(generic) => generic,
                None => match registry.load_font_with_style(name, font.weight, font.italic) {
                    Ok(face) => return Some(face),
                    Err(err) => {
                        tracing::warn!(%err, "falling back to sans-serif");
                        GenericFont::SansSerif
                    }
                },
            },
            None => GenericFont::SansSerif,
        };

        match registry.load_generic_with_style(generic, font.weight, font.italic) {
            Ok(face) => Some(face),
            Err(err) => {
                tracing::warn!(%err, "no usable font face, using estimated metrics");
                None
            }
        }
    }
}

impl Default for FontShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl Shaper for FontShaper {
    fn advances(&self, text: &str, font: &FontDescriptor) -> Vec<f32> {
        let shaped = self
            .resolve(font)
            .and_then(|face| shape_advances(&face, text, font.size));
        match shaped {
            Some(advances) => advances,
            None => self.fallback.advances(text, font),
        }
    }

    fn line_height(&self, font: &FontDescriptor) -> f32 {
        match self.resolve(font) {
            Some(face) => face.metrics().line_height_px(font.size),
            None => self.fallback.line_height(font),
        }
    }
}

/// Per-char advances of `text` shaped with `face`
///
/// Glyph advances are summed into the char that starts their cluster.
fn shape_advances(face: &FontFace, text: &str, size: f32) -> Option<Vec<f32>> {
    let hb = rustybuzz::Face::from_slice(face.data(), face.index())?;
    let scale = size / hb.units_per_em().max(1) as f32;

    let mut buffer = UnicodeBuffer::new();
    buffer.push_str(text);
    let output = rustybuzz::shape(&hb, &[], buffer);

    let mut by_byte = vec![0.0f32; text.len()];
    for (info, pos) in output.glyph_infos().iter().zip(output.glyph_positions()) {
        if let Some(slot) = by_byte.get_mut(info.cluster as usize) {
            *slot += pos.x_advance as f32 * scale;
        }
    }

    Some(
        text.char_indices()
            .map(|(i, ch)| if ch.is_control() { 0.0 } else { by_byte[i] })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_shaper() -> FontShaper {
        FontShaper::with_registry(Arc::new(Mutex::new(FontRegistry::empty())))
    }

    #[test]
    fn test_missing_fonts_fall_back_to_estimates() {
        let shaper = offline_shaper();
        let font = FontDescriptor::new("No Such Family", 12.0);
        assert!(shaper.resolve(&font).is_none());

        let estimated = EstimatedMetrics::default();
        assert_eq!(shaper.advances("Hello", &font), estimated.advances("Hello", &font));
        assert_eq!(shaper.line_height(&font), estimated.line_height(&font));
    }

    #[test]
    fn test_generic_family_names_skip_named_lookup() {
        let shaper = offline_shaper();
        let font = FontDescriptor::new("monospace", 10.0);
        assert!(shaper.resolve(&font).is_none());
        assert_eq!(shaper.line_height(&font), EstimatedMetrics::default().line_height(&font));
    }
}
