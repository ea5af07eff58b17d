//! Font registry over the system font database
//!
//! Uses fontdb to find faces by family name or generic category and keeps
//! every lookup, including misses, so repeated measurements never hit the
//! database twice for the same request.

use std::sync::Arc;

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rustc_hash::FxHashMap;

use crate::error::FontError;
use crate::font::FontFace;

/// Generic font category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GenericFont {
    #[default]
    SansSerif,
    Serif,
    Monospace,
}

impl GenericFont {
    /// Map a CSS-style generic family name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sans-serif" | "system-ui" => Some(Self::SansSerif),
            "serif" => Some(Self::Serif),
            "monospace" => Some(Self::Monospace),
            _ => None,
        }
    }

    fn family(self) -> Family<'static> {
        match self {
            Self::SansSerif => Family::SansSerif,
            Self::Serif => Family::Serif,
            Self::Monospace => Family::Monospace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum FamilyKey {
    Named(String),
    Generic(GenericFont),
}

impl FamilyKey {
    fn describe(&self) -> String {
        match self {
            Self::Named(name) => name.clone(),
            Self::Generic(generic) => format!("{generic:?}"),
        }
    }
}

type CacheKey = (FamilyKey, u16, bool);

/// Discovers and caches font faces
pub struct FontRegistry {
    db: Database,
    /// `Some` = found, `None` = known miss
    faces: FxHashMap<CacheKey, Option<Arc<FontFace>>>,
}

impl FontRegistry {
    /// A registry over all installed system fonts
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system font database");
        Self::with_database(db)
    }

    /// A registry with no fonts; populate it with [`load_font_data`](Self::load_font_data)
    pub fn empty() -> Self {
        Self::with_database(Database::new())
    }

    fn with_database(db: Database) -> Self {
        Self {
            db,
            faces: FxHashMap::default(),
        }
    }

    /// Add font data, returning the number of faces it contained
    ///
    /// Clears known misses since the new data may satisfy them.
    pub fn load_font_data(&mut self, data: Vec<u8>) -> usize {
        let before = self.db.len();
        self.db.load_font_data(data);
        self.faces.retain(|_, face| face.is_some());
        self.db.len() - before
    }

    /// Number of faces known to the database
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Check if a family is available
    pub fn has_font(&self, name: &str) -> bool {
        let query = Query {
            families: &[Family::Name(name)],
            weight: Weight::NORMAL,
            style: Style::Normal,
            stretch: Stretch::Normal,
        };
        self.db.query(&query).is_some()
    }

    /// Load a font by family name with a specific weight and slant
    pub fn load_font_with_style(
        &mut self,
        name: &str,
        weight: u16,
        italic: bool,
    ) -> Result<Arc<FontFace>, FontError> {
        self.load((FamilyKey::Named(name.to_string()), weight, italic))
    }

    /// Load the face for a generic category with a specific weight and slant
    pub fn load_generic_with_style(
        &mut self,
        generic: GenericFont,
        weight: u16,
        italic: bool,
    ) -> Result<Arc<FontFace>, FontError> {
        self.load((FamilyKey::Generic(generic), weight, italic))
    }

    fn load(&mut self, key: CacheKey) -> Result<Arc<FontFace>, FontError> {
        if let Some(cached) = self.faces.get(&key) {
            return cached.clone().ok_or_else(|| not_found(&key));
        }

        let result = self.query(&key).and_then(|id| self.load_face_by_id(id));
        match result {
            Ok(face) => {
                let face = Arc::new(face);
                self.faces.insert(key, Some(Arc::clone(&face)));
                Ok(face)
            }
            Err(err) => {
                self.faces.insert(key, None);
                Err(err)
            }
        }
    }

    fn query(&self, key: &CacheKey) -> Result<fontdb::ID, FontError> {
        let (family, weight, italic) = key;
        let family = match family {
            FamilyKey::Named(name) => Family::Name(name.as_str()),
            FamilyKey::Generic(generic) => generic.family(),
        };
        let mut query = Query {
            families: &[family],
            weight: Weight(*weight),
            style: if *italic { Style::Italic } else { Style::Normal },
            stretch: Stretch::Normal,
        };

        if let Some(id) = self.db.query(&query) {
            return Ok(id);
        }
        // Accept an oblique face when no true italic exists
        if *italic {
            query.style = Style::Oblique;
            if let Some(id) = self.db.query(&query) {
                return Ok(id);
            }
        }
        Err(not_found(key))
    }

    fn load_face_by_id(&self, id: fontdb::ID) -> Result<FontFace, FontError> {
        self.db
            .with_face_data(id, |data, index| {
                FontFace::from_data_with_index(data.to_vec(), index)
            })
            .ok_or_else(|| FontError::SourceUnavailable(format!("{id:?}")))?
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found((family, weight, italic): &CacheKey) -> FontError {
    FontError::NotFound {
        family: family.describe(),
        weight: *weight,
        italic: *italic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_names() {
        assert_eq!(GenericFont::from_name("Serif"), Some(GenericFont::Serif));
        assert_eq!(GenericFont::from_name("monospace"), Some(GenericFont::Monospace));
        assert_eq!(GenericFont::from_name("Helvetica"), None);
    }

    #[test]
    fn test_empty_registry_misses_are_cached() {
        let mut registry = FontRegistry::empty();
        assert_eq!(registry.face_count(), 0);
        assert!(!registry.has_font("Helvetica"));

        let first = registry.load_font_with_style("Helvetica", 400, false).unwrap_err();
        let second = registry.load_font_with_style("Helvetica", 400, false).unwrap_err();
        assert_eq!(first, second);
        assert!(matches!(first, FontError::NotFound { ref family, .. } if family == "Helvetica"));
        assert!(registry
            .load_generic_with_style(GenericFont::SansSerif, 700, true)
            .is_err());
    }

    #[test]
    fn test_invalid_font_data_adds_no_faces() {
        let mut registry = FontRegistry::empty();
        assert_eq!(registry.load_font_data(vec![1, 2, 3]), 0);
    }
}
