//! Spanfit Text
//!
//! Deterministic height measurement for styled content:
//!
//! - Font discovery over the system database (fontdb)
//! - Font parsing (ttf-parser) and shaping (HarfBuzz via rustybuzz)
//! - Estimated metrics when no font is available
//! - UAX #14 line breaking (unicode-linebreak) with `max_lines` truncation
//! - An LRU cache over any [`MeasurementProvider`]
//!
//! # Example
//!
//! ```rust
//! use spanfit_core::StyledContent;
//! use spanfit_text::{LayoutMeasurer, MeasurementProvider};
//!
//! let measurer = LayoutMeasurer::estimated();
//! let content = StyledContent::plain("Hello World!");
//!
//! let narrow = measurer.measure_height(&content, 40.0, 0).unwrap();
//! let wide = measurer.measure_height(&content, 400.0, 0).unwrap();
//! assert!(narrow > wide);
//! ```

pub mod error;
pub mod font;
pub mod layout;
pub mod measurer;
pub mod metrics;
pub mod registry;
pub mod shaper;

pub use error::{FontError, Result, TextError};
pub use font::{FontFace, FontMetrics};
pub use layout::{LayoutLine, LayoutOptions, TextLayout, TextLayoutEngine};
pub use measurer::{
    CachedMeasurer, IntrinsicWidth, LayoutMeasurer, MeasurementProvider, DEFAULT_CACHE_CAPACITY,
};
pub use metrics::{EstimatedMetrics, Shaper, LINE_HEIGHT_FACTOR};
pub use registry::{FontRegistry, GenericFont};
pub use shaper::FontShaper;
