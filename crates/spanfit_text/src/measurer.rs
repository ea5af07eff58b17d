//! Height measurement for the measure-then-constrain protocol

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use spanfit_core::StyledContent;

use crate::error::{Result, TextError};
use crate::layout::{LayoutOptions, TextLayoutEngine};
use crate::shaper::FontShaper;

/// Default number of cached measurements
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Which intrinsic width to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntrinsicWidth {
    /// Widest unbreakable run
    Min,
    /// Width with no wrapping at all
    Max,
}

/// Computes the height content needs at a given width
///
/// Implementations must be deterministic: the same `(content, width,
/// max_lines)` always yields a bit-identical height.
pub trait MeasurementProvider: Send + Sync {
    /// Height of `content` wrapped at `width`, keeping at most `max_lines`
    /// lines (0 = unlimited)
    fn measure_height(&self, content: &StyledContent, width: f32, max_lines: usize) -> Result<f32>;

    fn intrinsic_width(&self, content: &StyledContent, kind: IntrinsicWidth) -> Result<f32>;
}

impl<P: MeasurementProvider + ?Sized> MeasurementProvider for Arc<P> {
    fn measure_height(&self, content: &StyledContent, width: f32, max_lines: usize) -> Result<f32> {
        (**self).measure_height(content, width, max_lines)
    }

    fn intrinsic_width(&self, content: &StyledContent, kind: IntrinsicWidth) -> Result<f32> {
        (**self).intrinsic_width(content, kind)
    }
}

fn check_width(width: f32) -> Result<()> {
    if width.is_finite() && width > 0.0 {
        Ok(())
    } else {
        Err(TextError::InvalidWidth(width))
    }
}

/// [`MeasurementProvider`] backed by a [`TextLayoutEngine`]
///
/// Measurement uses zero padding and inset; callers own all spacing.
pub struct LayoutMeasurer {
    engine: TextLayoutEngine,
}

impl LayoutMeasurer {
    pub fn new(engine: TextLayoutEngine) -> Self {
        Self { engine }
    }

    /// Measurer using estimated metrics only
    pub fn estimated() -> Self {
        Self::new(TextLayoutEngine::estimated())
    }

    /// Measurer using installed system fonts
    pub fn system() -> Self {
        Self::new(TextLayoutEngine::new(Arc::new(FontShaper::new())))
    }

    pub fn engine(&self) -> &TextLayoutEngine {
        &self.engine
    }
}

impl Default for LayoutMeasurer {
    fn default() -> Self {
        Self::estimated()
    }
}

impl MeasurementProvider for LayoutMeasurer {
    fn measure_height(&self, content: &StyledContent, width: f32, max_lines: usize) -> Result<f32> {
        check_width(width)?;
        let options = LayoutOptions::wrapped(width).with_max_lines(max_lines);
        let layout = self.engine.layout(content, &options);
        tracing::trace!(
            width,
            max_lines,
            lines = layout.line_count(),
            height = layout.height,
            "measured content"
        );
        Ok(layout.measured_height())
    }

    fn intrinsic_width(&self, content: &StyledContent, kind: IntrinsicWidth) -> Result<f32> {
        let width = match kind {
            IntrinsicWidth::Min => self.engine.min_content_width(content),
            IntrinsicWidth::Max => self.engine.layout(content, &LayoutOptions::default()).width,
        };
        Ok(width.ceil())
    }
}

type HeightKey = (u64, u32, usize);
type WidthKey = (u64, IntrinsicWidth);

/// Memoizes another provider's results in LRU caches
pub struct CachedMeasurer<P> {
    inner: P,
    heights: Mutex<LruCache<HeightKey, f32>>,
    widths: Mutex<LruCache<WidthKey, f32>>,
}

impl<P: MeasurementProvider> CachedMeasurer<P> {
    pub fn new(inner: P, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            heights: Mutex::new(LruCache::new(capacity)),
            widths: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn with_default_capacity(inner: P) -> Self {
        Self::new(inner, DEFAULT_CACHE_CAPACITY)
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of cached heights
    pub fn len(&self) -> usize {
        self.heights.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut heights) = self.heights.lock() {
            heights.clear();
        }
        if let Ok(mut widths) = self.widths.lock() {
            widths.clear();
        }
    }
}

impl<P: MeasurementProvider> MeasurementProvider for CachedMeasurer<P> {
    fn measure_height(&self, content: &StyledContent, width: f32, max_lines: usize) -> Result<f32> {
        check_width(width)?;
        let key = (content.fingerprint(), width.to_bits(), max_lines);

        let mut cache = self.heights.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(height) = cache.get(&key) {
            return Ok(*height);
        }
        let height = self.inner.measure_height(content, width, max_lines)?;
        cache.put(key, height);
        Ok(height)
    }

    fn intrinsic_width(&self, content: &StyledContent, kind: IntrinsicWidth) -> Result<f32> {
        let key = (content.fingerprint(), kind);

        let mut cache = self.widths.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(width) = cache.get(&key) {
            return Ok(*width);
        }
        let width = self.inner.intrinsic_width(content, kind)?;
        cache.put(key, width);
        Ok(width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
    }

    impl MeasurementProvider for Counting {
        fn measure_height(&self, _: &StyledContent, width: f32, _: usize) -> Result<f32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(width / 2.0)
        }

        fn intrinsic_width(&self, _: &StyledContent, _: IntrinsicWidth) -> Result<f32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(10.0)
        }
    }

    #[test]
    fn test_invalid_widths_are_rejected() {
        let measurer = LayoutMeasurer::estimated();
        let content = StyledContent::plain("Hello");
        for width in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                measurer.measure_height(&content, width, 0),
                Err(TextError::InvalidWidth(_))
            ));
        }
    }

    #[test]
    fn test_cache_hits_skip_inner_provider() {
        let cached = CachedMeasurer::new(
            Counting {
                calls: AtomicUsize::new(0),
            },
            8,
        );
        let content = StyledContent::plain("Hello");

        assert_eq!(cached.measure_height(&content, 100.0, 0).unwrap(), 50.0);
        assert_eq!(cached.measure_height(&content, 100.0, 0).unwrap(), 50.0);
        assert_eq!(cached.measure_height(&content, 100.0, 2).unwrap(), 50.0);
        assert_eq!(cached.intrinsic_width(&content, IntrinsicWidth::Max).unwrap(), 10.0);
        assert_eq!(cached.intrinsic_width(&content, IntrinsicWidth::Max).unwrap(), 10.0);

        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 3);
        assert_eq!(cached.len(), 2);

        cached.clear();
        assert!(cached.is_empty());
    }

    #[test]
    fn test_intrinsic_widths() {
        let measurer = LayoutMeasurer::estimated();
        let content = StyledContent::plain("Hello World!");
        let min = measurer.intrinsic_width(&content, IntrinsicWidth::Min).unwrap();
        let max = measurer.intrinsic_width(&content, IntrinsicWidth::Max).unwrap();
        assert!(min < max);
        assert_eq!(max, 76.0);
    }
}
