//! Size observations and the reducer that merges them

use spanfit_core::{MeasuredSize, StyledContent};
use spanfit_text::MeasurementProvider;

/// Geometry a rendered element reports after a layout pass
#[derive(Clone, Debug, PartialEq)]
pub struct SizeObservation {
    /// Content that produced the geometry
    pub content: StyledContent,
    /// Line limit in effect (0 = unlimited)
    pub max_lines: usize,
    /// Allocated width and the height for it
    pub size: MeasuredSize,
}

impl SizeObservation {
    pub fn new(content: StyledContent, max_lines: usize, size: MeasuredSize) -> Self {
        Self {
            content,
            max_lines,
            size,
        }
    }

    /// An observation made before any geometry was assigned
    pub fn unmeasured(content: StyledContent, max_lines: usize) -> Self {
        Self::new(content, max_lines, MeasuredSize::ZERO)
    }

    /// Positive, finite width and height
    pub fn is_valid(&self) -> bool {
        self.size.is_valid()
    }

    fn same_input(&self, other: &SizeObservation) -> bool {
        self.max_lines == other.max_lines
            && self.size.width.to_bits() == other.size.width.to_bits()
            && self.content == other.content
    }
}

/// Merge the next observation into the current value
///
/// The latest observation always wins. When its width is positive the height
/// is recomputed for that width using the observation's own content and line
/// limit; otherwise it passes through untouched. A failed measurement also
/// passes the observation through so rendering is never blocked.
pub fn reduce(
    value: Option<&SizeObservation>,
    next: SizeObservation,
    provider: &dyn MeasurementProvider,
) -> SizeObservation {
    if next.size.width.is_nan() || next.size.width <= 0.0 {
        return next;
    }

    // Same content at the same width was already measured
    if let Some(value) = value.filter(|v| v.is_valid() && v.same_input(&next)) {
        return SizeObservation {
            size: value.size,
            ..next
        };
    }

    match provider.measure_height(&next.content, next.size.width, next.max_lines) {
        Ok(height) => {
            let size = next.size.with_height(height);
            SizeObservation { size, ..next }
        }
        Err(err) => {
            tracing::warn!(
                %err,
                width = next.size.width,
                "measurement failed, keeping unconstrained geometry"
            );
            next
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spanfit_text::{IntrinsicWidth, LayoutMeasurer, Result, TextError};

    struct Failing;

    impl MeasurementProvider for Failing {
        fn measure_height(&self, _: &StyledContent, width: f32, _: usize) -> Result<f32> {
            Err(TextError::InvalidWidth(width))
        }

        fn intrinsic_width(&self, _: &StyledContent, _: IntrinsicWidth) -> Result<f32> {
            Ok(0.0)
        }
    }

    #[test]
    fn test_positive_width_is_remeasured() {
        let content = StyledContent::plain("Hello World!");
        let next = SizeObservation::new(content.clone(), 0, MeasuredSize::new(40.0, 15.0));
        let reduced = reduce(None, next, &LayoutMeasurer::estimated());
        assert_eq!(reduced.size, MeasuredSize::new(40.0, 29.0));
        assert_eq!(reduced.content, content);
    }

    #[test]
    fn test_zero_width_passes_through() {
        let previous = SizeObservation::new(
            StyledContent::plain("Hello"),
            0,
            MeasuredSize::new(100.0, 40.0),
        );
        let next = SizeObservation::unmeasured(StyledContent::plain("Hello"), 0);
        let reduced = reduce(Some(&previous), next.clone(), &LayoutMeasurer::estimated());
        assert_eq!(reduced, next);
    }

    #[test]
    fn test_latest_line_limit_is_used() {
        let content = StyledContent::plain("aaaa bbbb cccc dddd");
        let measurer = LayoutMeasurer::estimated();
        let unlimited = reduce(
            None,
            SizeObservation::new(content.clone(), 0, MeasuredSize::new(40.0, 1.0)),
            &measurer,
        );
        let limited = reduce(
            Some(&unlimited),
            SizeObservation::new(content, 1, MeasuredSize::new(40.0, 1.0)),
            &measurer,
        );
        assert!(limited.size.height < unlimited.size.height);
        assert_eq!(limited.max_lines, 1);
    }

    #[test]
    fn test_measurement_failure_keeps_geometry() {
        let next = SizeObservation::new(StyledContent::plain("x"), 0, MeasuredSize::new(80.0, 20.0));
        assert_eq!(reduce(None, next.clone(), &Failing), next);
    }
}
