//! Sizes exchanged between measurement and layout

use serde::{Deserialize, Serialize};

/// A width and the height measured for that width
///
/// Height is only meaningful relative to the width it was measured at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasuredSize {
    pub width: f32,
    pub height: f32,
}

impl MeasuredSize {
    pub const ZERO: MeasuredSize = MeasuredSize::new(0.0, 0.0);

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions strictly positive and finite
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    pub fn with_height(self, height: f32) -> Self {
        Self { height, ..self }
    }
}

/// The explicit frame a container pins its content to once measured
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderBox {
    pub width: f32,
    pub height: f32,
}

impl RenderBox {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl From<RenderBox> for MeasuredSize {
    fn from(b: RenderBox) -> Self {
        MeasuredSize::new(b.width, b.height)
    }
}

impl From<MeasuredSize> for RenderBox {
    fn from(s: MeasuredSize) -> Self {
        RenderBox::new(s.width, s.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        assert!(MeasuredSize::new(100.0, 40.0).is_valid());
        assert!(!MeasuredSize::ZERO.is_valid());
        assert!(!MeasuredSize::new(100.0, 0.0).is_valid());
        assert!(!MeasuredSize::new(f32::INFINITY, 10.0).is_valid());
    }
}
