//! Layout style helpers

pub use taffy::prelude::*;

/// Helper to create common layout styles
pub struct LayoutStyle;

impl LayoutStyle {
    /// Create a flex row style
    pub fn flex_row() -> Style {
        Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Row,
            ..Default::default()
        }
    }

    /// Create a flex column style
    pub fn flex_column() -> Style {
        Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            ..Default::default()
        }
    }

    /// A column of the given width, children stacked top to bottom
    pub fn column_of_width(width: f32) -> Style {
        Style {
            size: Size {
                width: Dimension::Length(width),
                height: Dimension::Auto,
            },
            ..Self::flex_column()
        }
    }

    /// A row of the given width, children side by side
    pub fn row_of_width(width: f32) -> Style {
        Style {
            size: Size {
                width: Dimension::Length(width),
                height: Dimension::Auto,
            },
            align_items: Some(AlignItems::FlexStart),
            ..Self::flex_row()
        }
    }

    /// Style for a text leaf: shrinks with its parent, never grows
    pub fn text() -> Style {
        Style {
            flex_grow: 0.0,
            flex_shrink: 1.0,
            ..Default::default()
        }
    }

    /// Create a fixed size style
    pub fn fixed_size(width: f32, height: f32) -> Style {
        Style {
            size: Size {
                width: Dimension::Length(width),
                height: Dimension::Length(height),
            },
            flex_shrink: 0.0,
            ..Default::default()
        }
    }
}

/// Definite available width, unbounded height
pub fn available_width(width: f32) -> Size<AvailableSpace> {
    Size {
        width: AvailableSpace::Definite(width),
        height: AvailableSpace::MaxContent,
    }
}
