//! Spanfit Core
//!
//! Foundational types shared by every Spanfit crate:
//!
//! - **Styled content**: immutable text plus overlapping [`StyledRun`]s,
//!   assembled through [`StyledContentBuilder`]
//! - **Style attributes**: fonts, colors, underline, links, baseline offsets
//!   and embedded images, resolved last-writer-wins per attribute
//! - **Geometry**: [`MeasuredSize`] and [`RenderBox`] for the
//!   measure-then-constrain protocol
//! - **Detections**: [`DetectedSpan`] values carried by interactive runs
//!
//! # Example
//!
//! ```rust
//! use spanfit_core::{StyleAttributes, StyledContent, UnderlineStyle};
//!
//! let mut builder = StyledContent::builder();
//! builder.push_str("Visit here now");
//! builder
//!     .apply(
//!         6..10,
//!         StyleAttributes::new()
//!             .link("http://x.com")
//!             .underline(UnderlineStyle::Single),
//!     )
//!     .unwrap();
//! let content = builder.build();
//!
//! assert_eq!(content.text(), "Visit here now");
//! assert_eq!(content.resolved_at(7).link.as_deref(), Some("http://x.com"));
//! assert!(content.resolved_at(0).link.is_none());
//! ```

pub mod color;
pub mod content;
pub mod detection;
pub mod error;
pub mod geometry;
pub mod style;

pub use color::Color;
pub use content::{Segment, StyledContent, StyledContentBuilder, StyledRun, OBJECT_REPLACEMENT};
pub use detection::DetectedSpan;
pub use error::ContentError;
pub use geometry::{MeasuredSize, RenderBox};
pub use style::{FontDescriptor, ImageRef, StyleAttributes, UnderlineStyle};
