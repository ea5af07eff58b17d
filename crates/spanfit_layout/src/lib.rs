//! Spanfit Layout
//!
//! Measure-then-constrain sizing for styled text:
//!
//! 1. Text renders at its natural size while unconstrained
//! 2. After layout assigns real geometry, the allocated width is published
//!    as a [`SizeObservation`] and the height is measured for that width
//! 3. The [`SizeConstrainedContainer`] pins the content to the resulting
//!    [`RenderBox`], updating only when a valid observation differs
//!
//! [`SizedText`] bundles the three pieces with tap handling; [`LayoutTree`]
//! hosts sized text in a taffy tree and drives the passes.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use spanfit_core::{MeasuredSize, RenderBox, StyledContent};
//! use spanfit_layout::SizedText;
//! use spanfit_text::LayoutMeasurer;
//!
//! let mut text = SizedText::new(
//!     StyledContent::plain("Hello World!"),
//!     Arc::new(LayoutMeasurer::estimated()),
//! );
//! assert!(text.render_box().is_none());
//!
//! text.commit_geometry(MeasuredSize::new(40.0, 15.0));
//! assert_eq!(text.render_box(), Some(RenderBox::new(40.0, 29.0)));
//! ```
//!
//! [`RenderBox`]: spanfit_core::RenderBox

pub mod broadcaster;
pub mod container;
pub mod error;
pub mod interaction;
pub mod observation;
pub mod sized_text;
pub mod style;
pub mod tree;

pub use broadcaster::{MeasurementBroadcaster, Subscriber, SubscriptionId};
pub use container::{ContainerState, SizeConstrainedContainer, Transition, HISTORY_LIMIT};
pub use error::{LayoutError, OpenError};
pub use interaction::{
    resolve_url, SystemOpener, TapDispatcher, TapHandler, TapOutcome, UrlOpener, DIAL_SCHEME,
};
pub use observation::{reduce, SizeObservation};
pub use sized_text::SizedText;
pub use style::{available_width, LayoutStyle};
pub use tree::{LayoutNodeId, LayoutTree, MAX_LAYOUT_PASSES};
