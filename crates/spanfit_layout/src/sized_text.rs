//! Self-sizing styled text element

use std::sync::Arc;

use spanfit_core::{DetectedSpan, MeasuredSize, RenderBox, StyledContent};
use spanfit_markup::{produce, StyleRules};
use spanfit_text::{IntrinsicWidth, MeasurementProvider};

use crate::broadcaster::{MeasurementBroadcaster, SubscriptionId};
use crate::container::{ContainerState, SizeConstrainedContainer};
use crate::interaction::{TapDispatcher, TapOutcome, UrlOpener};
use crate::observation::SizeObservation;

/// Styled text that measures itself and pins to the measured box
///
/// Wires a [`MeasurementBroadcaster`] to a [`SizeConstrainedContainer`]:
/// after each layout pass the host commits the allocated geometry with
/// [`commit_geometry`](Self::commit_geometry), and from then on the element
/// reports exactly its [`RenderBox`].
pub struct SizedText {
    container: SizeConstrainedContainer,
    broadcaster: MeasurementBroadcaster,
    dispatcher: TapDispatcher,
}

impl SizedText {
    pub fn new(content: StyledContent, provider: Arc<dyn MeasurementProvider>) -> Self {
        Self {
            container: SizeConstrainedContainer::new(content, 0),
            broadcaster: MeasurementBroadcaster::new(provider),
            dispatcher: TapDispatcher::default(),
        }
    }

    /// Style `markup` with `rules` and wrap the result
    pub fn from_markup(
        markup: &str,
        rules: &StyleRules,
        provider: Arc<dyn MeasurementProvider>,
    ) -> Self {
        Self::new(produce(markup, rules), provider)
    }

    /// Keep at most `max_lines` lines (0 = unlimited)
    pub fn line_limit(mut self, max_lines: usize) -> Self {
        self.container.set_max_lines(max_lines);
        self
    }

    /// Host callback for taps on detected spans
    pub fn on_tap<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&DetectedSpan) + 'static,
    {
        self.dispatcher.on_tap(handler);
        self
    }

    /// Replace the URL opener
    pub fn opener(mut self, opener: impl UrlOpener + 'static) -> Self {
        self.dispatcher.set_opener(opener);
        self
    }

    pub fn content(&self) -> &StyledContent {
        self.container.content()
    }

    pub fn max_lines(&self) -> usize {
        self.container.max_lines()
    }

    pub fn state(&self) -> ContainerState {
        self.container.state()
    }

    pub fn render_box(&self) -> Option<RenderBox> {
        self.container.render_box()
    }

    pub fn container(&self) -> &SizeConstrainedContainer {
        &self.container
    }

    pub fn broadcaster(&self) -> &MeasurementBroadcaster {
        &self.broadcaster
    }

    /// Listen for merged size observations
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&SizeObservation) + 'static,
    {
        self.broadcaster.subscribe(subscriber)
    }

    /// Swap in new content; the box stays until the next commit replaces it
    pub fn set_content(&mut self, content: StyledContent) {
        self.container.set_content(content);
    }

    /// Natural size: unwrapped width and the height at that width
    pub fn intrinsic_size(&self) -> MeasuredSize {
        let provider = self.broadcaster.provider();
        let content = self.content();

        let width = match provider.intrinsic_width(content, IntrinsicWidth::Max) {
            Ok(width) if width > 0.0 => width,
            Ok(_) => return MeasuredSize::ZERO,
            Err(err) => {
                tracing::warn!(%err, "intrinsic width unavailable");
                return MeasuredSize::ZERO;
            }
        };
        match provider.measure_height(content, width, self.max_lines()) {
            Ok(height) => MeasuredSize::new(width, height),
            Err(err) => {
                tracing::warn!(%err, "intrinsic height unavailable");
                MeasuredSize::ZERO
            }
        }
    }

    /// Width of the widest unbreakable run
    pub fn min_content_width(&self) -> f32 {
        self.broadcaster
            .provider()
            .intrinsic_width(self.content(), IntrinsicWidth::Min)
            .unwrap_or_else(|err| {
                tracing::warn!(%err, "min-content width unavailable");
                0.0
            })
    }

    /// Size to report to layout: the box once constrained, else natural size
    pub fn layout_size(&self) -> MeasuredSize {
        match self.render_box() {
            Some(render_box) => render_box.into(),
            None => self.intrinsic_size(),
        }
    }

    /// Publish the geometry layout allocated, returning whether the box changed
    pub fn commit_geometry(&mut self, allocated: MeasuredSize) -> bool {
        let observation = SizeObservation::new(self.content().clone(), self.max_lines(), allocated);
        if !self.broadcaster.publish(observation) {
            return false;
        }
        match self.broadcaster.value() {
            Some(value) => self.container.observe(value),
            None => false,
        }
    }

    /// Handle a tap at a byte offset into the text
    pub fn tap_at(&mut self, index: usize) -> TapOutcome {
        match self.content().detection_at(index) {
            Some((_, span)) => self.dispatcher.dispatch(&span),
            None => TapOutcome::Ignored,
        }
    }
}

impl std::fmt::Debug for SizedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SizedText")
            .field("text", &self.content().text())
            .field("max_lines", &self.max_lines())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
