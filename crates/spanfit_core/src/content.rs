//! Immutable styled content
//!
//! [`StyledContent`] is a base text plus an ordered list of [`StyledRun`]s
//! over UTF-8 byte ranges of that text. Runs may overlap; when they do, the
//! run applied later wins for each attribute key it sets.
//!
//! Content is assembled with a [`StyledContentBuilder`] (build, mutate,
//! freeze). Once built it cannot be mutated, and clones share storage.
//!
//! # Example
//!
//! ```rust
//! use spanfit_core::{Color, ImageRef, StyleAttributes, StyledContent};
//!
//! let mut builder = StyledContent::builder();
//! builder.push_attachment(ImageRef::new("epunk", 24.0, 24.0), StyleAttributes::new());
//! builder.push_str("epunks for the win...");
//! builder.apply_base(StyleAttributes::new().color(Color::BLACK));
//! let content = builder.build();
//!
//! assert!(content.resolved_at(0).image.is_some());
//! assert_eq!(content.resolved_at(5).color, Some(Color::BLACK));
//! ```

use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::sync::Arc;

use rustc_hash::FxHasher;
use serde::Serialize;
use smallvec::SmallVec;

use crate::detection::DetectedSpan;
use crate::error::ContentError;
use crate::style::{ImageRef, StyleAttributes};

/// Placeholder character standing in for an embedded image
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// A byte range of the base text tagged with style attributes
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StyledRun {
    /// Half-open byte range `[start, end)`
    pub range: Range<usize>,
    pub attributes: StyleAttributes,
}

impl StyledRun {
    pub fn new(range: Range<usize>, attributes: StyleAttributes) -> Self {
        Self { range, attributes }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.range.contains(&index)
    }
}

/// A maximal range over which the resolved attributes do not change
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub range: Range<usize>,
    pub attributes: StyleAttributes,
}

/// Frozen text plus styled runs
#[derive(Clone, Debug)]
pub struct StyledContent {
    text: Arc<str>,
    runs: Arc<[StyledRun]>,
    fingerprint: u64,
}

impl StyledContent {
    /// Start building new content
    pub fn builder() -> StyledContentBuilder {
        StyledContentBuilder::new()
    }

    /// Unstyled content
    pub fn plain(text: impl Into<String>) -> Self {
        let mut builder = StyledContentBuilder::new();
        builder.push_str(&text.into());
        builder.build()
    }

    /// Content with one run covering the whole text
    pub fn styled(text: impl Into<String>, attributes: StyleAttributes) -> Self {
        let mut builder = StyledContentBuilder::new();
        builder.push_styled(&text.into(), attributes);
        builder.build()
    }

    /// An empty text with no runs
    pub fn empty() -> Self {
        StyledContentBuilder::new().build()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Stable hash of text and runs; equal content has equal fingerprints
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Fold every run covering `index`, last writer wins per key
    pub fn resolved_at(&self, index: usize) -> StyleAttributes {
        let mut resolved = StyleAttributes::default();
        for run in self.runs.iter().filter(|r| r.contains(index)) {
            resolved.merge(&run.attributes);
        }
        resolved
    }

    /// Split the text into maximal uniformly-styled segments
    pub fn segments(&self) -> Vec<Segment> {
        let len = self.text.len();
        if len == 0 {
            return Vec::new();
        }

        let mut bounds: SmallVec<[usize; 16]> = SmallVec::new();
        bounds.push(0);
        bounds.push(len);
        for run in self.runs.iter() {
            bounds.push(run.range.start);
            bounds.push(run.range.end);
        }
        bounds.sort_unstable();
        bounds.dedup();

        let mut segments: Vec<Segment> = Vec::with_capacity(bounds.len());
        for pair in bounds.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            let attributes = self.resolved_at(start);
            // Coalesce neighbours that resolve identically
            match segments.last_mut() {
                Some(prev) if prev.attributes == attributes => prev.range.end = end,
                _ => segments.push(Segment {
                    range: start..end,
                    attributes,
                }),
            }
        }
        segments
    }

    /// The detection a tap at `index` would report, with the run it came from
    pub fn detection_at(&self, index: usize) -> Option<(Range<usize>, DetectedSpan)> {
        self.runs
            .iter()
            .rev()
            .find(|r| r.contains(index) && r.attributes.detection.is_some())
            .and_then(|r| {
                r.attributes
                    .detection
                    .clone()
                    .map(|detection| (r.range.clone(), detection))
            })
    }

    /// Every run that carries a link target
    pub fn link_runs(&self) -> impl Iterator<Item = &StyledRun> {
        self.runs.iter().filter(|r| r.attributes.link.is_some())
    }

    /// The substring covered by a range, if it is valid for this text
    pub fn slice(&self, range: Range<usize>) -> Option<&str> {
        self.text.get(range)
    }
}

impl PartialEq for StyledContent {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint && self.text == other.text && self.runs == other.runs
    }
}

impl Default for StyledContent {
    fn default() -> Self {
        Self::empty()
    }
}

/// Accumulates text and style operations before freezing into [`StyledContent`]
#[derive(Clone, Debug, Default)]
pub struct StyledContentBuilder {
    text: String,
    runs: Vec<StyledRun>,
    base: Option<StyleAttributes>,
}

impl StyledContentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text accumulated so far
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append unstyled text, returning the range it occupies
    pub fn push_str(&mut self, s: &str) -> Range<usize> {
        let start = self.text.len();
        self.text.push_str(s);
        start..self.text.len()
    }

    /// Append text with a run covering exactly that text
    pub fn push_styled(&mut self, s: &str, attributes: StyleAttributes) -> Range<usize> {
        let range = self.push_str(s);
        if !range.is_empty() {
            self.runs.push(StyledRun::new(range.clone(), attributes));
        }
        range
    }

    /// Append an embedded image as a single placeholder character
    pub fn push_attachment(&mut self, image: ImageRef, attributes: StyleAttributes) -> Range<usize> {
        let mut buf = [0u8; 4];
        let placeholder = OBJECT_REPLACEMENT.encode_utf8(&mut buf);
        self.push_styled(placeholder, attributes.image(image))
    }

    /// Apply attributes over an existing range
    pub fn apply(
        &mut self,
        range: Range<usize>,
        attributes: StyleAttributes,
    ) -> Result<&mut Self, ContentError> {
        self.check_range(&range)?;
        if !range.is_empty() {
            self.runs.push(StyledRun::new(range, attributes));
        }
        Ok(self)
    }

    /// Apply attributes over everything appended so far
    pub fn apply_all(&mut self, attributes: StyleAttributes) -> &mut Self {
        if !self.text.is_empty() {
            self.runs
                .push(StyledRun::new(0..self.text.len(), attributes));
        }
        self
    }

    /// Attributes underneath every other run, covering the final text
    ///
    /// Repeated calls merge into the same base.
    pub fn apply_base(&mut self, attributes: StyleAttributes) -> &mut Self {
        match &mut self.base {
            Some(base) => base.merge(&attributes),
            None => self.base = Some(attributes),
        }
        self
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), ContentError> {
        let len = self.text.len();
        if range.start > range.end {
            return Err(ContentError::Reversed {
                start: range.start,
                end: range.end,
            });
        }
        if range.end > len {
            return Err(ContentError::OutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        for offset in [range.start, range.end] {
            if !self.text.is_char_boundary(offset) {
                return Err(ContentError::NotCharBoundary(offset));
            }
        }
        Ok(())
    }

    /// Freeze into immutable content
    pub fn build(self) -> StyledContent {
        let len = self.text.len();
        let mut runs = Vec::with_capacity(self.runs.len() + 1);
        if let Some(base) = self.base {
            if len > 0 && !base.is_empty() {
                runs.push(StyledRun::new(0..len, base));
            }
        }
        runs.extend(
            self.runs
                .into_iter()
                .filter(|r| !r.range.is_empty() && !r.attributes.is_empty()),
        );

        let mut hasher = FxHasher::default();
        self.text.hash(&mut hasher);
        for run in &runs {
            run.range.start.hash(&mut hasher);
            run.range.end.hash(&mut hasher);
            run.attributes.hash_into(&mut hasher);
        }
        let fingerprint = hasher.finish();

        tracing::trace!(len, runs = runs.len(), fingerprint, "styled content built");

        StyledContent {
            text: Arc::from(self.text),
            runs: Arc::from(runs),
            fingerprint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::style::{FontDescriptor, UnderlineStyle};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_overlapping_runs_resolve_last_writer_wins() {
        let mut builder = StyledContent::builder();
        builder.push_str("The quick brown fox");
        builder
            .apply(0..9, StyleAttributes::new().color(Color::BLACK))
            .unwrap()
            .apply(4..19, StyleAttributes::new().color(Color::BLUE).underline(UnderlineStyle::Single))
            .unwrap();
        let content = builder.build();

        assert_eq!(content.resolved_at(0).color, Some(Color::BLACK));
        assert_eq!(content.resolved_at(5).color, Some(Color::BLUE));
        assert_eq!(content.resolved_at(0).underline, None);
        assert_eq!(content.resolved_at(12).underline, Some(UnderlineStyle::Single));
    }

    #[test]
    fn test_segments_cover_text_and_coalesce() {
        let mut builder = StyledContent::builder();
        builder.push_str("aaabbbccc");
        builder
            .apply(3..6, StyleAttributes::new().font(FontDescriptor::default().bold()))
            .unwrap();
        let content = builder.build();

        let segments = content.segments();
        let ranges: Vec<_> = segments.iter().map(|s| s.range.clone()).collect();
        assert_eq!(ranges, vec![0..3, 3..6, 6..9]);
        assert!(segments[1].attributes.font.as_ref().unwrap().is_bold());
        assert!(segments[0].attributes.is_empty());
    }

    #[test]
    fn test_apply_rejects_bad_ranges() {
        let mut builder = StyledContent::builder();
        builder.push_str("héllo");

        assert_eq!(
            builder.apply(0..10, StyleAttributes::new()).unwrap_err(),
            ContentError::OutOfBounds { start: 0, end: 10, len: 6 }
        );
        assert_eq!(
            builder.apply(2..2, StyleAttributes::new()).unwrap_err(),
            ContentError::NotCharBoundary(2)
        );
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = builder.apply(4..1, StyleAttributes::new()).unwrap_err();
        assert_eq!(reversed, ContentError::Reversed { start: 4, end: 1 });
    }

    #[test]
    fn test_base_sits_under_other_runs() {
        let mut builder = StyledContent::builder();
        builder.push_styled("link", StyleAttributes::new().color(Color::BLUE));
        builder.push_str(" text");
        builder.apply_base(StyleAttributes::new().color(Color::BLACK));
        let content = builder.build();

        assert_eq!(content.runs()[0].range, 0..9);
        assert_eq!(content.resolved_at(1).color, Some(Color::BLUE));
        assert_eq!(content.resolved_at(6).color, Some(Color::BLACK));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = StyledContent::plain("Hello World!");
        let b = StyledContent::plain("Hello World!");
        let c = StyledContent::styled("Hello World!", StyleAttributes::new().color(Color::BLUE));

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a, b);
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_ne!(a, c);
    }

    #[test]
    fn test_detection_at_prefers_latest_run() {
        let mut builder = StyledContent::builder();
        builder.push_str("call 555-1234");
        builder
            .apply(5..13, StyleAttributes::new().detection(DetectedSpan::Other))
            .unwrap()
            .apply(
                5..13,
                StyleAttributes::new().detection(DetectedSpan::phone_number("555-1234")),
            )
            .unwrap();
        let content = builder.build();

        let (range, detection) = content.detection_at(6).unwrap();
        assert_eq!(range, 5..13);
        assert_eq!(detection, DetectedSpan::phone_number("555-1234"));
        assert!(content.detection_at(0).is_none());
    }

    #[test]
    fn test_attachment_is_one_placeholder() {
        let mut builder = StyledContent::builder();
        let range =
            builder.push_attachment(ImageRef::new("dog", 20.0, 20.0), StyleAttributes::new());
        let content = builder.build();

        assert_eq!(range, 0..OBJECT_REPLACEMENT.len_utf8());
        assert_eq!(content.text().chars().next(), Some(OBJECT_REPLACEMENT));
        assert_eq!(content.resolved_at(0).image.unwrap().name, "dog");
    }
}
