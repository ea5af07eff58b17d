//! Text layout engine
//!
//! Handles line breaking and height measurement for styled content.

use std::ops::Range;
use std::sync::Arc;

use spanfit_core::{StyledContent, OBJECT_REPLACEMENT};
use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::metrics::{EstimatedMetrics, Shaper};

/// Options for text layout
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutOptions {
    /// Maximum width for line wrapping (None = no wrapping)
    pub max_width: Option<f32>,
    /// Maximum number of lines kept (0 = unlimited)
    pub max_lines: usize,
}

impl LayoutOptions {
    /// Wrap at `width`
    pub fn wrapped(width: f32) -> Self {
        Self {
            max_width: Some(width),
            max_lines: 0,
        }
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }
}

/// A laid out line
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    /// Byte range of the line, including trailing whitespace and newline
    pub range: Range<usize>,
    /// Advance width without trailing whitespace
    pub width: f32,
    /// Tallest cluster on the line
    pub height: f32,
}

/// Result of laying out content
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextLayout {
    pub lines: Vec<LayoutLine>,
    /// Widest line
    pub width: f32,
    /// Sum of line heights
    pub height: f32,
    /// True if lines were dropped to honour `max_lines`
    pub truncated: bool,
}

impl TextLayout {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Height rounded up to whole points
    pub fn measured_height(&self) -> f32 {
        self.height.ceil()
    }

    /// Width rounded up to whole points
    pub fn measured_width(&self) -> f32 {
        self.width.ceil()
    }
}

/// Smallest unit the breaker moves: one `char` with its metrics
#[derive(Debug, Clone)]
struct Cluster {
    range: Range<usize>,
    advance: f32,
    height: f32,
    whitespace: bool,
    hard_break: bool,
    /// Break opportunity after this cluster
    brk: Option<BreakOpportunity>,
}

/// Text layout engine
pub struct TextLayoutEngine {
    shaper: Arc<dyn Shaper>,
}

impl TextLayoutEngine {
    pub fn new(shaper: Arc<dyn Shaper>) -> Self {
        Self { shaper }
    }

    /// Engine using [`EstimatedMetrics`]
    pub fn estimated() -> Self {
        Self::new(Arc::new(EstimatedMetrics::default()))
    }

    pub fn shaper(&self) -> &Arc<dyn Shaper> {
        &self.shaper
    }

    /// Layout content with the given options
    pub fn layout(&self, content: &StyledContent, options: &LayoutOptions) -> TextLayout {
        let clusters = self.clusters(content);
        if clusters.is_empty() {
            return TextLayout::default();
        }

        let mut lines = break_lines(&clusters, options.max_width);
        let truncated = options.max_lines > 0 && lines.len() > options.max_lines;
        if truncated {
            lines.truncate(options.max_lines);
        }

        let width = lines.iter().map(|l| l.width).fold(0.0f32, f32::max);
        let height = lines.iter().map(|l| l.height).sum();

        TextLayout {
            lines,
            width,
            height,
            truncated,
        }
    }

    /// Measure content without keeping the lines
    pub fn measure(&self, content: &StyledContent, options: &LayoutOptions) -> (f32, f32) {
        let layout = self.layout(content, options);
        (layout.width, layout.height)
    }

    /// Width of the widest unbreakable piece of content
    pub fn min_content_width(&self, content: &StyledContent) -> f32 {
        let mut widest = 0.0f32;
        let mut word = 0.0f32;
        let mut pending = 0.0f32;

        for cluster in self.clusters(content) {
            if cluster.whitespace {
                pending += cluster.advance;
            } else {
                word += pending + cluster.advance;
                pending = 0.0;
            }
            if cluster.brk.is_some() {
                widest = widest.max(word);
                word = 0.0;
                pending = 0.0;
            }
        }
        widest.max(word)
    }

    /// Shape every segment into clusters annotated with break opportunities
    fn clusters(&self, content: &StyledContent) -> Vec<Cluster> {
        let text = content.text();
        let mut clusters = Vec::with_capacity(text.len());

        for segment in content.segments() {
            let attrs = &segment.attributes;
            let font = attrs.font_or_default();
            let slice = &text[segment.range.clone()];
            let line_height =
                self.shaper.line_height(&font) + attrs.baseline_offset.unwrap_or(0.0).abs();
            let advances = self.shaper.advances(slice, &font);

            for (n, (offset, ch)) in slice.char_indices().enumerate() {
                let start = segment.range.start + offset;
                let (advance, height) = match (&attrs.image, ch) {
                    (Some(image), OBJECT_REPLACEMENT) => (image.width, image.height),
                    _ => (advances.get(n).copied().unwrap_or(0.0), line_height),
                };
                clusters.push(Cluster {
                    range: start..start + ch.len_utf8(),
                    advance,
                    height,
                    whitespace: ch.is_whitespace(),
                    hard_break: is_hard_break(ch),
                    brk: None,
                });
            }
        }

        let mut breaks = linebreaks(text).peekable();
        for cluster in &mut clusters {
            while let Some(&(index, opportunity)) = breaks.peek() {
                if index > cluster.range.end {
                    break;
                }
                breaks.next();
                if index == cluster.range.end {
                    cluster.brk = Some(opportunity);
                    break;
                }
            }
        }
        clusters
    }
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::estimated()
    }
}

fn is_hard_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Greedy line breaking
///
/// Whitespace never causes an overflow; it hangs past the edge. A word wider
/// than the line is broken between characters.
fn break_lines(clusters: &[Cluster], max_width: Option<f32>) -> Vec<LayoutLine> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut width = 0.0f32;
    // Index of the last cluster after which a break is allowed
    let mut candidate: Option<usize> = None;
    let mut i = 0;

    while i < clusters.len() {
        let cluster = &clusters[i];

        if let Some(max_width) = max_width {
            if !cluster.whitespace && i > start && width + cluster.advance > max_width {
                let end = match candidate {
                    Some(c) if c >= start => c + 1,
                    _ => i,
                };
                lines.push(make_line(&clusters[start..end], None));
                start = end;
                width = clusters[start..i].iter().map(|c| c.advance).sum();
                candidate = None;
                continue;
            }
        }

        width += cluster.advance;
        match cluster.brk {
            Some(BreakOpportunity::Mandatory) => {
                lines.push(make_line(&clusters[start..=i], None));
                start = i + 1;
                width = 0.0;
                candidate = None;
            }
            Some(BreakOpportunity::Allowed) => candidate = Some(i),
            None => {}
        }
        i += 1;
    }

    if start < clusters.len() {
        lines.push(make_line(&clusters[start..], None));
    }

    // A trailing newline opens one more, empty line
    if let Some(last) = clusters.last().filter(|c| c.hard_break) {
        lines.push(make_line(&[], Some((last.range.end, last.height))));
    }
    lines
}

fn make_line(clusters: &[Cluster], empty: Option<(usize, f32)>) -> LayoutLine {
    let (Some(first), Some(last)) = (clusters.first(), clusters.last()) else {
        let (at, height) = empty.unwrap_or_default();
        return LayoutLine {
            range: at..at,
            width: 0.0,
            height,
        };
    };

    let visible = clusters
        .iter()
        .rposition(|c| !c.whitespace)
        .map_or(0, |p| p + 1);
    let width = clusters[..visible].iter().map(|c| c.advance).sum();
    let height = clusters.iter().map(|c| c.height).fold(0.0f32, f32::max);

    LayoutLine {
        range: first.range.start..last.range.end,
        width,
        height,
    }
}
