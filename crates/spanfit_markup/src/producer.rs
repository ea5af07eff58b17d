//! Markup to styled content
//!
//! Production is pure: the same source and rules always yield the same
//! content. Tags are resolved with a stack so nested styles compose, then
//! bare links and phone numbers are detected over the final text.

use std::ops::Range;

use indexmap::IndexMap;
use spanfit_core::{
    DetectedSpan, ImageRef, StyleAttributes, StyledContent, StyledContentBuilder,
};

use crate::detect::{detect_links, detect_phone_numbers, overlaps, Detection};
use crate::rules::StyleRules;
use crate::tokenizer::{tokenize, Token};

/// A tag currently open while walking the token stream
#[derive(Debug)]
struct OpenTag {
    name: String,
    attributes: IndexMap<String, String>,
}

/// Produces [`StyledContent`] from markup using a fixed set of rules
#[derive(Clone, Debug, Default)]
pub struct MarkupProducer {
    rules: StyleRules,
}

impl MarkupProducer {
    pub fn new(rules: StyleRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &StyleRules {
        &self.rules
    }

    /// Style a markup string
    pub fn produce(&self, source: &str) -> StyledContent {
        let mut builder = StyledContent::builder();
        let mut stack: Vec<OpenTag> = Vec::new();
        let mut claimed: Vec<Range<usize>> = Vec::new();

        for token in tokenize(source) {
            match token {
                Token::Text(raw) => {
                    let text = html_escape::decode_html_entities(raw);
                    self.push_text(&mut builder, &text, &stack, &mut claimed);
                }
                Token::Open {
                    name,
                    attributes,
                    self_closing,
                    ..
                } => match name.as_str() {
                    "br" => {
                        builder.push_str("\n");
                    }
                    "img" => self.push_image(&mut builder, &attributes, &stack, &mut claimed),
                    _ if self_closing => {}
                    _ => stack.push(OpenTag { name, attributes }),
                },
                Token::Close { name, raw } => {
                    if name == "br" {
                        builder.push_str("\n");
                        continue;
                    }
                    match stack.iter().rposition(|t| t.name == name) {
                        // Closing an outer tag also closes anything left open inside it
                        Some(idx) => stack.truncate(idx),
                        None => {
                            tracing::debug!(tag = %name, "stray closing tag kept as text");
                            self.push_text(&mut builder, raw, &stack, &mut claimed);
                        }
                    }
                }
            }
        }

        if !stack.is_empty() {
            tracing::debug!(open = stack.len(), "unclosed tags styled to end of text");
        }

        builder.apply_base(self.rules.base_attributes());
        self.apply_detections(&mut builder, claimed);
        builder.build()
    }

    /// Style plain text: defaults plus auto-detection, no tag parsing
    pub fn produce_plain(&self, text: &str) -> StyledContent {
        let mut builder = StyledContent::builder();
        builder.push_str(text);
        builder.apply_base(self.rules.base_attributes());
        self.apply_detections(&mut builder, Vec::new());
        builder.build()
    }

    /// Attributes in effect inside the given tag stack
    fn resolve(&self, stack: &[OpenTag]) -> StyleAttributes {
        let mut attrs = StyleAttributes::new();
        let mut font = self.rules.default_font.clone();
        let mut font_changed = false;

        for tag in stack {
            let Some(style) = self.rules.tag_style(&tag.name) else {
                continue;
            };
            if style.touches_font() {
                style.apply_font(&mut font);
                font_changed = true;
            }
            attrs.merge(&style.decoration());
            if let Some(url) = style
                .link_attribute
                .as_ref()
                .and_then(|key| tag.attributes.get(key))
                .filter(|url| !url.is_empty())
            {
                attrs.link = Some(url.clone());
            }
            if style.detectable {
                attrs.detection = Some(DetectedSpan::custom_tag(
                    tag.name.clone(),
                    tag.attributes.clone(),
                ));
            }
        }

        if font_changed {
            attrs.font = Some(font);
        }
        attrs
    }

    fn push_text(
        &self,
        builder: &mut StyledContentBuilder,
        text: &str,
        stack: &[OpenTag],
        claimed: &mut Vec<Range<usize>>,
    ) {
        if text.is_empty() {
            return;
        }
        let attrs = self.resolve(stack);
        if attrs.is_empty() {
            builder.push_str(text);
            return;
        }
        let interactive = attrs.link.is_some() || attrs.detection.is_some();
        let range = builder.push_styled(text, attrs);
        if interactive {
            claimed.push(range);
        }
    }

    fn push_image(
        &self,
        builder: &mut StyledContentBuilder,
        attributes: &IndexMap<String, String>,
        stack: &[OpenTag],
        claimed: &mut Vec<Range<usize>>,
    ) {
        let Some(src) = attributes.get("src").filter(|s| !s.is_empty()) else {
            tracing::debug!("img tag without src ignored");
            return;
        };
        let fallback = self.rules.default_font.size;
        let dimension = |key: &str| {
            attributes
                .get(key)
                .and_then(|v| v.trim_end_matches("px").parse::<f32>().ok())
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(fallback)
        };
        let image = ImageRef::new(src.clone(), dimension("width"), dimension("height"));
        let attrs = self.resolve(stack);
        let interactive = attrs.link.is_some() || attrs.detection.is_some();
        let range = builder.push_attachment(image, attrs);
        if interactive {
            claimed.push(range);
        }
    }

    fn detection_style(&self) -> StyleAttributes {
        let style = &self.rules.link_style;
        let mut attrs = style.decoration();
        if style.touches_font() {
            let mut font = self.rules.default_font.clone();
            style.apply_font(&mut font);
            attrs.font = Some(font);
        }
        attrs
    }

    fn apply_detections(&self, builder: &mut StyledContentBuilder, mut claimed: Vec<Range<usize>>) {
        let links = if self.rules.auto_detect_links {
            detect_links(builder.text())
        } else {
            Vec::new()
        };
        for Detection { range, value } in links {
            if overlaps(&range, &claimed) {
                continue;
            }
            let attrs = self
                .detection_style()
                .link(value.clone())
                .detection(DetectedSpan::link(value));
            self.apply(builder, range.clone(), attrs);
            claimed.push(range);
        }

        let phones = if self.rules.auto_detect_phone_numbers {
            detect_phone_numbers(builder.text())
        } else {
            Vec::new()
        };
        for Detection { range, value } in phones {
            if overlaps(&range, &claimed) {
                continue;
            }
            let attrs = self
                .detection_style()
                .detection(DetectedSpan::phone_number(value));
            self.apply(builder, range.clone(), attrs);
            claimed.push(range);
        }
    }

    fn apply(&self, builder: &mut StyledContentBuilder, range: Range<usize>, attrs: StyleAttributes) {
        if let Err(err) = builder.apply(range, attrs) {
            tracing::warn!(%err, "skipping detection with invalid range");
        }
    }
}

/// Style `source` with `rules`
///
/// Convenience for one-off production; keep a [`MarkupProducer`] around when
/// styling many strings with the same rules.
pub fn produce(source: &str, rules: &StyleRules) -> StyledContent {
    MarkupProducer::new(rules.clone()).produce(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::TagStyle;
    use pretty_assertions::assert_eq;
    use spanfit_core::{Color, UnderlineStyle, OBJECT_REPLACEMENT};

    fn producer() -> MarkupProducer {
        MarkupProducer::new(StyleRules::default())
    }

    #[test]
    fn test_nested_tags_compose_fonts() {
        let content = producer().produce("<b>Mund-<i>Nasen</i>-Schutz</b>");
        assert_eq!(content.text(), "Mund-Nasen-Schutz");

        let mund = content.resolved_at(0).font.unwrap();
        assert!(mund.is_bold() && !mund.italic);

        let nasen = content.resolved_at(6).font.unwrap();
        assert!(nasen.is_bold() && nasen.italic);

        let schutz = content.resolved_at(12).font.unwrap();
        assert!(schutz.is_bold() && !schutz.italic);
    }

    #[test]
    fn test_defaults_apply_everywhere() {
        let content = producer().produce("plain");
        let attrs = content.resolved_at(2);
        assert_eq!(attrs.color, Some(Color::BLACK));
        assert_eq!(attrs.font.unwrap().size, 12.0);
    }

    #[test]
    fn test_br_inserts_newline() {
        let content = producer().produce("one<br>two<br/>three</br>");
        assert_eq!(content.text(), "one\ntwo\nthree\n");
    }

    #[test]
    fn test_entities_are_decoded() {
        let content = producer().produce("Fish &amp; Chips &lt;3");
        assert_eq!(content.text(), "Fish & Chips <3");
    }

    #[test]
    fn test_stray_close_and_unterminated_tags_are_literal() {
        let content = producer().produce("a</b> <i>b <x");
        assert_eq!(content.text(), "a</b> b <x");
        // the unclosed <i> styles through to the end
        assert!(content.resolved_at(content.len() - 1).font.unwrap().italic);
        assert!(!content.resolved_at(0).font.unwrap().italic);
    }

    #[test]
    fn test_mismatched_nesting_closes_back_to_opener() {
        let content = producer().produce("<b><i>x</b>y");
        assert_eq!(content.text(), "xy");
        assert!(!content.resolved_at(1).font.unwrap().is_bold());
        assert!(!content.resolved_at(1).font.unwrap().italic);
    }

    #[test]
    fn test_anchor_carries_link_and_custom_tag_detection() {
        let content = producer().produce(r#"go <a href="https://inside.bahn.de/">hier</a>."#);
        let (range, detection) = content.detection_at(4).unwrap();
        assert_eq!(content.slice(range).unwrap(), "hier");
        assert_eq!(detection.attribute("href"), Some("https://inside.bahn.de/"));
        assert_eq!(content.resolved_at(4).underline, Some(UnderlineStyle::Single));
    }

    #[test]
    fn test_detected_links_skip_tagged_links() {
        let content = producer().produce(r#"<a href="http://a.com">http://a.com</a> and http://b.com"#);
        let links: Vec<_> = content
            .link_runs()
            .map(|r| r.attributes.link.clone().unwrap())
            .collect();
        assert_eq!(links, vec!["http://a.com", "http://b.com"]);

        let (_, detection) = content.detection_at(content.len() - 2).unwrap();
        assert_eq!(detection, DetectedSpan::link("http://b.com"));
    }

    #[test]
    fn test_phone_numbers_detected_when_enabled() {
        let content = producer().produce("Call 555-1234 now");
        let (range, detection) = content.detection_at(6).unwrap();
        assert_eq!(content.slice(range).unwrap(), "555-1234");
        assert_eq!(detection, DetectedSpan::phone_number("555-1234"));

        let quiet = MarkupProducer::new(StyleRules::default().auto_detect_phone_numbers(false))
            .produce("Call 555-1234 now");
        assert!(quiet.detection_at(6).is_none());
    }

    #[test]
    fn test_image_tag_becomes_attachment() {
        let content = producer().produce(r#"<img src="epunk" width="24" height="20">epunks"#);
        assert_eq!(content.text().chars().next(), Some(OBJECT_REPLACEMENT));
        let image = content.resolved_at(0).image.unwrap();
        assert_eq!((image.name.as_str(), image.width, image.height), ("epunk", 24.0, 20.0));
    }

    #[test]
    fn test_unknown_tags_are_stripped_unstyled() {
        let rules = StyleRules::plain().tag("mark", TagStyle::new().color(Color::BLUE));
        let content = MarkupProducer::new(rules).produce("<span>a</span><mark>b</mark>");
        assert_eq!(content.text(), "ab");
        assert_eq!(content.resolved_at(0).color, Some(Color::BLACK));
        assert_eq!(content.resolved_at(1).color, Some(Color::BLUE));
    }

    #[test]
    fn test_produce_plain_skips_tags() {
        let content = producer().produce_plain("<b>not bold</b> www.example.com");
        assert_eq!(content.text(), "<b>not bold</b> www.example.com");
        assert!(content.resolved_at(1).font.unwrap().weight < 600);
        assert!(content.link_runs().count() == 1);
    }
}
