use pretty_assertions::assert_eq;
use spanfit_core::{Color, DetectedSpan, UnderlineStyle};
use spanfit_markup::{produce, MarkupProducer, StyleRules, TagStyle};

#[test]
fn tagged_link_without_auto_detection_yields_single_link_run() {
    let rules = StyleRules::default().auto_detect_links(false);
    let content = produce(r#"Visit <a href="http://x.com">here</a> now"#, &rules);

    assert_eq!(content.text(), "Visit here now");

    let links: Vec<_> = content.link_runs().collect();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].range, 6..10);
    assert_eq!(links[0].attributes.link.as_deref(), Some("http://x.com"));
    assert_eq!(content.resolved_at(7).underline, Some(UnderlineStyle::Single));
    assert_eq!(content.resolved_at(2).underline, None);
}

#[test]
fn production_is_deterministic() {
    let producer = MarkupProducer::new(StyleRules::default());
    let source = "Hotline <b>+49 30 1234567</b> or https://www.bahn.de/p/view.";
    let first = producer.produce(source);
    let second = producer.produce(source);

    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn auto_detection_marks_links_and_phone_numbers() {
    let content = produce(
        "Hotline +49 30 1234567, Infos unter www.bahn.de.",
        &StyleRules::default(),
    );
    let text = content.text();

    let phone_at = text.find("+49").unwrap();
    let (range, detection) = content.detection_at(phone_at).unwrap();
    assert_eq!(&text[range], "+49 30 1234567");
    assert_eq!(detection, DetectedSpan::phone_number("+49 30 1234567"));
    // phone numbers are not links
    assert_eq!(content.resolved_at(phone_at).link, None);

    let link_at = text.find("www").unwrap();
    let attrs = content.resolved_at(link_at);
    assert_eq!(attrs.link.as_deref(), Some("http://www.bahn.de"));
    assert_eq!(attrs.underline, Some(UnderlineStyle::Single));
}

#[test]
fn dates_and_year_ranges_stay_plain_text() {
    let rules = StyleRules::default();
    for text in [
        "Abfahrt am 15.01.2020 um 10 Uhr",
        "Fahrplan 2020-2021 gilt",
        "Stand: 2020-01-15",
    ] {
        let content = produce(text, &rules);
        let detected: Vec<_> = (0..content.len())
            .filter_map(|i| content.detection_at(i))
            .collect();
        assert!(detected.is_empty(), "{text}: {detected:?}");
    }

    let content = produce("Am 15.01.2020 unter 555-1234", &rules);
    let at = content.text().find("555").unwrap();
    let (range, detection) = content.detection_at(at).unwrap();
    assert_eq!(content.slice(range), Some("555-1234"));
    assert_eq!(detection, DetectedSpan::phone_number("555-1234"));
    assert!(content.detection_at(3).is_none());
}

#[test]
fn custom_rules_from_toml_style_configured_tags() {
    let rules = StyleRules::from_toml_str(
        r##"
        auto_detect_links = false
        auto_detect_phone_numbers = false
        default_color = "#333333"

        [tag_styles.HIGHLIGHT]
        color = "#FF0000"
        bold = true
        "##,
    )
    .unwrap();

    let content = produce("a <highlight>b</highlight> c", &rules);
    assert_eq!(content.text(), "a b c");

    let plain = content.resolved_at(0);
    assert_eq!(plain.color, Some("#333333".parse::<Color>().unwrap()));

    let highlighted = content.resolved_at(2);
    assert_eq!(highlighted.color, Some("#FF0000".parse::<Color>().unwrap()));
    assert!(highlighted.font.unwrap().is_bold());
}

#[test]
fn detectable_tags_report_their_attributes() {
    let rules = StyleRules::plain().tag(
        "station",
        TagStyle::new().underline(UnderlineStyle::Double).detectable(),
    );
    let content = produce(r#"Ab <station eva="8011160">Berlin Hbf</station>"#, &rules);

    let (range, detection) = content.detection_at(5).unwrap();
    assert_eq!(content.slice(range), Some("Berlin Hbf"));
    match detection {
        DetectedSpan::CustomTag { name, .. } => assert_eq!(name, "station"),
        other => panic!("unexpected detection {other:?}"),
    }
    assert_eq!(detection_attribute(&content, 5, "eva"), Some("8011160".to_string()));
}

fn detection_attribute(
    content: &spanfit_core::StyledContent,
    index: usize,
    key: &str,
) -> Option<String> {
    content
        .detection_at(index)
        .and_then(|(_, d)| d.attribute(key).map(str::to_string))
}

#[test]
fn malformed_markup_never_fails() {
    let inputs = ["<", "<<>>", "</>", "<a href=>x", "<b", "a < b > c", "<img>", "&bogus;"];
    for input in inputs {
        let content = produce(input, &StyleRules::default());
        assert!(content.len() <= input.len() + 3, "{input:?} -> {:?}", content.text());
    }
}
