use pretty_assertions::assert_eq;
use spanfit_core::{FontDescriptor, StyleAttributes, StyledContent};
use spanfit_markup::{produce, StyleRules};
use spanfit_text::{
    CachedMeasurer, IntrinsicWidth, LayoutMeasurer, MeasurementProvider, TextError,
};

fn samples() -> Vec<StyledContent> {
    let rules = StyleRules::default();
    vec![
        StyledContent::plain("Hello World!"),
        produce("<b>Mund-Nasen-Schutz</b> ist <i>Pflicht</i> in allen Zügen.", &rules),
        produce("Hotline +49 30 1234567<br>Infos unter www.bahn.de", &rules),
        produce(
            "Reisende mit <u>Fahrkarten</u> für den Fernverkehr können auf \
             andere Züge ausweichen.<br><br>Die Zugbindung ist aufgehoben.",
            &rules,
        ),
        StyledContent::styled(
            "Ein sehr langes Wort: Donaudampfschifffahrtsgesellschaftskapitän",
            StyleAttributes::new().font(FontDescriptor::system(17.0).bold()),
        ),
    ]
}

#[test]
fn same_inputs_measure_identically() {
    let measurer = LayoutMeasurer::estimated();
    for content in samples() {
        for width in [40.0, 123.5, 320.0] {
            let first = measurer.measure_height(&content, width, 0).unwrap();
            for _ in 0..5 {
                let again = measurer.measure_height(&content, width, 0).unwrap();
                assert_eq!(first.to_bits(), again.to_bits());
            }
        }
    }
}

#[test]
fn limiting_lines_never_increases_height() {
    let measurer = LayoutMeasurer::estimated();
    for content in samples() {
        for width in [30.0, 90.0, 250.0] {
            let unlimited = measurer.measure_height(&content, width, 0).unwrap();
            for max_lines in 1..6 {
                let limited = measurer.measure_height(&content, width, max_lines).unwrap();
                assert!(limited <= unlimited, "{max_lines} lines at {width}");
            }
        }
    }
}

#[test]
fn narrow_width_wraps_hello_world() {
    let measurer = LayoutMeasurer::estimated();
    let content = StyledContent::plain("Hello World!");

    let single_line = measurer.measure_height(&content, 400.0, 1).unwrap();
    let narrow = measurer.measure_height(&content, 40.0, 0).unwrap();
    let wide = measurer.measure_height(&content, 400.0, 0).unwrap();

    assert_eq!(single_line, 15.0);
    assert_eq!(wide, single_line);
    assert_eq!(narrow, 29.0);
}

#[test]
fn narrower_widths_are_never_shorter() {
    let measurer = LayoutMeasurer::estimated();
    for content in samples() {
        let mut previous = 0.0;
        for width in [600.0, 300.0, 150.0, 75.0] {
            let height = measurer.measure_height(&content, width, 0).unwrap();
            assert!(height >= previous, "width {width}");
            previous = height;
        }
    }
}

#[test]
fn cached_measurements_match_uncached() {
    let cached = CachedMeasurer::with_default_capacity(LayoutMeasurer::estimated());
    let plain = LayoutMeasurer::estimated();
    for content in samples() {
        for width in [55.0, 200.0] {
            let expected = plain.measure_height(&content, width, 0).unwrap();
            assert_eq!(cached.measure_height(&content, width, 0).unwrap(), expected);
            assert_eq!(cached.measure_height(&content, width, 0).unwrap(), expected);
        }
        assert_eq!(
            cached.intrinsic_width(&content, IntrinsicWidth::Min).unwrap(),
            plain.intrinsic_width(&content, IntrinsicWidth::Min).unwrap()
        );
    }
}

#[test]
fn non_positive_width_is_an_error_not_a_panic() {
    let cached = CachedMeasurer::with_default_capacity(LayoutMeasurer::estimated());
    let content = StyledContent::plain("Hello");
    assert_eq!(
        cached.measure_height(&content, 0.0, 0),
        Err(TextError::InvalidWidth(0.0))
    );
    assert!(cached.is_empty());
}

#[test]
fn empty_content_measures_zero() {
    let measurer = LayoutMeasurer::estimated();
    assert_eq!(measurer.measure_height(&StyledContent::empty(), 100.0, 0).unwrap(), 0.0);
}
