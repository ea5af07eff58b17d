//! Subcommand implementations

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use spanfit_core::{MeasuredSize, StyleAttributes, StyledContent};
use spanfit_layout::{
    available_width, resolve_url, LayoutStyle, LayoutTree, SizedText, SystemOpener, TapOutcome,
};
use spanfit_markup::MarkupProducer;
use spanfit_text::MeasurementProvider;
use thiserror::Error;

use crate::config::SpanfitConfig;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("no input given; pass text or --file")]
    Missing,

    #[error("byte index {index} is outside the text ({len} bytes)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Where the styled text comes from
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Markup or plain text
    pub text: Option<String>,

    /// Read the text from a file instead
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Treat the input as plain text: no tag parsing
    #[arg(long)]
    pub plain: bool,
}

impl InputArgs {
    pub fn content(&self, config: &SpanfitConfig) -> Result<StyledContent> {
        let source = match (&self.text, &self.file) {
            (Some(text), _) => text.clone(),
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            (None, None) => return Err(InputError::Missing.into()),
        };

        let producer = MarkupProducer::new(config.rules.clone());
        Ok(if self.plain {
            producer.produce_plain(&source)
        } else {
            producer.produce(&source)
        })
    }
}

fn describe(attributes: &StyleAttributes) -> String {
    let mut parts = Vec::new();
    if let Some(font) = &attributes.font {
        parts.push(format!(
            "font={} {}pt w{}{}",
            font.family.as_deref().unwrap_or("system"),
            font.size,
            font.weight,
            if font.italic { " italic" } else { "" }
        ));
    }
    if let Some(color) = attributes.color {
        parts.push(format!("color={color}"));
    }
    if let Some(underline) = attributes.underline {
        parts.push(format!("underline={underline:?}"));
    }
    if let Some(link) = &attributes.link {
        parts.push(format!("link={link}"));
    }
    if let Some(offset) = attributes.baseline_offset {
        parts.push(format!("baseline={offset:+}"));
    }
    if let Some(image) = &attributes.image {
        parts.push(format!("image={} {}x{}", image.name, image.width, image.height));
    }
    if let Some(detection) = &attributes.detection {
        parts.push(format!("detection={detection:?}"));
    }
    parts.join(" ")
}

/// Print the text and its styled runs
pub fn runs(config: &SpanfitConfig, input: &InputArgs, json: bool) -> Result<()> {
    let content = input.content(config)?;

    if json {
        let value = json!({
            "text": content.text(),
            "runs": content.runs(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{:?}", content.text());
    for run in content.runs() {
        let slice = content.slice(run.range.clone()).unwrap_or_default();
        println!(
            "{:>4}..{:<4} {:?} {}",
            run.range.start,
            run.range.end,
            slice,
            describe(&run.attributes)
        );
    }
    Ok(())
}

/// Print the height content needs at a width
pub fn measure(
    config: &SpanfitConfig,
    input: &InputArgs,
    width: f32,
    max_lines: usize,
    json: bool,
) -> Result<()> {
    let content = input.content(config)?;
    let provider = config.provider();
    let height = provider
        .measure_height(&content, width, max_lines)
        .context("Measurement failed")?;

    if json {
        let value = json!({ "width": width, "max_lines": max_lines, "height": height });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{height}");
    }
    Ok(())
}

/// Run the two-pass layout for content in a column (or row) of `width`
pub fn layout(
    config: &SpanfitConfig,
    input: &InputArgs,
    width: f32,
    max_lines: usize,
    row: bool,
    json: bool,
) -> Result<()> {
    let content = input.content(config)?;
    let text = SizedText::new(content, config.provider()).line_limit(max_lines);
    let natural = text.intrinsic_size();

    let mut tree = LayoutTree::new();
    let container = if row {
        LayoutStyle::row_of_width(width)
    } else {
        LayoutStyle::column_of_width(width)
    };
    let root = tree.create_node(container)?;
    let node = tree.create_text(LayoutStyle::text(), text)?;
    tree.add_child(root, node)?;
    let passes = tree.compute_layout(root, available_width(width))?;

    let text = tree.text(node).context("Text node missing after layout")?;
    let render_box = text.render_box().map(MeasuredSize::from);
    let transitions = text.container().transition_count();

    if json {
        let value = json!({
            "passes": passes,
            "natural": natural,
            "render_box": render_box,
            "transitions": transitions,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("natural:     {} x {}", natural.width, natural.height);
        match render_box {
            Some(b) => println!("render box:  {} x {}", b.width, b.height),
            None => println!("render box:  unconstrained"),
        }
        println!("passes:      {passes}");
        println!("transitions: {transitions}");
    }
    Ok(())
}

/// Report, and optionally open, what a tap at a byte index resolves to
pub fn tap(config: &SpanfitConfig, input: &InputArgs, index: usize, open: bool) -> Result<()> {
    let content = input.content(config)?;
    if index >= content.len() {
        return Err(InputError::IndexOutOfRange {
            index,
            len: content.len(),
        }
        .into());
    }

    let Some((range, span)) = content.detection_at(index) else {
        println!("nothing tappable at {index}");
        return Ok(());
    };
    println!(
        "{:?} {:?}",
        content.slice(range).unwrap_or_default(),
        span
    );

    if !open {
        match resolve_url(&span) {
            Ok(Some(url)) => println!("would open {url}"),
            Ok(None) => println!("no URL"),
            Err(err) => println!("unusable URL: {err}"),
        }
        return Ok(());
    }

    let mut text = SizedText::new(content, config.provider()).opener(SystemOpener);
    match text.tap_at(index) {
        TapOutcome::Opened(url) => println!("opened {url}"),
        TapOutcome::Declined(url) => println!("no handler for {url}"),
        TapOutcome::Ignored => println!("no URL"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn inline(text: &str, plain: bool) -> InputArgs {
        InputArgs {
            text: Some(text.to_string()),
            file: None,
            plain,
        }
    }

    #[test]
    fn test_missing_input() {
        let input = InputArgs {
            text: None,
            file: None,
            plain: false,
        };
        let err = input.content(&SpanfitConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::Missing)
        ));
    }

    #[test]
    fn test_plain_keeps_tags_verbatim() {
        let config = SpanfitConfig::default();
        let content = inline("<b>x</b>", true).content(&config).unwrap();
        assert_eq!(content.text(), "<b>x</b>");

        let content = inline("<b>x</b>", false).content(&config).unwrap();
        assert_eq!(content.text(), "x");
    }

    #[test]
    fn test_tap_out_of_range() {
        let err = tap(&SpanfitConfig::default(), &inline("abc", false), 3, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_describe_lists_set_attributes() {
        let attributes = StyleAttributes::new()
            .link("http://x.com")
            .baseline_offset(-2.0);
        assert_eq!(describe(&attributes), "link=http://x.com baseline=-2");
    }
}
