//! Spanfit Markup
//!
//! Turns plain text or minimal tagged text into [`StyledContent`] using a set
//! of [`StyleRules`]:
//!
//! - `<b>`, `<i>`, `<u>`, `<a href>` and any configured tag
//! - `<br>` line breaks and `<img src width height>` attachments
//! - optional auto-detection of bare links and phone numbers
//!
//! Malformed markup never fails; the offending fragment is kept as text.
//!
//! # Example
//!
//! ```rust
//! use spanfit_markup::{produce, StyleRules};
//!
//! let rules = StyleRules::default().auto_detect_links(false);
//! let content = produce(r#"Visit <a href="http://x.com">here</a> now"#, &rules);
//!
//! assert_eq!(content.text(), "Visit here now");
//! let links: Vec<_> = content.link_runs().collect();
//! assert_eq!(links.len(), 1);
//! assert_eq!(&content.text()[links[0].range.clone()], "here");
//! ```
//!
//! [`StyledContent`]: spanfit_core::StyledContent

pub mod detect;
pub mod error;
pub mod producer;
pub mod rules;
pub mod tokenizer;

pub use detect::{detect_links, detect_phone_numbers, Detection};
pub use error::RulesError;
pub use producer::{produce, MarkupProducer};
pub use rules::{StyleRules, TagStyle};
pub use tokenizer::{tokenize, Token};
