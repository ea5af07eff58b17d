//! Tap detections attached to interactive runs

use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What a tap on an interactive range reports to the host
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectedSpan {
    /// A phone number exactly as written in the source text
    PhoneNumber { number: String },
    /// An auto-detected bare URL
    Link { url: String },
    /// A marked-up tag configured as detectable, with its attributes
    CustomTag {
        name: String,
        attributes: IndexMap<String, String>,
    },
    Other,
}

impl DetectedSpan {
    pub fn phone_number(number: impl Into<String>) -> Self {
        Self::PhoneNumber {
            number: number.into(),
        }
    }

    pub fn link(url: impl Into<String>) -> Self {
        Self::Link { url: url.into() }
    }

    pub fn custom_tag(name: impl Into<String>, attributes: IndexMap<String, String>) -> Self {
        Self::CustomTag {
            name: name.into(),
            attributes,
        }
    }

    /// Look up an attribute on a custom tag
    pub fn attribute(&self, key: &str) -> Option<&str> {
        match self {
            Self::CustomTag { attributes, .. } => attributes.get(key).map(String::as_str),
            _ => None,
        }
    }

    pub(crate) fn hash_into<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::PhoneNumber { number } => {
                1u8.hash(state);
                number.hash(state);
            }
            Self::Link { url } => {
                2u8.hash(state);
                url.hash(state);
            }
            Self::CustomTag { name, attributes } => {
                3u8.hash(state);
                name.hash(state);
                for (k, v) in attributes {
                    k.hash(state);
                    v.hash(state);
                }
            }
            Self::Other => 4u8.hash(state),
        }
    }
}
