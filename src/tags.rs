//! Form-of span data and feature-code decoding.
//!
//! A form-of span carries its grammatical features as a single pipe-coded
//! class token, e.g. `1|s|pres|ind-form-of`. Decoding strips the trailing
//! `-form-of` marker and splits the rest on `|`. Token vocabulary is not
//! checked here; builders ignore tokens they don't know.

use serde::{Deserialize, Serialize};

/// Marker that closes every pipe-coded class token on a form-of span.
pub const FORM_OF_SUFFIX: &str = "-form-of";

/// One grammar-tagged wordform from an inflection table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedSpan {
    pub feature_code: String,
    pub text: String,
}

impl AnnotatedSpan {
    pub fn new(feature_code: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            feature_code: feature_code.into(),
            text: text.into(),
        }
    }

    /// Decoded feature tokens, in markup order.
    pub fn tokens(&self) -> Vec<&str> {
        decode_tags(&self.feature_code)
    }

    /// Surface form with surrounding whitespace removed.
    pub fn form(&self) -> &str {
        self.text.trim()
    }
}

/// Split a feature code into its raw tokens.
pub fn decode_tags(feature_code: &str) -> Vec<&str> {
    feature_code
        .strip_suffix(FORM_OF_SUFFIX)
        .unwrap_or(feature_code)
        .split('|')
        .collect()
}

/// Both span selections taken from one inflection table.
///
/// `form_of` holds the Russian form-of spans; `cyrillic` holds the text of
/// plain Cyrillic spans, consulted only when a table has no form-of spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSpans {
    pub form_of: Vec<AnnotatedSpan>,
    pub cyrillic: Vec<String>,
}

impl TableSpans {
    pub fn from_form_of(form_of: Vec<AnnotatedSpan>) -> Self {
        Self {
            form_of,
            cyrillic: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.form_of.is_empty() && self.cyrillic.is_empty()
    }
}
