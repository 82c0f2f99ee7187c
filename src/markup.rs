//! Harvesting annotated spans from rendered inflection-table markup.
//!
//! Only the narrow span convention of the site's inflection tables is
//! handled: `<span class="..." lang="ru">...</span>` elements. Every
//! opening tag is examined on its own, so a Russian span inside a wrapper
//! span is still found. A candidate's text runs to the first `</span>`
//! after it, which means spans nested inside a candidate are not supported.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::tags::{AnnotatedSpan, TableSpans, FORM_OF_SUFFIX};

lazy_static! {
    static ref SPAN_OPEN: Regex = Regex::new(r"<span\b([^>]*)>").unwrap();
    static ref CLASS_ATTR: Regex = Regex::new(r#"\bclass\s*=\s*"([^"]*)""#).unwrap();
    static ref LANG_ATTR: Regex = Regex::new(r#"\blang\s*=\s*"([^"]*)""#).unwrap();
    static ref REFERENCE_PATTERN: Regex =
        Regex::new(r#"(?s)<sup\b[^>]*\bclass\s*=\s*"[^"]*\breference\b[^"]*"[^>]*>.*?</sup>"#).unwrap();
    static ref TAG_PATTERN: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref PRE_REFORM: Regex = Regex::new(r"(?i)\bpre-reform\b").unwrap();
}

const RUSSIAN: &str = "ru";
const SPAN_CLOSE: &str = "</span>";

/// Tables rendered in pre-1918 orthography are labelled "Pre-reform".
pub fn is_pre_reform(table_html: &str) -> bool {
    PRE_REFORM.is_match(table_html)
}

/// Drop citation markers such as `<sup class="reference">[1]</sup>`.
pub fn strip_references(html: &str) -> String {
    REFERENCE_PATTERN.replace_all(html, "").into_owned()
}

/// Visible text of a markup fragment: tags removed, common entities
/// decoded, whitespace trimmed.
pub fn inner_text(fragment: &str) -> String {
    let text = TAG_PATTERN.replace_all(fragment, "");
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

struct RawSpan<'a> {
    classes: Vec<&'a str>,
    lang: Option<&'a str>,
    inner: &'a str,
}

fn scan_spans(html: &str) -> impl Iterator<Item = RawSpan<'_>> {
    SPAN_OPEN.captures_iter(html).filter_map(move |cap| {
        let open = cap.get(0)?;
        let attrs = cap.get(1).map_or("", |m| m.as_str());
        let rest = &html[open.end()..];
        let Some(close) = rest.find(SPAN_CLOSE) else {
            debug!(attrs, "unclosed span");
            return None;
        };
        let inner = &rest[..close];
        let classes = CLASS_ATTR
            .captures(attrs)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().split_whitespace().collect())
            .unwrap_or_default();
        let lang = LANG_ATTR.captures(attrs).and_then(|c| c.get(1)).map(|m| m.as_str());
        Some(RawSpan { classes, lang, inner })
    })
}

fn is_russian_with_class(span: &RawSpan<'_>, class: &str) -> bool {
    span.lang == Some(RUSSIAN) && span.classes.iter().any(|c| *c == class)
}

/// Russian form-of spans, keyed by their pipe-coded class token.
pub fn harvest_form_of_spans(table_html: &str) -> Vec<AnnotatedSpan> {
    let html = strip_references(table_html);
    scan_spans(&html)
        .filter(|span| is_russian_with_class(span, "form-of"))
        .filter_map(|span| {
            let Some(code) = span.classes.iter().find(|c| c.ends_with(FORM_OF_SUFFIX)) else {
                debug!(classes = ?span.classes, "form-of span without a feature code");
                return None;
            };
            Some(AnnotatedSpan::new(*code, inner_text(span.inner)))
        })
        .collect()
}

/// Text of plain Russian Cyrillic-script spans.
pub fn harvest_cyrillic_spans(table_html: &str) -> Vec<String> {
    let html = strip_references(table_html);
    scan_spans(&html)
        .filter(|span| is_russian_with_class(span, "Cyrl"))
        .map(|span| inner_text(span.inner))
        .collect()
}

impl TableSpans {
    /// Collect both span selections from one table's markup.
    pub fn harvest(table_html: &str) -> Self {
        Self {
            form_of: harvest_form_of_spans(table_html),
            cyrillic: harvest_cyrillic_spans(table_html),
        }
    }
}

#[cfg(test)]
mod markup_tests {
    use super::*;

    const VERB_TABLE: &str = r#"<table class="inflection-table inflection-ru inflection-verb">
<tr><th>infinitive</th><td><span class="Cyrl form-of lang-ru inf-form-of" lang="ru"><a href="/wiki/идти">идти́</a></span></td></tr>
<tr><th>1st singular</th><td><span class="Cyrl form-of lang-ru 1|s|pres|ind-form-of" lang="ru">иду́</span><sup class="reference">[1]</sup></td></tr>
<tr><td><span class="Latn form-of lang-ru 1|s|pres|ind-form-of" lang="ru-Latn">idú</span></td></tr>
</table>"#;

    #[test]
    fn harvests_russian_form_of_spans() {
        let spans = harvest_form_of_spans(VERB_TABLE);
        assert_eq!(
            spans,
            vec![
                AnnotatedSpan::new("inf-form-of", "идти́"),
                AnnotatedSpan::new("1|s|pres|ind-form-of", "иду́"),
            ]
        );
    }

    #[test]
    fn transliteration_spans_are_skipped() {
        assert!(harvest_form_of_spans(VERB_TABLE).iter().all(|s| s.text != "idú"));
    }

    #[test]
    fn reference_markers_are_removed() {
        let html = r#"<span class="Cyrl" lang="ru">мне<sup class="reference">[2]</sup></span>"#;
        assert_eq!(harvest_cyrillic_spans(html), vec!["мне".to_string()]);
    }

    #[test]
    fn cyrillic_spans_without_form_of() {
        let html = r#"<table><tr><td><span class="Cyrl" lang="ru">меня́</span></td>
<td><span class="Cyrl" lang="ru">мне</span></td><td><span class="Latn" lang="ru-Latn">mne</span></td></tr></table>"#;
        let spans = TableSpans::harvest(html);
        assert!(spans.form_of.is_empty());
        assert_eq!(spans.cyrillic, vec!["меня́".to_string(), "мне".to_string()]);
    }

    #[test]
    fn spans_inside_a_wrapper_span_are_found() {
        let html = r#"<td><span class="wrap"><span class="Cyrl form-of lang-ru inf-form-of" lang="ru">идти́</span></span></td>"#;
        assert_eq!(
            harvest_form_of_spans(html),
            vec![AnnotatedSpan::new("inf-form-of", "идти́")]
        );
        assert_eq!(harvest_cyrillic_spans(html), vec!["идти́".to_string()]);
    }

    #[test]
    fn unclosed_span_is_ignored() {
        assert!(harvest_cyrillic_spans(r#"<span class="Cyrl" lang="ru">мне"#).is_empty());
    }

    #[test]
    fn entities_are_decoded() {
        assert_eq!(inner_text("<b>a&nbsp;&amp;&nbsp;b</b> "), "a & b");
    }

    #[test]
    fn pre_reform_tables_detected() {
        assert!(is_pre_reform("<div>Pre-reform declension of ...</div>"));
        assert!(!is_pre_reform(VERB_TABLE));
    }
}
