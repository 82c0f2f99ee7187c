//! Paradigm category detection.
//!
//! Inflection tables carry no explicit part-of-speech flag, so the grammar
//! is inferred from the feature vocabulary of the first span that matches
//! one of a fixed, ordered list of rules.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tags::TableSpans;

/// Which paradigm grammar applies to a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParadigmKind {
    Verb,
    Noun,
    #[serde(rename = "adj")]
    Adjective,
    Pronoun,
}

impl ParadigmKind {
    pub fn label(self) -> &'static str {
        match self {
            ParadigmKind::Verb => "verb",
            ParadigmKind::Noun => "noun",
            ParadigmKind::Adjective => "adj",
            ParadigmKind::Pronoun => "pronoun",
        }
    }
}

impl fmt::Display for ParadigmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

type Rule = (fn(&[&str]) -> bool, ParadigmKind);

fn starts_with_infinitive(tokens: &[&str]) -> bool {
    tokens.first() == Some(&"inf")
}

fn is_bare_nominative(tokens: &[&str]) -> bool {
    matches!(tokens, ["nom"])
}

fn has_shared_masc_neut_agreement(tokens: &[&str]) -> bool {
    tokens.get(1) == Some(&"m//n")
}

fn has_singular_number(tokens: &[&str]) -> bool {
    tokens.get(1) == Some(&"s")
}

// Order matters: `inf` is unambiguous and wins, and `m//n` must be seen
// before the generic singular marker.
const RULES: [Rule; 4] = [
    (starts_with_infinitive, ParadigmKind::Verb),
    (is_bare_nominative, ParadigmKind::Noun),
    (has_shared_masc_neut_agreement, ParadigmKind::Adjective),
    (has_singular_number, ParadigmKind::Noun),
];

/// Pick the paradigm grammar for one table, or `None` if nothing matches.
///
/// A table with no form-of spans but some plain Cyrillic spans is taken to
/// be a pronoun table.
pub fn classify(spans: &TableSpans) -> Option<ParadigmKind> {
    for span in &spans.form_of {
        let tokens = span.tokens();
        if let Some((_, kind)) = RULES.iter().find(|(applies, _)| applies(tokens.as_slice())) {
            return Some(*kind);
        }
    }

    if spans.form_of.is_empty() && !spans.cyrillic.is_empty() {
        return Some(ParadigmKind::Pronoun);
    }

    None
}

#[cfg(test)]
mod classify_tests {
    use super::*;
    use crate::tags::AnnotatedSpan;

    fn table(codes: &[&str]) -> TableSpans {
        TableSpans::from_form_of(
            codes
                .iter()
                .map(|code| AnnotatedSpan::new(format!("{}-form-of", code), "x"))
                .collect(),
        )
    }

    #[test]
    fn infinitive_selects_verb() {
        assert_eq!(classify(&table(&["inf", "pres|1|s"])), Some(ParadigmKind::Verb));
    }

    #[test]
    fn infinitive_wins_even_after_non_matching_spans() {
        assert_eq!(classify(&table(&["pres|act|part", "inf"])), Some(ParadigmKind::Verb));
    }

    #[test]
    fn bare_nominative_selects_noun() {
        assert_eq!(classify(&table(&["nom", "gen"])), Some(ParadigmKind::Noun));
    }

    #[test]
    fn shared_masc_neut_selects_adjective() {
        assert_eq!(classify(&table(&["nom|m//n", "nom|f"])), Some(ParadigmKind::Adjective));
    }

    #[test]
    fn singular_marker_selects_noun() {
        assert_eq!(classify(&table(&["nom|s", "nom|p"])), Some(ParadigmKind::Noun));
    }

    #[test]
    fn first_matching_span_decides() {
        // A noun-looking span ahead of the m//n span fixes the category.
        assert_eq!(classify(&table(&["gen|s", "nom|m//n"])), Some(ParadigmKind::Noun));
        assert_eq!(classify(&table(&["nom|m//n", "gen|s"])), Some(ParadigmKind::Adjective));
    }

    #[test]
    fn single_unknown_token_is_not_a_match() {
        assert_eq!(classify(&table(&["gen"])), None);
    }

    #[test]
    fn no_rule_matches() {
        assert_eq!(classify(&table(&["gen|p", "dat|f"])), None);
    }

    #[test]
    fn cyrillic_fallback_selects_pronoun() {
        let spans = TableSpans {
            form_of: vec![],
            cyrillic: vec!["меня́".to_string()],
        };
        assert_eq!(classify(&spans), Some(ParadigmKind::Pronoun));
    }

    #[test]
    fn cyrillic_fallback_ignored_when_form_of_present() {
        let mut spans = table(&["gen|p"]);
        spans.cyrillic.push("меня́".to_string());
        assert_eq!(classify(&spans), None);
    }

    #[test]
    fn empty_table_has_no_category() {
        assert_eq!(classify(&TableSpans::default()), None);
    }

    #[test]
    fn adjective_serializes_as_adj() {
        assert_eq!(serde_json::to_string(&ParadigmKind::Adjective).unwrap(), "\"adj\"");
        assert_eq!(ParadigmKind::Verb.to_string(), "verb");
    }
}
