//! Form tables and the verb, noun and adjective builders.
//!
//! Each builder turns the form-of spans of one table into a mapping from
//! paradigm cell key to the surface forms attested for that cell. Key
//! vocabulary per paradigm:
//!
//! - verb: `inf`, `<tense> <person><number>` for `pres`/`fut`/`imp`,
//!   `past <gender>s`, `past p`, and `<tense> <act|pas|adv> pp` for
//!   participles.
//! - noun: `<case> n` or `<case> n<qualifier>`.
//! - adjective: `<case> am`, `<case> an`, `<case> af`, `<case> ap`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classify::ParadigmKind;
use crate::error::ExtractError;
use crate::tags::AnnotatedSpan;

/// Paradigm cell key to surface forms.
///
/// Keys are kept sorted so two tables with the same content serialize
/// identically; each key's forms stay in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormTable(BTreeMap<String, Vec<String>>);

impl FormTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one form to a key, keeping any forms already recorded.
    pub fn push(&mut self, key: impl Into<String>, form: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(form.into());
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = FormTable::new();
        for (key, form) in iter {
            table.push(key, form);
        }
        table
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Verbs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tense {
    Inf,
    Pres,
    Past,
    Fut,
    Imp,
}

impl Tense {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "inf" => Some(Tense::Inf),
            "pres" => Some(Tense::Pres),
            "past" => Some(Tense::Past),
            "fut" => Some(Tense::Fut),
            "imp" => Some(Tense::Imp),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Tense::Inf => "inf",
            Tense::Pres => "pres",
            Tense::Past => "past",
            Tense::Fut => "fut",
            Tense::Imp => "imp",
        }
    }
}

/// Feature slots read off one verb span. Later tokens overwrite earlier
/// ones, except the participle kind where the first flag wins.
#[derive(Debug, Default)]
struct VerbFeatures<'a> {
    tense: Option<Tense>,
    gender: Option<&'a str>,
    person: Option<&'a str>,
    number: Option<&'a str>,
    participle: Option<&'static str>,
}

impl<'a> VerbFeatures<'a> {
    fn decode(tokens: &[&'a str]) -> Self {
        let mut features = VerbFeatures::default();
        for &token in tokens {
            match token {
                "inf" | "pres" | "past" | "fut" | "imp" => features.tense = Tense::from_token(token),
                "m" | "f" | "n" => features.gender = Some(token),
                "1" | "2" | "3" => features.person = Some(token),
                "s" | "p" => features.number = Some(token),
                "act" | "pass" | "adv" if features.participle.is_none() => {
                    features.participle = Some(match token {
                        "act" => "act",
                        "pass" => "pas",
                        _ => "adv",
                    });
                }
                _ => {}
            }
        }
        features
    }

    fn key(&self, feature_code: &str) -> Result<String, ExtractError> {
        let shape = |reason| ExtractError::input_shape(ParadigmKind::Verb, feature_code, reason);

        let tense = self.tense.ok_or_else(|| shape("no tense token"))?;
        match (tense, self.participle) {
            (Tense::Inf, _) => Ok("inf".to_string()),
            (_, Some(participle)) => Ok(format!("{} {} pp", tense.as_str(), participle)),
            (Tense::Pres | Tense::Fut | Tense::Imp, None) => {
                let person = self.person.ok_or_else(|| shape("finite form without person"))?;
                let number = self.number.ok_or_else(|| shape("finite form without number"))?;
                Ok(format!("{} {}{}", tense.as_str(), person, number))
            }
            (Tense::Past, None) => match self.number {
                Some("s") => {
                    let gender = self.gender.ok_or_else(|| shape("past singular without gender"))?;
                    Ok(format!("past {}s", gender))
                }
                Some(_) => Ok("past p".to_string()),
                None => Err(shape("past form without number")),
            },
        }
    }
}

/// Build a verb conjugation table.
///
/// When any present-tense cell is attested, every future-tense cell is
/// dropped: a perfective verb's present forms already serve as its future,
/// and the periphrastic future rows are redundant.
pub fn build_verb_forms(spans: &[AnnotatedSpan]) -> Result<FormTable, ExtractError> {
    let mut cells = Vec::with_capacity(spans.len());
    for span in spans {
        let features = VerbFeatures::decode(&span.tokens());
        let key = features.key(&span.feature_code)?;
        cells.push((features.tense, key, span.form()));
    }

    let has_present = cells.iter().any(|(tense, _, _)| *tense == Some(Tense::Pres));

    Ok(cells
        .into_iter()
        .filter(|(tense, _, _)| !(has_present && *tense == Some(Tense::Fut)))
        .map(|(_, key, form)| (key, form))
        .collect())
}

// ─────────────────────────────────────────────────────────────────────────────
// Nouns
// ─────────────────────────────────────────────────────────────────────────────

/// Build a noun declension table. Token 0 is the case; a second token,
/// when present, qualifies the number.
pub fn build_noun_forms(spans: &[AnnotatedSpan]) -> Result<FormTable, ExtractError> {
    let mut forms = FormTable::new();
    for span in spans {
        let tokens = span.tokens();
        let key = match tokens.as_slice() {
            [""] | [] => {
                return Err(ExtractError::input_shape(
                    ParadigmKind::Noun,
                    &span.feature_code,
                    "empty case token",
                ))
            }
            [case] => format!("{} n", case),
            [case, qualifier, ..] => format!("{} n{}", case, qualifier),
        };
        forms.push(key, span.form());
    }
    Ok(forms)
}

// ─────────────────────────────────────────────────────────────────────────────
// Adjectives
// ─────────────────────────────────────────────────────────────────────────────

/// Build an adjective declension table.
///
/// A leading animacy marker (`an`/`in`) is dropped. Masculine and neuter
/// share one surface form under `m//n`, so those spans fill both cells.
pub fn build_adjective_forms(spans: &[AnnotatedSpan]) -> Result<FormTable, ExtractError> {
    let mut forms = FormTable::new();
    for span in spans {
        let tokens = span.tokens();
        let tokens = match tokens.as_slice() {
            ["an" | "in", rest @ ..] => rest,
            all => all,
        };
        let (case, agreement) = match tokens {
            [case, agreement, ..] => (*case, *agreement),
            _ => {
                return Err(ExtractError::input_shape(
                    ParadigmKind::Adjective,
                    &span.feature_code,
                    "missing agreement token",
                ))
            }
        };

        let form = span.form();
        match agreement {
            "p" => forms.push(format!("{} ap", case), form),
            "m//n" => {
                forms.push(format!("{} am", case), form);
                forms.push(format!("{} an", case), form);
            }
            "m" => forms.push(format!("{} am", case), form),
            "n" => forms.push(format!("{} an", case), form),
            _ => forms.push(format!("{} af", case), form),
        }
    }
    Ok(forms)
}



#[cfg(test)]
mod adjective_tests {
    use super::*;

    fn span(code: &str, text: &str) -> AnnotatedSpan {
        AnnotatedSpan::new(format!("{}-form-of", code), text)
    }

    #[test]
    fn shared_masc_neut_fills_both_cells() {
        let forms = build_adjective_forms(&[span("nom|m//n", "но́во")]).unwrap();
        let expected: FormTable = [("nom am", "но́во"), ("nom an", "но́во")].into_iter().collect();
        assert_eq!(forms, expected);
    }

    #[test]
    fn agreement_markers() {
        let forms = build_adjective_forms(&[
            span("nom|m|s", "но́вый"),
            span("nom|n|s", "но́вое"),
            span("nom|f|s", "но́вая"),
            span("nom|p", "но́вые"),
        ])
        .unwrap();
        assert_eq!(forms.get("nom am"), Some(&["но́вый".to_string()][..]));
        assert_eq!(forms.get("nom an"), Some(&["но́вое".to_string()][..]));
        assert_eq!(forms.get("nom af"), Some(&["но́вая".to_string()][..]));
        assert_eq!(forms.get("nom ap"), Some(&["но́вые".to_string()][..]));
    }

    #[test]
    fn animacy_marker_is_dropped() {
        let forms = build_adjective_forms(&[
            span("an|acc|m|s", "но́вого"),
            span("in|acc|m|s", "но́вый"),
        ])
        .unwrap();
        assert_eq!(
            forms.get("acc am"),
            Some(&["но́вого".to_string(), "но́вый".to_string()][..])
        );
    }

    #[test]
    fn unknown_agreement_falls_back_to_feminine() {
        let forms = build_adjective_forms(&[span("ins|f|s", "но́вой"), span("short|zz", "нова́")]).unwrap();
        assert!(forms.contains_key("ins af"));
        assert!(forms.contains_key("short af"));
    }

    #[test]
    fn missing_agreement_is_a_shape_error() {
        let err = build_adjective_forms(&[span("an|nom", "x")]).unwrap_err();
        assert!(matches!(err, ExtractError::InputShape { kind: ParadigmKind::Adjective, .. }));
    }
}
