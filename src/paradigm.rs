//! Extraction entry point: classify one table, then run its builder.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{classify, ParadigmKind};
use crate::error::ExtractError;
use crate::forms::{build_adjective_forms, build_noun_forms, build_verb_forms, FormTable};
use crate::pronoun::build_pronoun_forms;
use crate::tags::TableSpans;

/// Forms extracted for one headword occurrence.
///
/// `kind` is `None` exactly when `forms` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paradigm {
    pub kind: Option<ParadigmKind>,
    pub forms: FormTable,
}

impl Paradigm {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Extract the inflectional paradigm of `headword` from its table spans.
///
/// Pronoun paradigms are reported as [`ParadigmKind::Noun`] so they are
/// stored alongside noun declensions.
pub fn extract_paradigm(headword: &str, spans: &TableSpans) -> Result<Paradigm, ExtractError> {
    let Some(category) = classify(spans) else {
        debug!(headword, spans = spans.form_of.len(), "no paradigm category matched");
        return Ok(Paradigm::none());
    };

    let (forms, kind) = match category {
        ParadigmKind::Verb => (build_verb_forms(&spans.form_of)?, ParadigmKind::Verb),
        ParadigmKind::Noun => (build_noun_forms(&spans.form_of)?, ParadigmKind::Noun),
        ParadigmKind::Adjective => (build_adjective_forms(&spans.form_of)?, ParadigmKind::Adjective),
        ParadigmKind::Pronoun => (build_pronoun_forms(headword), ParadigmKind::Noun),
    };

    if forms.is_empty() {
        debug!(headword, %category, "category matched but no forms were built");
        return Ok(Paradigm::none());
    }

    debug!(headword, %category, cells = forms.len(), "extracted paradigm");
    Ok(Paradigm {
        kind: Some(kind),
        forms,
    })
}
