//! Russian inflectional paradigm extraction from Wiktionary form-of markup.
//!
//! An inflection table is reduced to its grammar-tagged spans, the spans
//! are classified into a verb, noun, adjective or pronoun paradigm, and the
//! matching builder maps each span to a paradigm cell key.

pub mod classify;
pub mod error;
pub mod forms;
pub mod markup;
pub mod paradigm;
pub mod pipeline;
pub mod pronoun;
pub mod schema;
pub mod tags;

pub use classify::{classify, ParadigmKind};
pub use error::{ExtractError, PipelineError, SchemaError};
pub use forms::{build_adjective_forms, build_noun_forms, build_verb_forms, FormTable};
pub use paradigm::{extract_paradigm, Paradigm};
pub use pronoun::build_pronoun_forms;
pub use tags::{decode_tags, AnnotatedSpan, TableSpans};
