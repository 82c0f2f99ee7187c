//! Personal and reflexive pronoun paradigms.
//!
//! Pronoun tables on the site carry no form-of markup, so their forms come
//! from this closed table instead of the page. Cells hold comma-separated
//! free variants (`его́, него́`: the н-form follows prepositions).
//!
//! Empty cells produce no key. The reflexive `себя́` has no nominative, so
//! its paradigm has five cells and no `nom n` entry. The first- and
//! second-person accusatives are `меня́` and `тебя́`, identical to the
//! genitives.

use std::collections::HashMap;

use lazy_static::lazy_static;
use unicode_normalization::UnicodeNormalization;

use crate::forms::FormTable;

/// U+0301, the stress mark used on headwords and forms.
pub const COMBINING_ACUTE: char = '\u{0301}';

/// Output key for each column of [`PRONOUN_PARADIGM`], in column order.
pub const CASE_KEYS: [&str; 6] = ["nom n", "gen n", "dat n", "acc n", "ins n", "pre n"];

/// Columns: nominative, genitive, dative, accusative, instrumental,
/// prepositional. Rows: я, ты, он, оно́, она́, мы, вы, они́, себя́.
/// The reflexive has no nominative.
pub static PRONOUN_PARADIGM: [[&str; 9]; 6] = [
    ["я", "ты", "он", "оно́", "она́", "мы", "вы", "они́", ""],
    ["меня́", "тебя́", "его́, него́", "его́, него́", "её, неё", "нас", "вас", "их, них", "себя́"],
    ["мне", "тебе́", "ему́, нему́", "ему́, нему́", "ей, ней", "нам", "вам", "им, ним", "себе́"],
    ["меня́", "тебя́", "его́, него́", "его́, него́", "её, неё", "нас", "вас", "их, них", "себя́"],
    ["мной, мно́ю", "тобо́й, тобо́ю", "им, ним", "им, ним", "ей, ней", "на́ми", "ва́ми", "и́ми, ни́ми", "собо́й"],
    ["мне", "тебе́", "нём", "нём", "ней", "нас", "вас", "них", "себе́"],
];

lazy_static! {
    /// Every unstressed form in the table to its row. Forms shared by
    /// several rows resolve to the last row scanned (column by column).
    static ref PRONOUN_INDEX: HashMap<String, usize> = {
        let mut index = HashMap::new();
        for column in PRONOUN_PARADIGM.iter() {
            for (row, cell) in column.iter().enumerate() {
                for form in split_cell(cell) {
                    index.insert(strip_stress(form), row);
                }
            }
        }
        index
    };
}

fn split_cell(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(", ").filter(|form| !form.is_empty())
}

/// Remove stress marks, leaving other diacritics (ё, й) intact.
pub fn strip_stress(s: &str) -> String {
    s.nfd().filter(|c| *c != COMBINING_ACUTE).nfc().collect()
}

/// Row of the pronoun whose paradigm contains `word`, ignoring stress.
pub fn pronoun_row(word: &str) -> Option<usize> {
    PRONOUN_INDEX.get(&strip_stress(word.trim())).copied()
}

/// Build the case table for a pronoun headword. Returns an empty table
/// when the headword is not one of the known pronouns.
pub fn build_pronoun_forms(headword: &str) -> FormTable {
    let mut forms = FormTable::new();
    let Some(row) = pronoun_row(headword) else {
        return forms;
    };

    for (key, column) in CASE_KEYS.iter().zip(PRONOUN_PARADIGM.iter()) {
        for form in split_cell(column[row]) {
            forms.push(*key, form);
        }
    }
    forms
}

#[cfg(test)]
mod pronoun_tests {
    use super::*;

    fn strings(forms: &[&str]) -> Vec<String> {
        forms.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn strip_stress_keeps_yo_and_short_i() {
        assert_eq!(strip_stress("она́"), "она");
        assert_eq!(strip_stress("её"), "её");
        assert_eq!(strip_stress("мой"), "мой");
        assert_eq!(strip_stress("и́ми"), "ими");
    }

    #[test]
    fn lookup_is_stress_insensitive() {
        assert_eq!(pronoun_row("она́"), Some(4));
        assert_eq!(pronoun_row("она"), Some(4));
    }

    #[test]
    fn oblique_form_resolves_to_its_row() {
        assert_eq!(pronoun_row("меня́"), Some(0));
        assert_eq!(pronoun_row("собой"), Some(8));
    }

    #[test]
    fn shared_forms_resolve_to_last_row_scanned() {
        // его́ appears for both он and оно́.
        assert_eq!(pronoun_row("его"), Some(3));
    }

    #[test]
    fn he_genitive_has_both_variants() {
        let forms = build_pronoun_forms("он");
        assert_eq!(forms.get("gen n"), Some(strings(&["его́", "него́"]).as_slice()));
        assert_eq!(forms.get("nom n"), Some(strings(&["он"]).as_slice()));
        assert_eq!(forms.get("pre n"), Some(strings(&["нём"]).as_slice()));
    }

    #[test]
    fn all_six_cases_emitted() {
        let forms = build_pronoun_forms("мы");
        assert_eq!(forms.keys().collect::<Vec<_>>().len(), 6);
        for key in CASE_KEYS {
            assert!(forms.contains_key(key), "missing {}", key);
        }
    }

    #[test]
    fn reflexive_has_no_nominative() {
        let forms = build_pronoun_forms("себя́");
        assert!(!forms.contains_key("nom n"));
        assert_eq!(forms.len(), 5);
        assert_eq!(forms.get("ins n"), Some(strings(&["собо́й"]).as_slice()));
    }

    #[test]
    fn first_and_second_person_accusatives() {
        let me = build_pronoun_forms("я");
        assert_eq!(me.get("acc n"), Some(strings(&["меня́"]).as_slice()));
        assert_eq!(me.get("acc n"), me.get("gen n"));

        let you = build_pronoun_forms("ты");
        assert_eq!(you.get("acc n"), Some(strings(&["тебя́"]).as_slice()));
        assert_eq!(pronoun_row("мене"), None);
    }

    #[test]
    fn unknown_headword_yields_nothing() {
        assert!(build_pronoun_forms("дом").is_empty());
        assert!(build_pronoun_forms("").is_empty());
    }
}
