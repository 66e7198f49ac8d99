use normalizer::normalize_legacy;
use once_cell::sync::Lazy;
use regex::Regex;
use taxonomy::Concept;

use crate::config::FieldWeights;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("static BM25 word regex"));

pub(crate) fn tokenize(text: &str) -> Vec<String> {
    let norm = normalize_legacy(text);
    WORD.find_iter(&norm).map(|m| m.as_str().to_string()).collect()
}

/// Builds the BM25 document (token stream) for `concept` in `lang`: every
/// weighted field's values are tokenized and repeated
/// `FieldWeights::repeat_count` times, in field-declaration order. An empty
/// result degrades to a single empty token so every concept still gets a
/// document, preserving row alignment with the id list.
pub fn build_document(concept: &Concept, lang: &str, weights: &FieldWeights) -> Vec<String> {
    let mut tokens = Vec::new();

    let mut push_field = |values: &[String], weight: f32| {
        let repeat = FieldWeights::repeat_count(weight);
        for value in values {
            if value.is_empty() {
                continue;
            }
            let piece_tokens = tokenize(value);
            for _ in 0..repeat {
                tokens.extend(piece_tokens.iter().cloned());
            }
        }
    };

    if let Some(pref) = concept.pref_label.get(lang) {
        push_field(std::slice::from_ref(pref), weights.pref_label);
    }
    if let Some(alt) = concept.alt_label.get(lang) {
        push_field(alt, weights.alt_label);
    }
    if let Some(hidden) = concept.hidden_label.get(lang) {
        push_field(hidden, weights.hidden_label);
    }
    if let Some(Some(def)) = concept.definition.get(lang) {
        push_field(std::slice::from_ref(def), weights.definition);
    }
    if let Some(Some(scope)) = concept.scope_note.get(lang) {
        push_field(std::slice::from_ref(scope), weights.scope_note);
    }
    if let Some(Some(note)) = concept.note.get(lang) {
        push_field(std::slice::from_ref(note), weights.note);
    }
    if let Some(example) = concept.example.get(lang) {
        push_field(example, weights.example);
    }
    if let Some(path) = concept.path.get(lang) {
        push_field(path, weights.path);
    }

    if tokens.is_empty() {
        tokens.push(String::new());
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn concept() -> Concept {
        let mut pref_label = HashMap::new();
        pref_label.insert("es".to_string(), "Chocolate caliente".to_string());
        let mut alt_label = HashMap::new();
        alt_label.insert("es".to_string(), vec!["Cacao".to_string()]);
        Concept {
            id: "c1".into(),
            uri: "c1".into(),
            in_scheme: vec![],
            pref_label,
            alt_label,
            hidden_label: HashMap::new(),
            definition: HashMap::new(),
            scope_note: HashMap::new(),
            note: HashMap::new(),
            example: HashMap::new(),
            path: HashMap::new(),
            broader: vec![],
            narrower: vec![],
            exact_match: vec![],
            close_match: vec![],
            related: vec![],
        }
    }

    #[test]
    fn pref_label_repeats_four_times_at_default_weight() {
        let c = concept();
        let doc = build_document(&c, "es", &FieldWeights::default());
        let choco_count = doc.iter().filter(|t| *t == "chocolate").count();
        assert_eq!(choco_count, 4);
    }

    #[test]
    fn alt_label_contributes_tokens() {
        let c = concept();
        let doc = build_document(&c, "es", &FieldWeights::default());
        assert!(doc.iter().any(|t| t == "cacao"));
    }

    #[test]
    fn missing_language_degrades_to_single_empty_token() {
        let c = concept();
        let doc = build_document(&c, "fr", &FieldWeights::default());
        assert_eq!(doc, vec![String::new()]);
    }
}
