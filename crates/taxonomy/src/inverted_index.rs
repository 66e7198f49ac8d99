use std::collections::HashMap;

use normalizer::{normalize, NormalizeOptions};

use crate::concept::Concept;

/// Per-language `normalized term -> concept ids` index built over every
/// searchable text field of a concept: preferred/alternate/hidden labels,
/// definition, scope note, note, examples and path segments.
///
/// Built once at load time; `search` intersects this with the query term to
/// produce the candidate set before heuristic scoring runs. Keys are built
/// with the extended normalizer — the same one query-time lookups use — so
/// index-side and query-side terms are always directly comparable; see
/// spec.md §9's note on keeping both sides on one normalizer.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    pub(crate) terms: HashMap<String, Vec<String>>,
}

impl InvertedIndex {
    pub fn build<'a>(lang: &str, concepts: impl Iterator<Item = &'a Concept>) -> Self {
        let mut terms: HashMap<String, Vec<String>> = HashMap::new();
        for c in concepts {
            for text in field_texts(c, lang) {
                let key = normalize(&text, NormalizeOptions::default());
                if key.is_empty() {
                    continue;
                }
                terms.entry(key).or_default().push(c.id.clone());
            }
        }
        Self { terms }
    }

    /// Concept ids whose indexed terms contain `query` as a substring, after
    /// normalization. This is the pre-filter used before the heuristic
    /// scoring pass runs the full rule set per candidate.
    pub fn candidates(&self, query_norm: &str) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for (key, ids) in &self.terms {
            if key.contains(query_norm) {
                for id in ids {
                    if seen.insert(id.clone()) {
                        out.push(id.clone());
                    }
                }
            }
        }
        out
    }
}

fn field_texts(c: &Concept, lang: &str) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(p) = c.pref_label.get(lang) {
        out.push(p.clone());
    }
    out.extend(c.alt_label.get(lang).cloned().unwrap_or_default());
    out.extend(c.hidden_label.get(lang).cloned().unwrap_or_default());
    if let Some(Some(d)) = c.definition.get(lang) {
        out.push(d.clone());
    }
    if let Some(Some(s)) = c.scope_note.get(lang) {
        out.push(s.clone());
    }
    if let Some(Some(n)) = c.note.get(lang) {
        out.push(n.clone());
    }
    out.extend(c.example.get(lang).cloned().unwrap_or_default());
    out.extend(c.path.get(lang).cloned().unwrap_or_default());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as Map;

    fn concept(id: &str, pref: &str) -> Concept {
        let mut pref_label = Map::new();
        pref_label.insert("es".to_string(), pref.to_string());
        Concept {
            id: id.to_string(),
            uri: id.to_string(),
            in_scheme: vec![],
            pref_label,
            alt_label: Map::new(),
            hidden_label: Map::new(),
            definition: Map::new(),
            scope_note: Map::new(),
            note: Map::new(),
            example: Map::new(),
            path: Map::new(),
            broader: vec![],
            narrower: vec![],
            exact_match: vec![],
            close_match: vec![],
            related: vec![],
        }
    }

    #[test]
    fn candidates_finds_substring_match_across_normalized_terms() {
        let concepts = vec![concept("1", "Chocolate"), concept("2", "Vainilla")];
        let idx = InvertedIndex::build("es", concepts.iter());
        let hits = idx.candidates("chocolat");
        assert_eq!(hits, vec!["1".to_string()]);
    }

    #[test]
    fn empty_index_returns_no_candidates() {
        let idx = InvertedIndex::build("es", std::iter::empty());
        assert!(idx.candidates("anything").is_empty());
    }
}
