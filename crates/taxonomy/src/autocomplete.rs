use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use normalizer::{normalize, NormalizeOptions};

use crate::concept::Concept;

/// One autocomplete entry: the concept id and a `"pref|<label>"` or
/// `"alt|<label>"` tag identifying which field matched, mirroring the
/// reference service's triple shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub concept_id: String,
    pub tag: String,
}

/// Per-language prefix index for autocomplete: labels sorted by their
/// normalized form so a query resolves to a single binary search plus a
/// forward scan, backed by a small LRU cache of recent `(query, limit)`
/// results.
pub struct AutocompleteIndex {
    norms: Vec<String>,
    entries: Vec<Suggestion>,
    cache: Mutex<LruCache<(String, usize), Vec<Suggestion>>>,
}

impl AutocompleteIndex {
    pub fn build<'a>(
        lang: &str,
        concepts: impl Iterator<Item = &'a Concept>,
        cache_capacity: usize,
    ) -> Self {
        let mut triplets: Vec<(String, Suggestion)> = Vec::new();
        for c in concepts {
            if let Some(pref) = c.pref_label_or_any(lang) {
                if !pref.is_empty() {
                    triplets.push((
                        normalize(pref, NormalizeOptions::default()),
                        Suggestion {
                            concept_id: c.id.clone(),
                            tag: format!("pref|{pref}"),
                        },
                    ));
                }
            }
            for alt in c.alt_label.get(lang).into_iter().flatten() {
                if alt.is_empty() {
                    continue;
                }
                triplets.push((
                    normalize(alt, NormalizeOptions::default()),
                    Suggestion {
                        concept_id: c.id.clone(),
                        tag: format!("alt|{alt}"),
                    },
                ));
            }
        }
        triplets.sort_by(|(an, at), (bn, bt)| {
            an.cmp(bn)
                .then_with(|| at.tag.len().cmp(&bt.tag.len()))
                .then_with(|| at.tag.starts_with("pref|").cmp(&bt.tag.starts_with("pref|")).reverse())
        });

        let norms = triplets.iter().map(|(n, _)| n.clone()).collect();
        let entries = triplets.into_iter().map(|(_, s)| s).collect();
        let capacity = NonZeroUsize::new(cache_capacity.max(1)).unwrap();

        Self {
            norms,
            entries,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Suggestions whose normalized label starts with `query_norm`, most
    /// recently computed results served from an internal LRU cache.
    pub fn suggest(&self, query_norm: &str, limit: usize) -> Vec<Suggestion> {
        let key = (query_norm.to_string(), limit);
        if let Some(hit) = self.cache.lock().expect("autocomplete cache poisoned").get(&key) {
            return hit.clone();
        }

        let start = self.norms.partition_point(|n| n.as_str() < query_norm);
        let mut out = Vec::new();
        for idx in start..self.norms.len() {
            if !self.norms[idx].starts_with(query_norm) {
                break;
            }
            out.push(self.entries[idx].clone());
            if out.len() >= limit {
                break;
            }
        }

        self.cache
            .lock()
            .expect("autocomplete cache poisoned")
            .put(key, out.clone());
        out
    }
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
    fn prefix_match_returns_expected_concept() {
        let concepts = vec![concept("1", "Chocolate"), concept("2", "Vainilla")];
        let idx = AutocompleteIndex::build("es", concepts.iter(), 16);
        let hits = idx.suggest("choc", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].concept_id, "1");
    }

    #[test]
    fn limit_truncates_results() {
        let concepts = vec![
            concept("1", "Choco A"),
            concept("2", "Choco B"),
            concept("3", "Choco C"),
        ];
        let idx = AutocompleteIndex::build("es", concepts.iter(), 16);
        let hits = idx.suggest("choco", 2);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn repeated_query_is_served_from_cache() {
        let concepts = vec![concept("1", "Chocolate")];
        let idx = AutocompleteIndex::build("es", concepts.iter(), 16);
        let first = idx.suggest("choc", 10);
        let second = idx.suggest("choc", 10);
        assert_eq!(first, second);
    }
}
