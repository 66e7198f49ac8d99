use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use embeddings::EmbeddingsBackend;
use normalizer::{normalize, NormalizeOptions};

use crate::autocomplete::{AutocompleteIndex, Suggestion};
use crate::concept::Concept;
use crate::config::TaxoConfig;
use crate::embedding_index::EmbeddingIndex;
use crate::error::TaxonomyError;
use crate::fuzzy::partial_ratio;
use crate::inverted_index::InvertedIndex;

const DEFAULT_LANGS: [&str; 2] = ["es", "en"];

/// An in-memory, load-once, read-many multilingual concept graph: the
/// inverted index, optional label embeddings and autocomplete index for
/// every language present in the loaded `taxonomy.json`, plus heuristic
/// search and prefix autocomplete over them.
pub struct TaxonomyStore {
    cfg: TaxoConfig,
    embeddings: Arc<EmbeddingsBackend>,
    concepts: HashMap<String, Concept>,
    langs: Vec<String>,
    inverted: HashMap<String, InvertedIndex>,
    embedding_idx: HashMap<String, EmbeddingIndex>,
    autocomplete_idx: HashMap<String, AutocompleteIndex>,
}

impl TaxonomyStore {
    /// Reads `path` (a JSON array of concept rows), builds every per-language
    /// index, and returns the ready-to-query store.
    ///
    /// The label embedding matrices are only built when
    /// [`TaxoConfig::w_vec`] is positive — matching the reference service,
    /// which treats embedding the entire vocabulary as an opt-in cost.
    pub fn load(
        path: &Path,
        cfg: TaxoConfig,
        embeddings: Arc<EmbeddingsBackend>,
    ) -> Result<Self, TaxonomyError> {
        let text = fs::read_to_string(path).map_err(|e| TaxonomyError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let rows: Vec<serde_json::Value> =
            serde_json::from_str(&text).map_err(|e| TaxonomyError::Parse {
                path: path.display().to_string(),
                source: e,
            })?;

        // First pass: collect languages from whatever `prefLabel` objects
        // name explicitly, so broadcast fields land on the right key set.
        let mut langs: Vec<String> = {
            let mut set = HashSet::new();
            for row in &rows {
                if let Some(serde_json::Value::Object(pref)) = row.get("prefLabel") {
                    set.extend(pref.keys().cloned());
                }
            }
            if set.is_empty() {
                DEFAULT_LANGS.iter().map(|s| s.to_string()).collect()
            } else {
                let mut v: Vec<String> = set.into_iter().collect();
                v.sort();
                v
            }
        };
        langs.sort();
        langs.dedup();

        let mut concepts = HashMap::new();
        for row in rows {
            let concept = Concept::from_row(row, &langs)?;
            concepts.insert(concept.id.clone(), concept);
        }

        let mut inverted = HashMap::new();
        let mut embedding_idx = HashMap::new();
        let mut autocomplete_idx = HashMap::new();
        for lang in &langs {
            inverted.insert(
                lang.clone(),
                InvertedIndex::build(lang, concepts.values()),
            );
            if cfg.w_vec > 0.0 {
                embedding_idx.insert(
                    lang.clone(),
                    EmbeddingIndex::build(lang, concepts.values(), &embeddings),
                );
            }
            autocomplete_idx.insert(
                lang.clone(),
                AutocompleteIndex::build(lang, concepts.values(), cfg.autocomplete_cache_capacity),
            );
        }

        Ok(Self {
            cfg,
            embeddings,
            concepts,
            langs,
            inverted,
            embedding_idx,
            autocomplete_idx,
        })
    }

    pub fn concept(&self, id: &str) -> Option<&Concept> {
        self.concepts.get(id)
    }

    pub fn languages(&self) -> &[String] {
        &self.langs
    }

    /// Every loaded concept, in arbitrary (hash map) order. Used by
    /// callers that build their own per-language index over the store's
    /// concepts, such as the BM25 index.
    pub fn concepts_iter(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.values()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.concepts.contains_key(id)
    }

    /// Resolves `id`'s display label and path for `lang`, falling back to
    /// the first present language when `lang` is absent for that concept
    /// (spec.md §4.8 step 7).
    pub fn resolve_label_and_path(&self, id: &str, lang: &str) -> Option<(String, Vec<String>)> {
        let c = self.concepts.get(id)?;
        let label = c
            .pref_label
            .get(lang)
            .or_else(|| c.pref_label.values().next())
            .cloned()
            .unwrap_or_default();
        let path = c
            .path
            .get(lang)
            .or_else(|| c.path.values().next())
            .cloned()
            .unwrap_or_default();
        Some((label, path))
    }

    fn resolve_lang<'a, V>(&'a self, lang: &'a str, pool: &'a HashMap<String, V>) -> &'a str {
        if pool.contains_key(lang) {
            lang
        } else {
            self.langs.first().map(String::as_str).unwrap_or(lang)
        }
    }

    /// Heuristic concept search: exact/prefix/substring label matches rank
    /// highest, followed by alternate/hidden label, path, and
    /// definition/scope/note/example hits. When nothing matches and fuzzy
    /// search is enabled, falls back to a fuzzy-ratio pass over every
    /// preferred label; otherwise a fuzzy boost and/or vector-similarity
    /// boost are added on top of the base candidates. Ties break on the
    /// shorter preferred label.
    pub fn search(&self, query: &str, lang: &str, limit: Option<usize>) -> Vec<Concept> {
        let lang = self.resolve_lang(lang, &self.inverted).to_string();
        let query_norm = normalize(query, NormalizeOptions::default());
        if query_norm.is_empty() {
            return Vec::new();
        }

        let mut scores: HashMap<String, f32> = HashMap::new();
        let inv = match self.inverted.get(&lang) {
            Some(inv) => inv,
            None => return Vec::new(),
        };

        for cid in inv.candidates(&query_norm) {
            let Some(c) = self.concepts.get(&cid) else {
                continue;
            };
            let base = self.rule_score(c, &lang, &query_norm);
            if base <= 0.0 {
                continue;
            }
            let entry = scores.entry(cid).or_insert(0.0);
            if base > *entry {
                *entry = base;
            }
        }

        if scores.is_empty() && self.cfg.w_fuzzy > 0.0 {
            for (cid, c) in &self.concepts {
                let Some(pref) = c.pref_label_or_any(&lang) else {
                    continue;
                };
                let pref_norm = normalize(pref, NormalizeOptions::default());
                let ratio = partial_ratio(&query_norm, &pref_norm);
                if ratio >= self.cfg.fuzzy_min_ratio {
                    scores.insert(cid.clone(), (ratio / 100.0) * self.cfg.w_fuzzy);
                }
            }
        } else if !scores.is_empty() {
            if self.cfg.w_vec > 0.0 {
                if let Some(idx) = self.embedding_idx.get(&lang) {
                    if !idx.is_empty() {
                        let q_emb = self.embeddings.embed_text(query);
                        for (cid, score) in scores.iter_mut() {
                            if let Some(sim) = idx.best_similarity(cid, &q_emb) {
                                let sim01 = (sim + 1.0) / 2.0;
                                *score += sim01 * self.cfg.w_vec;
                            }
                        }
                    }
                }
            }
            if self.cfg.w_fuzzy > 0.0 {
                for (cid, score) in scores.iter_mut() {
                    let Some(c) = self.concepts.get(cid) else {
                        continue;
                    };
                    let Some(pref) = c.pref_label_or_any(&lang) else {
                        continue;
                    };
                    let pref_norm = normalize(pref, NormalizeOptions::default());
                    let ratio = partial_ratio(&query_norm, &pref_norm);
                    if ratio >= self.cfg.fuzzy_min_ratio {
                        *score += (ratio / 100.0) * self.cfg.w_fuzzy;
                    }
                }
            }
        }

        if scores.is_empty() {
            return Vec::new();
        }

        let mut ordered: Vec<(String, f32)> = scores.into_iter().collect();
        ordered.sort_by(|(aid, asc), (bid, bsc)| {
            bsc.partial_cmp(asc)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    let alen = self
                        .concepts
                        .get(aid)
                        .and_then(|c| c.pref_label.get(&lang))
                        .map(String::len)
                        .unwrap_or(0);
                    let blen = self
                        .concepts
                        .get(bid)
                        .and_then(|c| c.pref_label.get(&lang))
                        .map(String::len)
                        .unwrap_or(0);
                    alen.cmp(&blen)
                })
        });

        let limit = limit.unwrap_or(self.cfg.default_top_k);
        ordered
            .into_iter()
            .take(limit)
            .filter_map(|(cid, _)| self.concepts.get(&cid).cloned())
            .collect()
    }

    fn rule_score(&self, c: &Concept, lang: &str, query_norm: &str) -> f32 {
        let mut base = 0.0;
        let pref_norm = c
            .pref_label
            .get(lang)
            .map(|p| normalize(p, NormalizeOptions::default()))
            .unwrap_or_default();

        if pref_norm == query_norm {
            base += self.cfg.w_exact;
        } else if pref_norm.starts_with(query_norm) {
            base += self.cfg.w_prefix;
        } else if pref_norm.contains(query_norm) {
            base += self.cfg.w_substring;
        }

        if c.alt_label
            .get(lang)
            .into_iter()
            .flatten()
            .any(|a| normalize(a, NormalizeOptions::default()).contains(query_norm))
        {
            base += self.cfg.w_alt;
        }
        if c.hidden_label
            .get(lang)
            .into_iter()
            .flatten()
            .any(|h| normalize(h, NormalizeOptions::default()).contains(query_norm))
        {
            base += self.cfg.w_hidden;
        }
        if c.path
            .get(lang)
            .into_iter()
            .flatten()
            .any(|p| normalize(p, NormalizeOptions::default()).contains(query_norm))
        {
            base += self.cfg.w_path;
        }

        let context_hit = [c.definition.get(lang), c.scope_note.get(lang), c.note.get(lang)]
            .into_iter()
            .flatten()
            .flatten()
            .any(|d| normalize(d, NormalizeOptions::default()).contains(query_norm))
            || c.example
                .get(lang)
                .into_iter()
                .flatten()
                .any(|ex| normalize(ex, NormalizeOptions::default()).contains(query_norm));
        if context_hit {
            base += self.cfg.w_context;
        }

        base
    }

    /// Prefix-match autocomplete suggestions for `query`, served from a
    /// per-language LRU cache.
    pub fn autocomplete(&self, query: &str, lang: &str, limit: usize) -> Vec<Suggestion> {
        let lang = self.resolve_lang(lang, &self.autocomplete_idx);
        let query_norm = normalize(query, NormalizeOptions::default());
        if query_norm.is_empty() {
            return Vec::new();
        }
        match self.autocomplete_idx.get(lang) {
            Some(idx) => idx.suggest(&query_norm, limit),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_fixture(json: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(json.as_bytes()).unwrap();
        f
    }

    fn fixture() -> NamedTempFile {
        write_fixture(
            r#"[
                {"id": "c1", "prefLabel": {"es": "Chocolate", "en": "Chocolate"}, "altLabel": {"es": ["Cacao"]}},
                {"id": "c2", "prefLabel": {"es": "Vainilla", "en": "Vanilla"}}
            ]"#,
        )
    }

    #[test]
    fn exact_match_outranks_substring_match() {
        let f = fixture();
        let store = TaxonomyStore::load(
            f.path(),
            TaxoConfig::default(),
            Arc::new(EmbeddingsBackend::default()),
        )
        .unwrap();
        let hits = store.search("chocolate", "es", None);
        assert_eq!(hits.first().unwrap().id, "c1");
    }

    #[test]
    fn alt_label_is_searchable() {
        let f = fixture();
        let store = TaxonomyStore::load(
            f.path(),
            TaxoConfig::default(),
            Arc::new(EmbeddingsBackend::default()),
        )
        .unwrap();
        let hits = store.search("cacao", "es", None);
        assert_eq!(hits.first().unwrap().id, "c1");
    }

    #[test]
    fn unknown_language_falls_back_to_first_available() {
        let f = fixture();
        let store = TaxonomyStore::load(
            f.path(),
            TaxoConfig::default(),
            Arc::new(EmbeddingsBackend::default()),
        )
        .unwrap();
        let hits = store.search("chocolate", "fr", None);
        assert!(!hits.is_empty());
    }

    #[test]
    fn empty_query_returns_no_results() {
        let f = fixture();
        let store = TaxonomyStore::load(
            f.path(),
            TaxoConfig::default(),
            Arc::new(EmbeddingsBackend::default()),
        )
        .unwrap();
        assert!(store.search("", "es", None).is_empty());
    }

    #[test]
    fn no_match_without_fuzzy_returns_empty() {
        let f = fixture();
        let store = TaxonomyStore::load(
            f.path(),
            TaxoConfig::default(),
            Arc::new(EmbeddingsBackend::default()),
        )
        .unwrap();
        assert!(store.search("xyzzy", "es", None).is_empty());
    }

    #[test]
    fn fuzzy_fallback_finds_near_miss_when_enabled() {
        let f = fixture();
        let mut cfg = TaxoConfig::default();
        cfg.w_fuzzy = 50.0;
        cfg.fuzzy_min_ratio = 60.0;
        let store = TaxonomyStore::load(f.path(), cfg, Arc::new(EmbeddingsBackend::default())).unwrap();
        let hits = store.search("chocolat", "es", None);
        assert_eq!(hits.first().unwrap().id, "c1");
    }

    #[test]
    fn autocomplete_returns_prefix_matches() {
        let f = fixture();
        let store = TaxonomyStore::load(
            f.path(),
            TaxoConfig::default(),
            Arc::new(EmbeddingsBackend::default()),
        )
        .unwrap();
        let hits = store.autocomplete("choc", "es", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].concept_id, "c1");
    }

    #[test]
    fn concept_lookup_by_id() {
        let f = fixture();
        let store = TaxonomyStore::load(
            f.path(),
            TaxoConfig::default(),
            Arc::new(EmbeddingsBackend::default()),
        )
        .unwrap();
        assert_eq!(store.concept("c1").unwrap().uri, "c1");
        assert!(store.concept("missing").is_none());
    }
}
