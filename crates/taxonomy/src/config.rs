use serde::{Deserialize, Serialize};

/// Heuristic scoring weights and knobs for [`crate::store::TaxonomyStore`].
///
/// Defaults mirror the reference service's settings: an exact label match
/// dominates, followed by prefix, substring, alternate-label, hidden-label,
/// path and context hits, with the embedding and fuzzy signals contributing
/// only as tie-breaking boosts unless nothing else matched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TaxoConfig {
    pub w_exact: f32,
    pub w_prefix: f32,
    pub w_substring: f32,
    pub w_alt: f32,
    pub w_hidden: f32,
    pub w_path: f32,
    pub w_context: f32,
    pub w_vec: f32,
    pub w_fuzzy: f32,
    /// Minimum `partial_ratio` (0-100) for a fuzzy candidate to be considered.
    pub fuzzy_min_ratio: f32,
    /// Default result count for [`crate::store::TaxonomyStore::search`] when
    /// the caller does not specify one.
    pub default_top_k: usize,
    /// Capacity of the autocomplete LRU cache, in distinct `(lang, query,
    /// limit)` keys.
    pub autocomplete_cache_capacity: usize,
}

impl Default for TaxoConfig {
    fn default() -> Self {
        Self {
            w_exact: 100.0,
            w_prefix: 60.0,
            w_substring: 40.0,
            w_alt: 30.0,
            w_hidden: 20.0,
            w_path: 10.0,
            w_context: 5.0,
            w_vec: 0.0,
            w_fuzzy: 0.0,
            fuzzy_min_ratio: 70.0,
            default_top_k: 25,
            autocomplete_cache_capacity: 256,
        }
    }
}
