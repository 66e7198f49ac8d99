use std::collections::HashMap;

use embeddings::EmbeddingsBackend;

use crate::concept::Concept;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowKind {
    Pref,
    Alt,
}

/// Per-language label embedding matrix: one row per preferred label plus one
/// row per alternate label, used to compute the optional vector-similarity
/// boost during search.
///
/// Built lazily — only worth the memory and compute when a caller's
/// [`crate::config::TaxoConfig::w_vec`] is positive, matching the reference
/// service's "only precompute embeddings if the vector weight is enabled"
/// behavior.
#[derive(Debug, Default)]
pub struct EmbeddingIndex {
    rows: Vec<Vec<f32>>,
    meta: Vec<(String, RowKind)>,
    pref_row_of: HashMap<String, usize>,
}

impl EmbeddingIndex {
    pub fn build<'a>(
        lang: &str,
        concepts: impl Iterator<Item = &'a Concept>,
        backend: &EmbeddingsBackend,
    ) -> Self {
        let mut rows = Vec::new();
        let mut meta = Vec::new();
        let mut pref_row_of = HashMap::new();

        for c in concepts {
            if let Some(pref_text) = c.pref_label_or_any(lang) {
                if !pref_text.is_empty() {
                    let idx = rows.len();
                    rows.push(backend.embed_text(pref_text));
                    meta.push((c.id.clone(), RowKind::Pref));
                    pref_row_of.insert(c.id.clone(), idx);
                }
            }
            for alt in c.alt_label.get(lang).into_iter().flatten() {
                if alt.is_empty() {
                    continue;
                }
                rows.push(backend.embed_text(alt));
                meta.push((c.id.clone(), RowKind::Alt));
            }
        }

        Self {
            rows,
            meta,
            pref_row_of,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cosine similarity between `query_emb` and the row most representative
    /// of `concept_id`: its preferred-label row if one was embedded,
    /// otherwise the best-matching alternate-label row.
    pub fn best_similarity(&self, concept_id: &str, query_emb: &[f32]) -> Option<f32> {
        if let Some(&idx) = self.pref_row_of.get(concept_id) {
            return Some(cosine(&self.rows[idx], query_emb));
        }
        self.meta
            .iter()
            .enumerate()
            .filter(|(_, (id, _))| id == concept_id)
            .map(|(i, _)| cosine(&self.rows[i], query_emb))
            .fold(None, |acc, sim| match acc {
                None => Some(sim),
                Some(best) if sim > best => Some(sim),
                some => some,
            })
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = (a.iter().map(|x| x * x).sum::<f32>()).sqrt() + 1e-8;
    let nb = (b.iter().map(|x| x * x).sum::<f32>()).sqrt() + 1e-8;
    dot / (na * nb)
}
