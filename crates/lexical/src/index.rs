use std::collections::HashMap;

use taxonomy::Concept;

use crate::config::Bm25Config;
use crate::document::build_document;
use crate::error::LexicalError;

const EPS: f32 = 0.25;

/// An Okapi BM25 index built over one language's weighted concept
/// documents. Construction tokenizes every concept once; scoring is pure
/// arithmetic over the resulting term-frequency tables, no further
/// tokenization at query time beyond the query itself.
pub struct Bm25Index {
    ids: Vec<String>,
    doc_term_freqs: Vec<HashMap<String, u32>>,
    doc_lens: Vec<u32>,
    avg_doc_len: f32,
    doc_freq: HashMap<String, u32>,
    idf: HashMap<String, f32>,
    k1: f32,
    b: f32,
}

impl Bm25Index {
    /// Builds the index for `lang` from every concept in `concepts`, in
    /// iteration order; that order becomes the id list `topk` indexes into.
    pub fn build<'a>(
        lang: &str,
        concepts: impl Iterator<Item = &'a Concept>,
        cfg: &Bm25Config,
    ) -> Self {
        let mut ids = Vec::new();
        let mut doc_term_freqs = Vec::new();
        let mut doc_lens = Vec::new();
        let mut doc_freq: HashMap<String, u32> = HashMap::new();

        for c in concepts {
            let tokens = build_document(c, lang, &cfg.fields);
            let mut freqs: HashMap<String, u32> = HashMap::new();
            for t in &tokens {
                *freqs.entry(t.clone()).or_insert(0) += 1;
            }
            for term in freqs.keys() {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            ids.push(c.id.clone());
            doc_lens.push(tokens.len() as u32);
            doc_term_freqs.push(freqs);
        }

        let n = ids.len();
        let avg_doc_len = if n == 0 {
            0.0
        } else {
            doc_lens.iter().sum::<u32>() as f32 / n as f32
        };

        let mut idf: HashMap<String, f32> = HashMap::new();
        for (term, df) in &doc_freq {
            let df = *df as f32;
            let raw = ((n as f32 - df + 0.5) / (df + 0.5)).ln();
            idf.insert(term.clone(), raw);
        }
        let avg_idf = if idf.is_empty() {
            0.0
        } else {
            idf.values().sum::<f32>() / idf.len() as f32
        };
        for value in idf.values_mut() {
            if *value < 0.0 {
                *value = EPS * avg_idf;
            }
        }

        Self {
            ids,
            doc_term_freqs,
            doc_lens,
            avg_doc_len,
            doc_freq,
            idf,
            k1: cfg.k1,
            b: cfg.b,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Raw BM25 score for `query_tokens` against every document, aligned
    /// with the id list in construction order.
    fn scores(&self, query_tokens: &[String]) -> Vec<f32> {
        let mut out = vec![0.0f32; self.ids.len()];
        if self.avg_doc_len <= 0.0 {
            return out;
        }
        for (i, freqs) in self.doc_term_freqs.iter().enumerate() {
            let doc_len = self.doc_lens[i] as f32;
            let mut score = 0.0f32;
            for term in query_tokens {
                let Some(&idf) = self.idf.get(term) else {
                    continue;
                };
                let f = *freqs.get(term).unwrap_or(&0) as f32;
                if f == 0.0 {
                    continue;
                }
                let denom = f + self.k1 * (1.0 - self.b + self.b * doc_len / self.avg_doc_len);
                score += idf * (f * (self.k1 + 1.0)) / denom;
            }
            out[i] = score;
        }
        out
    }

    /// The `k` highest-scoring concept ids for `query_tokens`, with scores
    /// divided by the raw top score (or `1.0` when that top score isn't
    /// positive) and negatives clamped to zero — the normalization fusion
    /// consumes downstream.
    pub fn topk(&self, query_tokens: &[String], k: usize) -> Result<Vec<(String, f32)>, LexicalError> {
        if self.ids.is_empty() {
            return Ok(Vec::new());
        }
        let scores = self.scores(query_tokens);
        let mut ordered: Vec<(usize, f32)> = scores.into_iter().enumerate().collect();
        ordered.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        ordered.truncate(k);

        if ordered.is_empty() {
            return Ok(Vec::new());
        }
        let top = if ordered[0].1 > 0.0 { ordered[0].1 } else { 1.0 };
        Ok(ordered
            .into_iter()
            .map(|(i, s)| (self.ids[i].clone(), (s / top).max(0.0)))
            .collect())
    }

    /// Number of documents containing `term`, for diagnostics.
    pub fn document_frequency(&self, term: &str) -> u32 {
        self.doc_freq.get(term).copied().unwrap_or(0)
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
    fn top_score_is_normalized_to_one() {
        // Three documents so "chocolate" (present in only one) carries a
        // strictly positive idf; with just two docs every term's df equals
        // n/2 and the raw idf collapses to exactly zero.
        let concepts = vec![
            concept("1", "Chocolate caliente"),
            concept("2", "Vainilla pura"),
            concept("3", "Canela molida"),
        ];
        let idx = Bm25Index::build("es", concepts.iter(), &Bm25Config::default());
        let hits = idx.topk(&["chocolate".to_string()], 5).unwrap();
        assert_eq!(hits[0].0, "1");
        assert_eq!(hits[0].1, 1.0);
    }

    #[test]
    fn negative_idf_terms_are_floored_by_epsilon() {
        // A term present in every document gets a negative raw idf under
        // the un-shifted Okapi formula; the epsilon*avg_idf floor must
        // keep it from going negative (and thus zeroing or inverting
        // scores) rather than being unreachable dead code.
        let concepts = vec![
            concept("1", "Chocolate amargo"),
            concept("2", "Chocolate con leche"),
            concept("3", "Chocolate blanco"),
        ];
        let idx = Bm25Index::build("es", concepts.iter(), &Bm25Config::default());
        let hits = idx.topk(&["chocolate".to_string()], 5).unwrap();
        assert!(hits.iter().all(|(_, s)| *s >= 0.0));
    }

    #[test]
    fn unmatched_query_returns_empty_scores_only() {
        let concepts = vec![concept("1", "Chocolate caliente")];
        let idx = Bm25Index::build("es", concepts.iter(), &Bm25Config::default());
        let hits = idx.topk(&["xyzzy".to_string()], 5).unwrap();
        assert!(hits.iter().all(|(_, s)| *s == 0.0));
    }

    #[test]
    fn empty_index_returns_no_hits() {
        let idx = Bm25Index::build("es", std::iter::empty(), &Bm25Config::default());
        assert!(idx.topk(&["anything".to_string()], 5).unwrap().is_empty());
    }
}
