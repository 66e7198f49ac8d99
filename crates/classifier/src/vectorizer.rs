use std::collections::HashMap;

use normalizer::normalize_legacy;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w\w+").expect("static tfidf token regex"));

/// A fitted TF-IDF vectorizer: a fixed vocabulary mapping terms to feature
/// indices and the corresponding inverse-document-frequency weight per
/// term. `transform` is the only operation needed at inference time — this
/// crate never re-fits a vocabulary from raw text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f32>) -> Self {
        Self { vocabulary, idf }
    }

    pub fn feature_count(&self) -> usize {
        self.idf.len()
    }

    /// Tokenizes `text` (legacy normalize, then `\w\w+` runs — matching
    /// scikit-learn's default `TfidfVectorizer` tokenizer), builds raw term
    /// counts restricted to the known vocabulary, applies idf weighting,
    /// and L2-normalizes the resulting dense vector.
    pub fn transform(&self, text: &str) -> Vec<f32> {
        let norm = normalize_legacy(text);
        let mut counts = vec![0.0f32; self.idf.len()];
        for tok in TOKEN.find_iter(&norm) {
            if let Some(&idx) = self.vocabulary.get(tok.as_str()) {
                counts[idx] += 1.0;
            }
        }
        for (c, w) in counts.iter_mut().zip(self.idf.iter()) {
            *c *= w;
        }
        let norm_l2 = (counts.iter().map(|v| v * v).sum::<f32>()).sqrt();
        if norm_l2 > 0.0 {
            for c in counts.iter_mut() {
                *c /= norm_l2;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> TfidfVectorizer {
        let mut vocabulary = HashMap::new();
        vocabulary.insert("chocolate".to_string(), 0);
        vocabulary.insert("vainilla".to_string(), 1);
        TfidfVectorizer::new(vocabulary, vec![1.0, 2.0])
    }

    #[test]
    fn unknown_terms_are_ignored() {
        let v = fixture();
        let out = v.transform("algo completamente distinto");
        assert!(out.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn known_term_produces_unit_vector() {
        let v = fixture();
        let out = v.transform("chocolate");
        assert!((out[0] - 1.0).abs() < 1e-6);
        assert_eq!(out[1], 0.0);
    }

    #[test]
    fn output_is_l2_normalized() {
        let v = fixture();
        let out = v.transform("chocolate vainilla");
        let norm: f32 = out.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }
}
