use serde::{Deserialize, Serialize};

/// Per-field repetition weight used when concatenating a concept's text
/// into one BM25 document: a higher weight means that field's content is
/// repeated more times in the token stream, biasing term frequency toward
/// fields that matter more for retrieval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FieldWeights {
    pub pref_label: f32,
    pub alt_label: f32,
    pub hidden_label: f32,
    pub definition: f32,
    pub scope_note: f32,
    pub note: f32,
    pub example: f32,
    pub path: f32,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            pref_label: 2.0,
            alt_label: 1.5,
            hidden_label: 1.2,
            definition: 1.0,
            scope_note: 0.8,
            note: 0.6,
            example: 0.8,
            path: 1.2,
        }
    }
}

impl FieldWeights {
    /// Concrete repetition count for a field value of the given weight:
    /// `max(1, round(weight * 2))`.
    pub fn repeat_count(weight: f32) -> usize {
        ((weight * 2.0).round() as i64).max(1) as usize
    }
}

/// Okapi BM25 parameters and field weighting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Bm25Config {
    pub k1: f32,
    pub b: f32,
    pub fields: FieldWeights,
}

impl Default for Bm25Config {
    fn default() -> Self {
        Self {
            k1: 1.5,
            b: 0.75,
            fields: FieldWeights::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_count_rounds_and_floors_at_one() {
        assert_eq!(FieldWeights::repeat_count(2.0), 4);
        assert_eq!(FieldWeights::repeat_count(0.6), 1);
        assert_eq!(FieldWeights::repeat_count(0.8), 2);
    }
}
