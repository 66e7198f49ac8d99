//! Triple-signal fusion: weighted linear combination of dense, BM25, and
//! classifier scores into one ranking (spec.md §4.7).

use std::collections::{HashMap, HashSet};

/// Combines the dense top-k pairs, BM25 top-k pairs, and the classifier's
/// class-aligned score vector into one ranked `(id, score)` list.
///
/// Weights are clamped to `max(1e-8, w)` then renormalized to sum to 1,
/// so the caller never needs to pre-normalize. The candidate set is the
/// union of every id appearing in `sem_pairs` or `bm25_pairs` plus every
/// class id in `classes` — a candidate missing from a signal's pair list
/// contributes `0.0` for that signal, and a candidate that is not a
/// recognized class id contributes `0.0` for the classifier signal even
/// if it appears in `sem_pairs`/`bm25_pairs`. Non-finite scores are
/// dropped both when building the per-signal maps and from the final
/// result.
pub fn combine_triple(
    sem_pairs: &[(String, f32)],
    bm25_pairs: &[(String, f32)],
    cls_vector: &[f32],
    classes: &[String],
    w_sem: f32,
    w_bm25: f32,
    w_clf: f32,
) -> Vec<(String, f32)> {
    let w_sem = w_sem.max(1e-8);
    let w_bm25 = w_bm25.max(1e-8);
    let w_clf = w_clf.max(1e-8);
    let total = w_sem + w_bm25 + w_clf;
    let (w_sem, w_bm25, w_clf) = (w_sem / total, w_bm25 / total, w_clf / total);

    let sem_map: HashMap<&str, f32> = sem_pairs
        .iter()
        .filter(|(_, s)| s.is_finite())
        .map(|(id, s)| (id.as_str(), *s))
        .collect();
    let bm25_map: HashMap<&str, f32> = bm25_pairs
        .iter()
        .filter(|(_, s)| s.is_finite())
        .map(|(id, s)| (id.as_str(), *s))
        .collect();
    let cls_map: HashMap<&str, f32> = classes
        .iter()
        .zip(cls_vector.iter())
        .filter(|(_, s)| s.is_finite())
        .map(|(id, s)| (id.as_str(), *s))
        .collect();

    let mut candidates: HashSet<&str> = HashSet::new();
    candidates.extend(sem_pairs.iter().map(|(id, _)| id.as_str()));
    candidates.extend(bm25_pairs.iter().map(|(id, _)| id.as_str()));
    candidates.extend(classes.iter().map(String::as_str));

    let mut combined: Vec<(String, f32)> = candidates
        .into_iter()
        .map(|id| {
            let sem = *sem_map.get(id).unwrap_or(&0.0);
            let bm25 = *bm25_map.get(id).unwrap_or(&0.0);
            let clf = *cls_map.get(id).unwrap_or(&0.0);
            let score = w_sem * sem + w_bm25 * bm25 + w_clf * clf;
            (id.to_string(), score)
        })
        .filter(|(_, score)| score.is_finite())
        .collect();

    combined.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_renormalized_to_sum_to_one() {
        // Double the raw weights; the result must be identical since they
        // renormalize to the same proportions.
        let sem = vec![("a".to_string(), 1.0)];
        let bm25 = vec![("a".to_string(), 1.0)];
        let classes = vec!["a".to_string()];
        let cls = vec![1.0];
        let r1 = combine_triple(&sem, &bm25, &cls, &classes, 0.5, 0.3, 0.2);
        let r2 = combine_triple(&sem, &bm25, &cls, &classes, 1.0, 0.6, 0.4);
        assert!((r1[0].1 - r2[0].1).abs() < 1e-6);
    }

    #[test]
    fn missing_signal_defaults_to_zero_contribution() {
        let sem = vec![("x".to_string(), 1.0)];
        let bm25: Vec<(String, f32)> = vec![];
        let classes = vec!["y".to_string()];
        let cls = vec![1.0];
        let combined = combine_triple(&sem, &bm25, &cls, &classes, 0.5, 0.3, 0.2);
        let x = combined.iter().find(|(id, _)| id == "x").unwrap();
        assert!((x.1 - 0.5).abs() < 1e-5);
    }

    #[test]
    fn non_class_id_gets_zero_classifier_contribution() {
        let sem = vec![("x".to_string(), 1.0)];
        let bm25 = vec![("x".to_string(), 1.0)];
        let classes = vec!["other".to_string()];
        let cls = vec![1.0];
        let combined = combine_triple(&sem, &bm25, &cls, &classes, 0.5, 0.3, 0.2);
        let x = combined.iter().find(|(id, _)| id == "x").unwrap();
        assert!((x.1 - 0.8).abs() < 1e-5);
    }

    #[test]
    fn non_finite_scores_are_dropped() {
        let sem = vec![("x".to_string(), f32::NAN)];
        let bm25 = vec![("x".to_string(), 0.5)];
        let classes: Vec<String> = vec![];
        let cls: Vec<f32> = vec![];
        let combined = combine_triple(&sem, &bm25, &cls, &classes, 0.5, 0.3, 0.2);
        let x = combined.iter().find(|(id, _)| id == "x").unwrap();
        assert!(x.1.is_finite());
    }

    #[test]
    fn result_is_sorted_descending() {
        let sem = vec![("lo".to_string(), 0.1), ("hi".to_string(), 0.9)];
        let bm25: Vec<(String, f32)> = vec![];
        let classes: Vec<String> = vec![];
        let cls: Vec<f32> = vec![];
        let combined = combine_triple(&sem, &bm25, &cls, &classes, 1.0, 1.0, 1.0);
        assert_eq!(combined[0].0, "hi");
        assert_eq!(combined[1].0, "lo");
    }
}
