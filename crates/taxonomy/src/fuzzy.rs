/// Fuzzy string similarity in the `0..=100` range, analogous to
/// rapidfuzz's `partial_ratio`: the best Levenshtein-based ratio between
/// `needle` and any equal-length window of `haystack`.
///
/// `strsim` has no windowed variant, so for `needle` shorter than
/// `haystack` this slides a window of `needle`'s length across `haystack`
/// and keeps the best [`strsim::normalized_levenshtein`] score. When
/// `needle` is longer, the roles swap so the shorter string is always the
/// sliding one.
pub fn partial_ratio(a: &str, b: &str) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 100.0;
    }

    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };

    let short_len = short.chars().count();
    let long_chars: Vec<char> = long.chars().collect();
    if long_chars.len() <= short_len {
        return (strsim::normalized_levenshtein(short, long) * 100.0) as f32;
    }

    let mut best = 0.0f64;
    for start in 0..=(long_chars.len() - short_len) {
        let window: String = long_chars[start..start + short_len].iter().collect();
        let ratio = strsim::normalized_levenshtein(short, &window);
        if ratio > best {
            best = ratio;
        }
    }
    (best * 100.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one_hundred() {
        assert_eq!(partial_ratio("chocolate", "chocolate"), 100.0);
    }

    #[test]
    fn substring_scores_highly() {
        let r = partial_ratio("cola", "chocolate");
        assert!(r > 50.0, "expected high ratio, got {r}");
    }

    #[test]
    fn empty_input_scores_zero() {
        assert_eq!(partial_ratio("", "chocolate"), 0.0);
        assert_eq!(partial_ratio("chocolate", ""), 0.0);
    }
}
