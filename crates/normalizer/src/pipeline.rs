//! The extended and legacy normalization pipelines.
//!
//! # Extended pipeline (`normalize`)
//!
//! 1. Unicode NFKC normalization.
//! 2. Lowercasing.
//! 3. Replace every character outside `[0-9a-z áéíóúüñ]` (case-insensitive,
//!    checked against the NFKC-lowercased form) with a single space.
//! 4. Collapse whitespace and trim.
//! 5. If [`NormalizeOptions::accents`], NFKD-decompose and drop combining
//!    marks, making the output ASCII-safe.
//! 6. If [`NormalizeOptions::singular`], drop a trailing `s` from any
//!    whitespace-delimited token longer than four characters.
//!
//! This pipeline is used everywhere except BM25 tokenization: the
//! taxonomy store's inverted index, heuristic search, autocomplete, and
//! the embeddings backend all normalize through this function, so that
//! index construction and query-time lookups stay consistent.
//!
//! # Legacy pipeline (`normalize_legacy`)
//!
//! NFKC normalization, lowercasing, and whitespace collapse only — no
//! character-class filter, no accent stripping, no singularization. Used
//! solely to prepare text for BM25's `\w+` tokenizer.

use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;

use crate::config::NormalizeOptions;
use crate::whitespace::collapse_whitespace;

const EXTRA_LATIN: &[char] = &['á', 'é', 'í', 'ó', 'ú', 'ü', 'ñ'];

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_digit() || ('a'..='z').contains(&c) || c == ' ' || EXTRA_LATIN.contains(&c)
}

/// Normalizes `s` with the extended pipeline, ASCII-safe accent stripping
/// and naive singularization controlled by `opts`.
///
/// Deterministic and pure: same input and options always produce the same
/// output, with no I/O or locale dependence.
///
/// # Examples
///
/// ```rust
/// use normalizer::{normalize, NormalizeOptions};
///
/// let out = normalize("  Chocolates Y Bombones!!  ", NormalizeOptions::default());
/// assert_eq!(out, "chocolate y bombone");
/// ```
///
/// ```rust
/// use normalizer::{normalize, NormalizeOptions};
///
/// // Accents preserved, no singularization.
/// let opts = NormalizeOptions { accents: false, singular: false };
/// let out = normalize("Información Útil", opts);
/// assert_eq!(out, "información útil");
/// ```
pub fn normalize(s: &str, opts: NormalizeOptions) -> String {
    let nfkc: String = s.nfkc().collect();
    let lowered = nfkc.to_lowercase();

    let mut filtered = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        if is_allowed_char(c) {
            filtered.push(c);
        } else {
            filtered.push(' ');
        }
    }

    let mut out = collapse_whitespace(&filtered);

    if opts.accents {
        out = strip_combining_marks(&out);
    }

    if opts.singular {
        out = singularize(&out);
    }

    out
}

/// Normalizes `s` with the legacy pipeline: NFKC, lowercase, whitespace
/// collapse. No character-class filter, no accent or singular handling.
///
/// This is the variant BM25 tokenization in the `lexical` crate uses; do
/// not substitute [`normalize`] for it, and vice versa — they are
/// intentionally different and power different signals.
///
/// # Examples
///
/// ```rust
/// use normalizer::normalize_legacy;
///
/// assert_eq!(normalize_legacy("  Café-Latte!  "), "café-latte!");
/// ```
pub fn normalize_legacy(s: &str) -> String {
    let nfkc: String = s.nfkc().collect();
    collapse_whitespace(&nfkc.to_lowercase())
}

fn strip_combining_marks(s: &str) -> String {
    let decomposed: String = s.nfkd().collect();
    decomposed
        .chars()
        .filter(|c| !c.is_mark_nonspacing())
        .collect()
}

fn singularize(s: &str) -> String {
    s.split(' ')
        .map(|tok| {
            if tok.chars().count() > 4 && tok.ends_with('s') {
                &tok[..tok.len() - 1]
            } else {
                tok
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idempotent() {
        let inputs = ["Café Latte!!", "  Chocolates  ", "İstanbul 123", ""];
        for s in inputs {
            let once = normalize(s, NormalizeOptions::default());
            let twice = normalize(&once, NormalizeOptions::default());
            assert_eq!(once, twice, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn character_class_invariant() {
        let out = normalize("Hello, WORLD! 100% fun—café", NormalizeOptions::default());
        assert!(out
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='z').contains(&c) || c == ' '));
        assert!(!out.starts_with(' '));
        assert!(!out.ends_with(' '));
        assert!(!out.contains("  "));
    }

    #[test]
    fn accents_stripped_by_default() {
        assert_eq!(normalize("información", NormalizeOptions::default()), "informacion");
    }

    #[test]
    fn accents_preserved_when_disabled() {
        let opts = NormalizeOptions {
            accents: false,
            singular: false,
        };
        assert_eq!(normalize("información", opts), "información");
    }

    #[test]
    fn singularization_drops_trailing_s_over_four_chars() {
        assert_eq!(
            normalize("chocolates bombones es", NormalizeOptions::default()),
            "chocolate bombone es"
        );
    }

    #[test]
    fn short_tokens_keep_trailing_s() {
        // "bus" has length 3, below the >4 threshold.
        assert_eq!(normalize("bus", NormalizeOptions::default()), "bus");
    }

    #[test]
    fn empty_input_normalizes_to_empty() {
        assert_eq!(normalize("   ", NormalizeOptions::default()), "");
        assert_eq!(normalize_legacy("   "), "");
    }

    #[test]
    fn legacy_keeps_punctuation_and_accents() {
        assert_eq!(normalize_legacy("¡Hola, Señor!"), "¡hola, señor!");
    }
}
