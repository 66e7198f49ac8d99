//! Configuration for the normalization pipeline.
//!
//! This module defines [`NormalizeOptions`], which selects between the
//! two normalizer variants described in the crate root: the extended
//! normalizer (used by the taxonomy store, search, autocomplete, and
//! embeddings) and the legacy normalizer (used only for BM25
//! tokenization).
//!
//! # Examples
//!
//! ```rust
//! use normalizer::NormalizeOptions;
//!
//! let opts = NormalizeOptions::default();
//! assert!(opts.accents);
//! assert!(opts.singular);
//! ```

use serde::{Deserialize, Serialize};

/// Options controlling the extended normalizer's optional stages.
///
/// Both stages run after the mandatory NFKC → lowercase → character-class
/// filter → whitespace-collapse pipeline described on [`normalize`](crate::normalize).
///
/// # Default
///
/// Both `accents` and `singular` default to `true`, matching the
/// taxonomy store's own default behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// If true, apply NFKD decomposition and drop combining marks after
    /// the base pipeline, making the output ASCII-safe.
    pub accents: bool,
    /// If true, strip a trailing `s` from any whitespace-delimited token
    /// longer than four characters (a naive, locale-free singularizer).
    pub singular: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            accents: true,
            singular: true,
        }
    }
}

impl NormalizeOptions {
    /// Disables both accent stripping and singularization, leaving only
    /// the mandatory pipeline stages. Useful for tests that want to
    /// isolate the character-class filter from the optional stages.
    pub fn raw() -> Self {
        Self {
            accents: false,
            singular: false,
        }
    }
}
