//! Deterministic multilingual text normalization.
//!
//! Every index and every query in the taxonomy engine passes through one
//! of the two functions this crate exports. Keeping normalization in a
//! single leaf crate with no dependents is what makes "index-side and
//! query-side normalize the same way" a property you get for free rather
//! than one you have to maintain by convention.
//!
//! # Overview
//!
//! - [`normalize`]: the extended pipeline — Unicode NFKC, lowercasing, a
//!   `[0-9a-z áéíóúüñ]` character-class filter, whitespace collapse, and
//!   optional accent-stripping / naive singularization. Used by the
//!   taxonomy store's inverted index, heuristic search, autocomplete, and
//!   the embeddings backend.
//! - [`normalize_legacy`]: NFKC, lowercasing, whitespace collapse only.
//!   Used exclusively to prepare text for BM25's word tokenizer.
//!
//! This crate is **pure** and **side-effect free**: no I/O, no network
//! calls, no dependence on wall-clock time, locale, or hardware.
//!
//! # Quick Start
//!
//! ```rust
//! use normalizer::{normalize, NormalizeOptions};
//!
//! let out = normalize("  Chocolates Y Bombones!!  ", NormalizeOptions::default());
//! assert_eq!(out, "chocolate y bombone");
//! ```
//!
//! # Module Structure
//!
//! - `config`: [`NormalizeOptions`]
//! - `pipeline`: [`normalize`], [`normalize_legacy`]
//! - `whitespace`: [`collapse_whitespace`], reused by both pipelines

mod config;
mod pipeline;
mod whitespace;

pub use crate::config::NormalizeOptions;
pub use crate::pipeline::{normalize, normalize_legacy};
pub use crate::whitespace::collapse_whitespace;
