//! Per-language, weighted-field Okapi BM25 lexical index.
//!
//! [`index::Bm25Index::build`] tokenizes a language's concept documents
//! once; [`index::Bm25Index::topk`] then scores a query against that fixed
//! table. Query-side tokenization uses [`tokenize_query`], the same
//! normalize-then-`\w+` pipeline used for documents, so index-side and
//! query-side tokens always agree.
//!
//! This crate holds no lazy-build or reset state of its own — the engine
//! crate owns the per-language build-on-first-use and reset-on-reload
//! lifecycle; this crate is a pure, stateless-beyond-construction index.

pub mod config;
mod document;
pub mod error;
pub mod index;

pub use crate::config::{Bm25Config, FieldWeights};
pub use crate::document::build_document;
pub use crate::error::LexicalError;
pub use crate::index::Bm25Index;

/// Tokenizes a raw query string the same way document fields are
/// tokenized: legacy normalize, then maximal `\w+` runs.
pub fn tokenize_query(query: &str) -> Vec<String> {
    document::tokenize(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_query_splits_on_word_boundaries() {
        assert_eq!(
            tokenize_query("Chocolates, y bombones!"),
            vec!["chocolates", "y", "bombones"]
        );
    }
}
