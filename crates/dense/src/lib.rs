//! Dense retriever over a precomputed label embedding matrix.
//!
//! [`DenseIndex::load`] reads an `E ∈ ℝ^{N×D}` matrix and its aligned id
//! vector from two NPY artifacts (see [`npy`]); [`DenseIndex::topk`] then
//! computes cosine similarity against every row and returns the `k` best
//! matches. Query embeddings come from the `embeddings` crate's backend —
//! this crate never embeds the matrix rows itself, only reads them.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use dense::DenseIndex;
//! use embeddings::EmbeddingsBackend;
//!
//! let idx = DenseIndex::load(
//!     Path::new("class_embeddings_es.npy"),
//!     Path::new("class_ids.npy"),
//! ).unwrap();
//! let backend = EmbeddingsBackend::default();
//! let q = DenseIndex::embed_query(&backend, "chocolate");
//! let hits = idx.topk(&q, 10);
//! ```

pub mod error;
mod index;
pub mod npy;

pub use crate::error::DenseError;
pub use crate::index::DenseIndex;
