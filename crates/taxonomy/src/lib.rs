//! In-memory multilingual concept graph: inverted index, optional label
//! embeddings, heuristic search, and prefix autocomplete.
//!
//! [`TaxonomyStore`] loads a `taxonomy.json` concept array once and builds,
//! per language present in the data, an [`inverted_index::InvertedIndex`]
//! for heuristic search, an optional [`embedding_index::EmbeddingIndex`] for
//! the vector-similarity boost, and an [`autocomplete::AutocompleteIndex`]
//! for prefix lookups. All three are read-only after load; nothing here
//! mutates once `load` returns.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use embeddings::EmbeddingsBackend;
//! use taxonomy::{TaxoConfig, TaxonomyStore};
//!
//! let store = TaxonomyStore::load(
//!     Path::new("taxonomy.json"),
//!     TaxoConfig::default(),
//!     Arc::new(EmbeddingsBackend::default()),
//! ).unwrap();
//! let hits = store.search("chocolate", "es", Some(10));
//! ```

pub mod autocomplete;
pub mod concept;
pub mod config;
pub mod embedding_index;
pub mod error;
pub mod fuzzy;
pub mod inverted_index;
pub mod store;

pub use crate::concept::Concept;
pub use crate::config::TaxoConfig;
pub use crate::error::TaxonomyError;
pub use crate::store::TaxonomyStore;
