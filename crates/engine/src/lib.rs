//! # Classify/search engine (`engine`)
//!
//! ## Purpose
//!
//! `engine` is the aggregate that ties the lower layers together into the
//! pure function contracts a transport would expose: [`normalizer`] for
//! text normalization, [`taxonomy`] for the concept graph and heuristic
//! search, [`lexical`] for BM25, [`dense`] for cosine retrieval, and
//! [`classifier`] for the linear model. It owns lazy, reloadable indices
//! and fuses their signals into one ranked classification.
//!
//! In a typical deployment you will:
//! - Build an [`EngineConfig`] via [`EngineConfig::load`] (or construct one
//!   directly for tests).
//! - Construct an [`Engine`] from it once at startup.
//! - Call [`Engine::classify`], [`Engine::taxo_search`],
//!   [`Engine::taxo_autocomplete`], and [`Engine::taxo_concept`] to service
//!   requests, and [`Engine::reload`] to pick up freshly written artifacts
//!   without a restart.
//!
//! ## Core Types
//!
//! - [`Engine`]: owns the lazily-built taxonomy/BM25/dense/classifier
//!   state and every public operation.
//! - [`EngineConfig`]: fusion weights, abstention threshold, language
//!   routing, and on-disk artifact paths.
//! - [`EngineError`]: the error kinds a caller can branch on via
//!   [`EngineError::kind`].
//! - Request/response types in [`types`]: [`ClassifyResponse`],
//!   [`TaxoSearchHit`], [`AutocompleteHit`], [`ConceptDetail`],
//!   [`ReloadReport`], [`Readiness`], [`EngineStats`].
//!
//! ## Example Usage
//!
//! ```no_run
//! use engine::{Engine, EngineConfig};
//!
//! let cfg = EngineConfig::load().expect("config");
//! let engine = Engine::new(cfg);
//!
//! let resp = engine.classify("chocolates y bombones", Some("es"), None).expect("classify");
//! if let Some(pred) = resp.prediction {
//!     println!("{} ({}) score={}", pred.label, pred.id, pred.score);
//! }
//! ```
//!
//! ## Observability
//!
//! [`Engine::stats`] exposes in-process counters (classify calls,
//! abstentions, reload count) for a caller to surface however it likes;
//! this crate installs no metrics exposition of its own. Every loader
//! and the `reload`/`classify` paths emit [`tracing`] events at their
//! crate boundary the way the lower-layer crates do.

pub mod config;
pub mod engine;
pub mod error;
pub mod fusion;
pub mod reload;
pub mod types;

pub use crate::config::{ArtifactPaths, EngineConfig};
pub use crate::engine::Engine;
pub use crate::error::EngineError;
pub use crate::fusion::combine_triple;
pub use crate::reload::checksum_status;
pub use crate::types::{
    Alternative, ArtifactStatus, AutocompleteHit, ClassifyResponse, ConceptDetail, EngineStats,
    LabelKind, Prediction, Readiness, RelatedConcept, ReloadReport, TaxoSearchHit,
};
