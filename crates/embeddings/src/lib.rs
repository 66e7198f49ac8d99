//! Single-text embedding backend.
//!
//! Two backends, selected by [`BackendKind`]:
//!
//! - [`BackendKind::Placeholder`]: a deterministic PRNG-seeded vector, no
//!   I/O, always available.
//! - [`BackendKind::SentenceTransformer`]: a sentence-transformer-style ONNX
//!   model loaded on first use (gated behind the `st` feature).
//!
//! The model-backed path never propagates a load failure to the caller.
//! Any failure to find or initialize the model — missing files, a disabled
//! feature, a broken ONNX session — permanently downgrades this backend
//! instance to the placeholder and is recorded via [`EmbeddingsBackend::downgraded`].
//! `embed_text` itself therefore never fails.
//!
//! # Example
//!
//! ```rust
//! use embeddings::{EmbeddingsBackend, EmbeddingsConfig};
//!
//! let backend = EmbeddingsBackend::new(EmbeddingsConfig::default());
//! let v = backend.embed_text("chocolates y bombones");
//! assert_eq!(v.len(), backend.embedding_dimension());
//! assert_eq!(backend.backend_name(), "placeholder");
//! ```

pub mod config;
pub mod error;
#[cfg(feature = "st")]
mod model;
pub mod placeholder;

pub use crate::config::{BackendKind, EmbeddingsConfig, PLACEHOLDER_DIM};
pub use crate::error::EmbeddingsError;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[cfg(feature = "st")]
use crate::model::ModelBackend;

/// Owns whatever state the configured backend needs and exposes the
/// spec's single-text embedding entry point.
///
/// Safe to share across threads: the optional ONNX session lives behind a
/// [`Mutex`], and initialization uses a double-checked pattern so only one
/// thread ever pays the load cost.
pub struct EmbeddingsBackend {
    cfg: EmbeddingsConfig,
    #[cfg(feature = "st")]
    model: Mutex<Option<ModelBackend>>,
    downgraded: AtomicBool,
}

impl EmbeddingsBackend {
    pub fn new(cfg: EmbeddingsConfig) -> Self {
        Self {
            cfg,
            #[cfg(feature = "st")]
            model: Mutex::new(None),
            downgraded: AtomicBool::new(false),
        }
    }

    /// Returns the embedding of `text` under the configured backend,
    /// falling back to the placeholder on any model-backed failure.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        match self.cfg.backend {
            BackendKind::Placeholder => placeholder::embed(text),
            BackendKind::SentenceTransformer => self.embed_model_backed(text),
        }
    }

    #[cfg(feature = "st")]
    fn embed_model_backed(&self, text: &str) -> Vec<f32> {
        if self.downgraded.load(Ordering::Acquire) {
            return placeholder::embed(text);
        }
        let mut guard = self.model.lock().expect("embeddings model mutex poisoned");
        if guard.is_none() {
            match ModelBackend::try_init(&self.cfg) {
                Ok(backend) => *guard = Some(backend),
                Err(err) => {
                    tracing::warn!(error = %err, "embeddings model init failed, downgrading to placeholder");
                    self.downgraded.store(true, Ordering::Release);
                    return placeholder::embed(text);
                }
            }
        }
        match guard.as_mut().unwrap().encode(text) {
            Ok(vec) => vec,
            Err(err) => {
                tracing::warn!(error = %err, "embeddings inference failed, downgrading to placeholder");
                self.downgraded.store(true, Ordering::Release);
                placeholder::embed(text)
            }
        }
    }

    #[cfg(not(feature = "st"))]
    fn embed_model_backed(&self, text: &str) -> Vec<f32> {
        if !self.downgraded.swap(true, Ordering::AcqRel) {
            tracing::warn!("embeddings backend `st` requested but crate built without the `st` feature, downgrading to placeholder");
        }
        placeholder::embed(text)
    }

    /// The backend actually serving requests right now: the configured one,
    /// or `"placeholder"` after a downgrade.
    pub fn backend_name(&self) -> &'static str {
        if self.downgraded.load(Ordering::Acquire) {
            BackendKind::Placeholder.as_str()
        } else {
            self.cfg.backend.as_str()
        }
    }

    /// Dimension of vectors this backend currently produces.
    pub fn embedding_dimension(&self) -> usize {
        #[cfg(feature = "st")]
        {
            if self.cfg.backend == BackendKind::SentenceTransformer
                && !self.downgraded.load(Ordering::Acquire)
            {
                if let Ok(guard) = self.model.lock() {
                    if let Some(backend) = guard.as_ref() {
                        return backend.dimension();
                    }
                }
            }
        }
        PLACEHOLDER_DIM
    }

    /// True once this instance has fallen back to the placeholder backend
    /// after a model-backed initialization or inference failure.
    pub fn downgraded(&self) -> bool {
        self.downgraded.load(Ordering::Acquire)
    }
}

impl Default for EmbeddingsBackend {
    fn default() -> Self {
        Self::new(EmbeddingsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_backend_is_deterministic() {
        let backend = EmbeddingsBackend::new(EmbeddingsConfig::default());
        assert_eq!(backend.embed_text("hola"), backend.embed_text("hola"));
        assert_eq!(backend.backend_name(), "placeholder");
        assert!(!backend.downgraded());
    }

    #[test]
    fn embedding_dimension_matches_vector_len() {
        let backend = EmbeddingsBackend::new(EmbeddingsConfig::default());
        let v = backend.embed_text("chocolate");
        assert_eq!(v.len(), backend.embedding_dimension());
    }

    #[cfg(not(feature = "st"))]
    #[test]
    fn sentence_transformer_without_feature_downgrades() {
        let cfg = EmbeddingsConfig {
            backend: BackendKind::SentenceTransformer,
            ..Default::default()
        };
        let backend = EmbeddingsBackend::new(cfg);
        let v = backend.embed_text("some text");
        assert!(backend.downgraded());
        assert_eq!(backend.backend_name(), "placeholder");
        assert_eq!(v.len(), PLACEHOLDER_DIM);
    }

    #[cfg(feature = "st")]
    #[test]
    fn sentence_transformer_missing_assets_downgrades() {
        let cfg = EmbeddingsConfig {
            backend: BackendKind::SentenceTransformer,
            model_path: "./missing/model.onnx".into(),
            tokenizer_path: "./missing/tokenizer.json".into(),
            ..Default::default()
        };
        let backend = EmbeddingsBackend::new(cfg);
        let v = backend.embed_text("some text");
        assert!(backend.downgraded());
        assert_eq!(backend.backend_name(), "placeholder");
        assert_eq!(v.len(), PLACEHOLDER_DIM);
    }
}
