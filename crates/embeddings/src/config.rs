use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Dimensionality of the deterministic placeholder backend, and the
/// fallback dimension reported before a model-backed backend has run its
/// probe encode.
pub const PLACEHOLDER_DIM: usize = 768;

/// Which embeddings backend to use.
///
/// `Placeholder` is deterministic and has no external dependencies; it is
/// the default and the permanent fallback for `SentenceTransformer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Placeholder,
    #[serde(rename = "st")]
    SentenceTransformer,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Placeholder => "placeholder",
            BackendKind::SentenceTransformer => "st",
        }
    }
}

impl Default for BackendKind {
    fn default() -> Self {
        BackendKind::Placeholder
    }
}

/// Runtime configuration for [`crate::EmbeddingsBackend`].
///
/// # Example
///
/// ```rust
/// use embeddings::{BackendKind, EmbeddingsConfig};
///
/// let cfg = EmbeddingsConfig {
///     backend: BackendKind::SentenceTransformer,
///     model_name: "sentence-transformers/all-MiniLM-L6-v2".into(),
///     ..Default::default()
/// };
/// assert_eq!(cfg.backend, BackendKind::SentenceTransformer);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// Which backend to attempt. `SentenceTransformer` degrades to
    /// `Placeholder` on any initialization failure, or when this crate is
    /// built without the `st` feature.
    #[serde(default)]
    pub backend: BackendKind,
    /// Model identifier passed to the model-backed backend. Ignored when
    /// `backend` is `Placeholder`.
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// Local path where the ONNX model file should already live. Only
    /// consulted when `backend` is `SentenceTransformer`.
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Local path to the tokenizer JSON. Only consulted when `backend` is
    /// `SentenceTransformer`.
    #[serde(default = "default_tokenizer_path")]
    pub tokenizer_path: PathBuf,
}

fn default_model_name() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".to_string()
}

fn default_model_path() -> PathBuf {
    PathBuf::from("./models/embeddings/model.onnx")
}

fn default_tokenizer_path() -> PathBuf {
    PathBuf::from("./models/embeddings/tokenizer.json")
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            model_name: default_model_name(),
            model_path: default_model_path(),
            tokenizer_path: default_tokenizer_path(),
        }
    }
}
