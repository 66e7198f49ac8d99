use thiserror::Error;

/// Errors surfaced while initializing the model-backed backend.
///
/// None of these are fatal to [`crate::EmbeddingsBackend::embed_text`]: every
/// variant here causes a one-time downgrade to the placeholder backend,
/// recorded via [`crate::EmbeddingsBackend::downgraded`].
#[derive(Debug, Error, Clone)]
pub enum EmbeddingsError {
    #[error("model file not found: {0}")]
    ModelNotFound(String),
    #[error("tokenizer not found: {0}")]
    TokenizerMissing(String),
    #[error("model-backed backend requested but crate built without the `st` feature")]
    FeatureDisabled,
    #[error("inference failure: {0}")]
    Inference(String),
}
