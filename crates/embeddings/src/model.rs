//! The model-backed embeddings backend, gated behind the `st` feature.
//!
//! Loads a sentence-transformer-style ONNX model and its tokenizer on
//! first call. Encodes mean-pooled, L2-normalized embeddings. Any failure
//! here — missing files, a malformed tokenizer, a session that refuses to
//! build — is caught by the caller in [`crate::EmbeddingsBackend`] and
//! turned into a permanent downgrade to the placeholder backend; this
//! module itself never panics.

use crate::config::EmbeddingsConfig;
use crate::error::EmbeddingsError;

pub struct ModelBackend {
    tokenizer: tokenizers::Tokenizer,
    session: onnxruntime::session::Session<'static>,
    dim: usize,
}

impl ModelBackend {
    /// Attempts to load the tokenizer and ONNX session named by `cfg`.
    /// Runs a single probe encode to discover the embedding dimension.
    pub fn try_init(cfg: &EmbeddingsConfig) -> Result<Self, EmbeddingsError> {
        if !cfg.tokenizer_path.exists() {
            return Err(EmbeddingsError::TokenizerMissing(
                cfg.tokenizer_path.display().to_string(),
            ));
        }
        if !cfg.model_path.exists() {
            return Err(EmbeddingsError::ModelNotFound(
                cfg.model_path.display().to_string(),
            ));
        }

        let tokenizer = tokenizers::Tokenizer::from_file(&cfg.tokenizer_path)
            .map_err(|e| EmbeddingsError::Inference(format!("tokenizer load: {e}")))?;

        // `onnxruntime` requires a process-wide `Environment`; leaking it is the
        // documented way to obtain the `'static` session the crate's API wants.
        let environment = Box::leak(Box::new(
            onnxruntime::environment::Environment::builder()
                .with_name("embeddings")
                .build()
                .map_err(|e| EmbeddingsError::Inference(format!("ort environment: {e}")))?,
        ));
        let session = environment
            .new_session_builder()
            .map_err(|e| EmbeddingsError::Inference(format!("ort session builder: {e}")))?
            .with_model_from_file(&cfg.model_path)
            .map_err(|e| EmbeddingsError::Inference(format!("ort model load: {e}")))?;

        let mut backend = Self {
            tokenizer,
            session,
            dim: 0,
        };
        let probe = backend.encode_raw("_probe_")?;
        backend.dim = probe.len();
        Ok(backend)
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    pub fn encode(&mut self, text: &str) -> Result<Vec<f32>, EmbeddingsError> {
        self.encode_raw(text)
    }

    fn encode_raw(&mut self, text: &str) -> Result<Vec<f32>, EmbeddingsError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| EmbeddingsError::Inference(format!("tokenize: {e}")))?;
        let ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();

        let input = ndarray::Array2::from_shape_vec((1, ids.len()), ids)
            .map_err(|e| EmbeddingsError::Inference(format!("input shape: {e}")))?
            .into_dyn();
        let attn = ndarray::Array2::from_shape_vec((1, mask.len()), mask)
            .map_err(|e| EmbeddingsError::Inference(format!("mask shape: {e}")))?
            .into_dyn();

        let outputs: Vec<onnxruntime::tensor::OrtOwnedTensor<f32, _>> = self
            .session
            .run(vec![input, attn])
            .map_err(|e| EmbeddingsError::Inference(format!("session run: {e}")))?;
        let token_embeddings = outputs
            .first()
            .ok_or_else(|| EmbeddingsError::Inference("model produced no output".into()))?;

        Ok(mean_pool_normalize(
            token_embeddings.view().into_dyn().as_slice().ok_or_else(|| {
                EmbeddingsError::Inference("non-contiguous model output".into())
            })?,
            encoding.get_ids().len(),
        ))
    }
}

/// Mean-pools a flattened `(seq_len, dim)` token embedding matrix over the
/// sequence dimension, then L2-normalizes. `seq_len` must divide `flat`'s
/// length evenly.
fn mean_pool_normalize(flat: &[f32], seq_len: usize) -> Vec<f32> {
    if seq_len == 0 || flat.is_empty() {
        return Vec::new();
    }
    let dim = flat.len() / seq_len;
    let mut pooled = vec![0.0f32; dim];
    for row in flat.chunks(dim) {
        for (acc, v) in pooled.iter_mut().zip(row) {
            *acc += v;
        }
    }
    let n = seq_len as f32;
    for v in pooled.iter_mut() {
        *v /= n;
    }
    let norm = (pooled.iter().map(|v| v * v).sum::<f32>()).sqrt() + 1e-8;
    for v in pooled.iter_mut() {
        *v /= norm;
    }
    pooled
}
