//! Layered configuration for the classify/search engine.
//!
//! [`EngineConfig`] carries every knob enumerated in spec.md §6: fusion
//! weights, the abstention threshold, internal candidate pool size,
//! language routing, the embeddings backend selection, the taxonomy
//! search rule weights, and the on-disk artifact paths. [`EngineConfig::load`]
//! layers defaults, an optional TOML/JSON file, and `TAXO__`-prefixed
//! environment variables the same way `ServerConfig::load` in the
//! reference server layers `config::Config` sources.

use std::path::PathBuf;

use embeddings::{BackendKind, EmbeddingsConfig};
use serde::{Deserialize, Serialize};
use taxonomy::TaxoConfig;

use crate::error::EngineError;

/// Where on disk every reloadable artifact lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArtifactPaths {
    /// UTF-8 JSON array of concept rows (spec.md §6).
    pub taxonomy_json: PathBuf,
    /// Directory containing `class_embeddings_<lang>.npy` and
    /// `class_ids.npy`, one embeddings file per supported language
    /// sharing the same id vector.
    pub dense_dir: PathBuf,
    /// Single `bincode` artifact holding the vectorizer, linear layer,
    /// class id list, and calibration flag (see `classifier::ClassifierArtifact`).
    pub classifier_path: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            taxonomy_json: PathBuf::from("./artifacts/taxonomy.json"),
            dense_dir: PathBuf::from("./artifacts/dense"),
            classifier_path: PathBuf::from("./artifacts/classifier.bin"),
        }
    }
}

impl ArtifactPaths {
    pub fn dense_matrix_path(&self, lang: &str) -> PathBuf {
        self.dense_dir.join(format!("class_embeddings_{lang}.npy"))
    }

    pub fn dense_ids_path(&self) -> PathBuf {
        self.dense_dir.join("class_ids.npy")
    }
}

/// Every knob spec.md §6 enumerates, plus the artifact paths needed to
/// load/reload them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Fusion weight for the dense/semantic signal.
    pub alpha_sem: f32,
    /// Fusion weight for the BM25 lexical signal.
    pub beta_bm25: f32,
    /// Fusion weight for the classifier signal.
    pub gamma_clf: f32,
    /// Abstention threshold in `[0,1]`: predictions below this are
    /// withheld.
    pub tau_low: f32,
    /// Internal per-signal candidate pool size (`K` in spec.md §4.8).
    pub top_k: usize,
    /// Number of alternatives returned alongside the prediction.
    pub alternatives_top_k: usize,
    pub default_lang: String,
    pub supported_langs: Vec<String>,
    pub embeddings_backend: BackendKind,
    pub embeddings_model: String,
    pub taxo_w_exact: f32,
    pub taxo_w_prefix: f32,
    pub taxo_w_substring: f32,
    pub taxo_w_alt: f32,
    pub taxo_w_hidden: f32,
    pub taxo_w_path: f32,
    pub taxo_w_context: f32,
    pub taxo_w_vec: f32,
    pub taxo_w_fuzzy: f32,
    pub taxo_fuzzy_min_ratio: f32,
    pub taxo_top_k: usize,
    pub artifacts: ArtifactPaths,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            alpha_sem: 0.5,
            beta_bm25: 0.3,
            gamma_clf: 0.2,
            tau_low: 0.35,
            top_k: 20,
            alternatives_top_k: 5,
            default_lang: "es".to_string(),
            supported_langs: vec!["es".to_string(), "en".to_string()],
            embeddings_backend: BackendKind::Placeholder,
            embeddings_model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            taxo_w_exact: 100.0,
            taxo_w_prefix: 60.0,
            taxo_w_substring: 40.0,
            taxo_w_alt: 30.0,
            taxo_w_hidden: 20.0,
            taxo_w_path: 10.0,
            taxo_w_context: 5.0,
            taxo_w_vec: 0.0,
            taxo_w_fuzzy: 0.0,
            taxo_fuzzy_min_ratio: 70.0,
            taxo_top_k: 25,
            artifacts: ArtifactPaths::default(),
        }
    }
}

impl EngineConfig {
    /// Layers defaults, an optional `taxo.{toml,json,...}` config file in
    /// the working directory, and `TAXO__`-prefixed environment
    /// variables (double underscore as the nesting separator), returning
    /// a typed, validated config rather than reading environment
    /// variables ad hoc.
    pub fn load() -> Result<Self, EngineError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("taxo").required(false))
            .add_source(config::Environment::with_prefix("TAXO").separator("__"));

        let cfg: EngineConfig = builder
            .build()
            .map_err(|e| EngineError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects configuration that downstream code could not act on:
    /// non-finite or negative fusion weights, an abstention threshold
    /// outside `[0,1]`, or an empty supported-language list.
    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, w) in [
            ("alpha_sem", self.alpha_sem),
            ("beta_bm25", self.beta_bm25),
            ("gamma_clf", self.gamma_clf),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(EngineError::Config(format!(
                    "fusion weight `{name}` must be finite and >= 0, got {w}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.tau_low) {
            return Err(EngineError::Config(format!(
                "tau_low must be in [0,1], got {}",
                self.tau_low
            )));
        }
        if self.supported_langs.is_empty() {
            return Err(EngineError::Config(
                "supported_langs must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn taxo_config(&self) -> TaxoConfig {
        TaxoConfig {
            w_exact: self.taxo_w_exact,
            w_prefix: self.taxo_w_prefix,
            w_substring: self.taxo_w_substring,
            w_alt: self.taxo_w_alt,
            w_hidden: self.taxo_w_hidden,
            w_path: self.taxo_w_path,
            w_context: self.taxo_w_context,
            w_vec: self.taxo_w_vec,
            w_fuzzy: self.taxo_w_fuzzy,
            fuzzy_min_ratio: self.taxo_fuzzy_min_ratio,
            default_top_k: self.taxo_top_k,
            ..TaxoConfig::default()
        }
    }

    pub fn embeddings_config(&self) -> EmbeddingsConfig {
        EmbeddingsConfig {
            backend: self.embeddings_backend,
            model_name: self.embeddings_model.clone(),
            ..EmbeddingsConfig::default()
        }
    }

    /// Normalizes `lang` to lowercase and substitutes [`Self::default_lang`]
    /// when it is not in [`Self::supported_langs`] — never an error, per
    /// spec.md §4.8 step 2.
    pub fn resolve_lang(&self, lang: Option<&str>) -> String {
        let lang = lang.map(str::to_lowercase).unwrap_or_default();
        if self.supported_langs.iter().any(|l| l == &lang) {
            lang
        } else {
            self.default_lang.clone()
        }
    }
}
