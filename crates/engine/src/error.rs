//! The error kinds spec.md §7 names, surfaced as one enum with a
//! `kind()` accessor in the idiom of `server::ServerError::error_code()`
//! — this crate never installs an HTTP framework, so the accessor
//! returns a stable string tag rather than a status code, leaving the
//! status-code mapping to whatever transport links against it.

use thiserror::Error;

use classifier::ClassifierError;
use dense::DenseError;
use lexical::LexicalError;
use taxonomy::TaxonomyError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Empty/missing query, malformed body, or an unsupported parameter.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A concept id was not found in the taxonomy store.
    #[error("concept not found: {0}")]
    NotFound(String),

    /// Fusion returned nothing and the `sem ∪ bm25` fallback was also empty.
    #[error("no candidates produced by any signal")]
    NoCandidates,

    /// Every ranked candidate id was unknown to the taxonomy store.
    #[error("no ranked candidates are known to the taxonomy store")]
    NoCandidatesInTaxonomy,

    /// The classifier's score vector length could not be reconciled with
    /// its class list, even via binary expansion.
    #[error("classifier shape mismatch: {0}")]
    ClassifierShape(#[source] ClassifierError),

    /// A required on-disk artifact was absent at load time.
    #[error("required artifact missing: {0}")]
    ArtifactMissing(String),

    #[error("taxonomy store error: {0}")]
    Taxonomy(#[from] TaxonomyError),

    #[error("lexical index error: {0}")]
    Lexical(#[from] LexicalError),

    #[error("dense index error: {0}")]
    Dense(#[from] DenseError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Stable kind tag matching spec.md §7's error-kind names, for
    /// callers (transports, logs) that want to branch on kind without
    /// matching the full enum.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidRequest(_) => "invalid-request",
            EngineError::NotFound(_) => "not-found",
            EngineError::NoCandidates => "no-candidates",
            EngineError::NoCandidatesInTaxonomy => "no-candidates-in-taxonomy",
            EngineError::ClassifierShape(_) => "classifier-shape",
            EngineError::ArtifactMissing(_) => "artifact-missing",
            EngineError::Taxonomy(_) | EngineError::Lexical(_) | EngineError::Dense(_) => {
                "internal"
            }
            EngineError::Config(_) => "config",
        }
    }
}

/// Only `ClassifierError::Shape` is a genuine shape mismatch (spec.md §7);
/// an unreadable or corrupt artifact is an artifact-load failure, not a
/// shape failure, so it's reported as `artifact-missing` instead of
/// collapsing every classifier error into `"classifier-shape"`.
impl From<ClassifierError> for EngineError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::Io { path, .. } => EngineError::ArtifactMissing(path),
            ClassifierError::Decode { path, .. } => EngineError::ArtifactMissing(path),
            shape @ ClassifierError::Shape { .. } => EngineError::ClassifierShape(shape),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_spec_error_names() {
        assert_eq!(EngineError::InvalidRequest("x".into()).kind(), "invalid-request");
        assert_eq!(EngineError::NotFound("x".into()).kind(), "not-found");
        assert_eq!(EngineError::NoCandidates.kind(), "no-candidates");
        assert_eq!(
            EngineError::NoCandidatesInTaxonomy.kind(),
            "no-candidates-in-taxonomy"
        );
        assert_eq!(EngineError::ArtifactMissing("x".into()).kind(), "artifact-missing");
    }

    #[test]
    fn classifier_io_error_becomes_artifact_missing() {
        let err: EngineError = ClassifierError::Io {
            path: "classifier.bin".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        }
        .into();
        assert_eq!(err.kind(), "artifact-missing");
    }

    #[test]
    fn classifier_shape_error_stays_classifier_shape() {
        let err: EngineError = ClassifierError::Shape { expected: 3, actual: 2 }.into();
        assert_eq!(err.kind(), "classifier-shape");
    }
}
