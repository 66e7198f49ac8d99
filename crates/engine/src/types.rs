//! Request/response value types for the pure function contracts of
//! spec.md §6. These are plain, `serde`-friendly data — the crate that
//! wires up a transport can (de)serialize them directly without any
//! translation layer.

use serde::{Deserialize, Serialize};
use taxonomy::Concept;

/// A single scored alternative returned alongside a classify prediction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alternative {
    pub id: String,
    pub label: String,
    pub score: f32,
}

/// The resolved top prediction of a classify call, or absent when the
/// engine abstained.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub id: String,
    pub label: String,
    pub path: Vec<String>,
    pub score: f32,
}

/// Result of [`crate::Engine::classify`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifyResponse {
    pub prediction: Option<Prediction>,
    pub alternatives: Vec<Alternative>,
    pub abstained: bool,
    pub latency_ms: f64,
}

/// One ranked hit from [`crate::Engine::taxo_search`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaxoSearchHit {
    pub id: String,
    pub label: String,
    pub path: Vec<String>,
}

/// Which label kind an autocomplete suggestion resolved from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LabelKind {
    Pref,
    Alt,
}

/// One suggestion from [`crate::Engine::taxo_autocomplete`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutocompleteHit {
    pub id: String,
    pub label: String,
    pub kind: LabelKind,
}

/// Full detail for [`crate::Engine::taxo_concept`]: the raw concept as
/// stored, plus a resolved-labels convenience view over its relation id
/// lists (supplemented feature, see `SPEC_FULL.md` §5.1).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConceptDetail {
    pub concept: Concept,
    pub broader_labels: Vec<RelatedConcept>,
    pub narrower_labels: Vec<RelatedConcept>,
}

/// One relation target resolved to a display label, when it is present
/// in the store; relations pointing outside the loaded taxonomy still
/// appear in `Concept::broader`/`Concept::narrower` but have no
/// corresponding entry here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelatedConcept {
    pub id: String,
    pub label: String,
}

/// Status of one on-disk artifact after a [`crate::Engine::reload`] call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStatus {
    Checksum(String),
    Missing,
    Error(String),
}

/// Result of [`crate::Engine::reload`]: per-file checksum/status and the
/// set of languages actually affected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReloadReport {
    pub files: Vec<(String, ArtifactStatus)>,
    pub langs: Vec<String>,
}

/// The three flags spec.md §4.10 tracks, plus the derived verdict —
/// returned as a struct rather than a single bool per the supplemented
/// readiness-detail feature (`SPEC_FULL.md` §5.5).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Readiness {
    pub taxonomy_loaded: bool,
    pub classifier_loaded: bool,
    pub bm25_loaded: bool,
}

impl Readiness {
    pub fn ready(&self) -> bool {
        self.taxonomy_loaded && self.classifier_loaded
    }
}

/// In-process counters kept for observability without an HTTP exposition
/// surface (supplemented feature, `SPEC_FULL.md` §5.3).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct EngineStats {
    pub classify_calls: u64,
    pub abstentions: u64,
    pub reload_count: u64,
}
