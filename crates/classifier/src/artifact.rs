use serde::{Deserialize, Serialize};

use crate::model::LinearLayer;
use crate::vectorizer::TfidfVectorizer;

/// The full on-disk state for one classifier: vectorizer, linear layer,
/// ordered class ids, and whether the layer was calibrated (supports
/// per-class probability) at training time.
///
/// Persisted with `bincode` rather than the reference service's pickle-based
/// `joblib` format — the semantic fields (vectorizer, model weights, class
/// order, calibration flag) are the same either way.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifierArtifact {
    pub vectorizer: TfidfVectorizer,
    pub layer: LinearLayer,
    pub classes: Vec<String>,
    pub calibrated: bool,
}
