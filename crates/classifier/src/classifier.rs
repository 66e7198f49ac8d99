use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::artifact::ClassifierArtifact;
use crate::error::ClassifierError;
use crate::model::ClassifierModel;
use crate::vectorizer::TfidfVectorizer;

/// A loaded vectorizer + class-aligned scoring model.
///
/// `Classifier::load` reads a single `bincode`-encoded artifact file
/// (vectorizer, linear layer, class list, calibration flag) and resolves
/// the model's scoring capability once; `scores` is then pure computation.
pub struct Classifier {
    vectorizer: TfidfVectorizer,
    model: ClassifierModel,
    classes: Vec<String>,
}

impl Classifier {
    /// Reads `path` (a single `classifier.bin` artifact) and resolves the
    /// model's capability variant against its class list.
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let file = File::open(path).map_err(|e| ClassifierError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let artifact: ClassifierArtifact =
            bincode::deserialize_from(BufReader::new(file)).map_err(|e| ClassifierError::Decode {
                path: path.display().to_string(),
                source: e,
            })?;

        let model = ClassifierModel::resolve(artifact.layer, artifact.classes.len(), artifact.calibrated)?;

        Ok(Self {
            vectorizer: artifact.vectorizer,
            model,
            classes: artifact.classes,
        })
    }

    /// Class ids in the order `scores` aligns its output with.
    pub fn class_ids(&self) -> &[String] {
        &self.classes
    }

    /// Whether the resolved model variant produces calibrated
    /// probabilities rather than raw decision-function logits.
    pub fn is_calibrated(&self) -> bool {
        matches!(self.model, ClassifierModel::ProbaMultiClass(_))
    }

    /// Vectorizes `text` and scores it, returning a vector aligned with
    /// [`Classifier::class_ids`].
    pub fn scores(&self, text: &str) -> Vec<f32> {
        let x = self.vectorizer.transform(text);
        self.model.scores(&x)
    }
}
