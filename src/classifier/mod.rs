// * Classifier Adapter
// * Maps a feature vector to a label. Loaded once at startup and shared across requests.

pub mod model;

use crate::engine::vector::FeatureVector;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

pub use model::{ArtifactClassifier, ModelArtifact, ModelSpec};

/// Binary decision. The integer encoding matches the training labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Phishing = 0,
    Benign = 1,
}

impl Label {
    pub fn as_int(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Phishing => "phishing",
            Label::Benign => "benign",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Failed to read classifier artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed classifier artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Artifact schema version {found} does not match feature schema {expected}")]
    SchemaVersion { expected: u32, found: u32 },

    #[error("Artifact lists {found} features, expected {expected}")]
    FeatureCount { expected: usize, found: usize },

    #[error("Artifact feature {position} is '{found}', expected '{expected}'")]
    FeatureMismatch {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("Artifact shape error: {0}")]
    Dimension(String),

    #[error("Classifier produced a non-finite score")]
    NonFiniteScore,
}

/// A trained model behind a stable seam. Implementations are read-only after
/// construction, so one instance serves concurrent requests.
pub trait Classifier: Send + Sync {
    fn predict(&self, vector: &FeatureVector) -> Result<Label, ClassifierError>;
}

/// Loads the artifact at `path`. A failure here is fatal to startup.
pub fn load_classifier(path: &Path) -> Result<Arc<dyn Classifier>, ClassifierError> {
    Ok(Arc::new(ArtifactClassifier::load(path)?))
}
