//! Versioned classifier artifact.
//!
//! The artifact is a JSON document that names the feature columns it was
//! trained on. Loading refuses any artifact whose schema version or column
//! order differs from [`FEATURE_NAMES`], since a misaligned vector would still
//! produce labels, just wrong ones.
//!
//! Two model kinds are supported: a logistic regression and a dense
//! feed-forward network laid out like an sklearn `MLPClassifier` export
//! (`weights[i][j]` connects input `i` to unit `j`, logistic output unit).

use crate::classifier::{Classifier, ClassifierError, Label};
use crate::engine::vector::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES, FEATURE_SCHEMA_VERSION};
use serde::Deserialize;
use std::path::Path;

/// Probability of the benign class at or above which a URL is labeled benign.
pub const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    pub schema_version: u32,
    pub features: Vec<String>,
    pub model: ModelSpec,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelSpec {
    Logistic {
        weights: Vec<f64>,
        bias: f64,
    },
    Mlp {
        layers: Vec<DenseLayer>,
        #[serde(default)]
        activation: Activation,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
}

/// Hidden-layer activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Relu,
    Tanh,
    Logistic,
    Identity,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Tanh => x.tanh(),
            Activation::Logistic => sigmoid(x),
            Activation::Identity => x,
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// A validated artifact ready for prediction. Immutable after load.
#[derive(Debug, Clone)]
pub struct ArtifactClassifier {
    model: ModelSpec,
}

impl ArtifactClassifier {
    /// Reads and validates an artifact from disk.
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ClassifierError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: ModelArtifact =
            serde_json::from_str(&raw).map_err(|source| ClassifierError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let classifier = Self::from_artifact(artifact)?;
        tracing::info!(path = %path.display(), kind = classifier.kind(), "Classifier loaded");
        Ok(classifier)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ClassifierError> {
        if artifact.schema_version != FEATURE_SCHEMA_VERSION {
            return Err(ClassifierError::SchemaVersion {
                expected: FEATURE_SCHEMA_VERSION,
                found: artifact.schema_version,
            });
        }
        check_feature_names(&artifact.features)?;
        check_dimensions(&artifact.model)?;
        Ok(Self {
            model: artifact.model,
        })
    }

    pub fn kind(&self) -> &'static str {
        match self.model {
            ModelSpec::Logistic { .. } => "logistic",
            ModelSpec::Mlp { .. } => "mlp",
        }
    }

    /// Probability that the URL is benign.
    pub fn score(&self, vector: &FeatureVector) -> f64 {
        let input = vector.to_f64();
        match &self.model {
            ModelSpec::Logistic { weights, bias } => {
                let z: f64 = weights.iter().zip(input.iter()).map(|(w, x)| w * x).sum();
                sigmoid(z + bias)
            }
            ModelSpec::Mlp { layers, activation } => {
                let mut values = input.to_vec();
                let last = layers.len() - 1;
                for (i, layer) in layers.iter().enumerate() {
                    let mut z = layer.biases.clone();
                    for (x, row) in values.iter().zip(layer.weights.iter()) {
                        for (zj, w) in z.iter_mut().zip(row.iter()) {
                            *zj += x * w;
                        }
                    }
                    values = if i == last {
                        z.into_iter().map(sigmoid).collect()
                    } else {
                        z.into_iter().map(|v| activation.apply(v)).collect()
                    };
                }
                values[0]
            }
        }
    }
}

impl Classifier for ArtifactClassifier {
    fn predict(&self, vector: &FeatureVector) -> Result<Label, ClassifierError> {
        let score = self.score(vector);
        if !score.is_finite() {
            return Err(ClassifierError::NonFiniteScore);
        }
        Ok(if score >= DECISION_THRESHOLD {
            Label::Benign
        } else {
            Label::Phishing
        })
    }
}

fn check_feature_names(features: &[String]) -> Result<(), ClassifierError> {
    if features.len() != FEATURE_COUNT {
        return Err(ClassifierError::FeatureCount {
            expected: FEATURE_COUNT,
            found: features.len(),
        });
    }
    for (position, (found, expected)) in features.iter().zip(FEATURE_NAMES.iter()).enumerate() {
        if found != expected {
            return Err(ClassifierError::FeatureMismatch {
                position,
                expected: expected.to_string(),
                found: found.clone(),
            });
        }
    }
    Ok(())
}

fn check_dimensions(model: &ModelSpec) -> Result<(), ClassifierError> {
    match model {
        ModelSpec::Logistic { weights, .. } => {
            if weights.len() != FEATURE_COUNT {
                return Err(ClassifierError::Dimension(format!(
                    "logistic model has {} weights, expected {}",
                    weights.len(),
                    FEATURE_COUNT
                )));
            }
        }
        ModelSpec::Mlp { layers, .. } => {
            if layers.is_empty() {
                return Err(ClassifierError::Dimension("mlp model has no layers".to_string()));
            }
            let mut inputs = FEATURE_COUNT;
            for (i, layer) in layers.iter().enumerate() {
                let outputs = layer.biases.len();
                if layer.weights.len() != inputs {
                    return Err(ClassifierError::Dimension(format!(
                        "layer {} takes {} inputs, expected {}",
                        i,
                        layer.weights.len(),
                        inputs
                    )));
                }
                if let Some(row) = layer.weights.iter().find(|row| row.len() != outputs) {
                    return Err(ClassifierError::Dimension(format!(
                        "layer {} has a weight row of width {}, expected {}",
                        i,
                        row.len(),
                        outputs
                    )));
                }
                inputs = outputs;
            }
            if inputs != 1 {
                return Err(ClassifierError::Dimension(format!(
                    "output layer has {} units, expected 1",
                    inputs
                )));
            }
        }
    }
    Ok(())
}
