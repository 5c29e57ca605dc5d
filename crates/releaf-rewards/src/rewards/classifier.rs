use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{Category, FeatureVector};

/// Decision function mapping a feature vector to a greenness category.
///
/// Implementations must be stateless during inference so that concurrent
/// in-flight requests can share one loaded instance without locking.
pub trait Classifier: Send + Sync {
    fn classify(&self, features: &FeatureVector) -> Result<Category, InferenceError>;
}

/// Inference rejected the input or hit an internal model fault.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("feature '{name}' is not a finite number")]
    NonFiniteFeature { name: &'static str },
    #[error("green ratio {value} outside [0, 1]")]
    RatioOutOfRange { value: f64 },
}

/// Classifier artifact could not be loaded at startup.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("model artifact unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("model artifact corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("model artifact invalid: cutoffs must satisfy 0 <= moderate < high <= 1")]
    InvalidCutoffs,
}

/// Versioned on-disk representation of a trained threshold model.
///
/// Produced by the offline training job; consumed once at process startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: String,
    pub moderate_cutoff: f64,
    pub high_cutoff: f64,
}

/// Threshold rule over the green-dominance ratio.
///
/// `green_ratio < moderate_cutoff` is Low, `>= high_cutoff` is High, and
/// everything between is Moderate. The cutoffs come from a versioned artifact
/// or from the built-in defaults.
#[derive(Debug, Clone)]
pub struct ThresholdClassifier {
    version: String,
    moderate_cutoff: f64,
    high_cutoff: f64,
}

impl ThresholdClassifier {
    /// Built-in parameters used when no artifact is configured.
    pub fn builtin() -> Self {
        Self {
            version: "builtin-1".to_string(),
            moderate_cutoff: 0.2,
            high_cutoff: 0.5,
        }
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelLoadError> {
        let ModelArtifact {
            version,
            moderate_cutoff,
            high_cutoff,
        } = artifact;

        let ordered = moderate_cutoff.is_finite()
            && high_cutoff.is_finite()
            && (0.0..1.0).contains(&moderate_cutoff)
            && moderate_cutoff < high_cutoff
            && high_cutoff <= 1.0;
        if !ordered {
            return Err(ModelLoadError::InvalidCutoffs);
        }

        Ok(Self {
            version,
            moderate_cutoff,
            high_cutoff,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let raw = fs::read(path)?;
        let artifact: ModelArtifact = serde_json::from_slice(&raw)?;
        Self::from_artifact(artifact)
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Classifier for ThresholdClassifier {
    fn classify(&self, features: &FeatureVector) -> Result<Category, InferenceError> {
        for (name, value) in [
            ("avg_red", features.avg_red),
            ("avg_green", features.avg_green),
            ("avg_blue", features.avg_blue),
            ("green_ratio", features.green_ratio),
        ] {
            if !value.is_finite() {
                return Err(InferenceError::NonFiniteFeature { name });
            }
        }
        if !(0.0..=1.0).contains(&features.green_ratio) {
            return Err(InferenceError::RatioOutOfRange {
                value: features.green_ratio,
            });
        }

        let category = if features.green_ratio >= self.high_cutoff {
            Category::High
        } else if features.green_ratio >= self.moderate_cutoff {
            Category::Moderate
        } else {
            Category::Low
        };
        Ok(category)
    }
}
