//! Reward scoring pipeline: image acquisition, feature extraction,
//! classification, points mapping, and the multi-layer fallback policy.

pub mod classifier;
pub mod domain;
pub mod features;
pub mod pipeline;
pub mod points;
pub mod response;
pub mod router;
pub mod scorer;
pub mod scoring;
pub mod source;

#[cfg(test)]
mod tests;

pub use classifier::{Classifier, InferenceError, ModelArtifact, ModelLoadError, ThresholdClassifier};
pub use domain::{
    Category, FeatureVector, PointsResult, RewardRequest, RewardResponse, ScoreMethod,
    ValidationError, FALLBACK_POINTS,
};
pub use features::DecodeError;
pub use pipeline::{PipelineLimits, RewardPipeline, REASON_ACQUISITION, REASON_SCORING};
pub use points::points_for;
pub use response::assemble;
pub use router::{reward_router, scoring_router};
pub use scorer::{LocalScorer, RemoteScorer, Scorer, ScorerError};
pub use scoring::{ScoreBreakdown, ScoringError, ScoringService, REASON_CLASSIFICATION, REASON_EXTRACTION};
pub use source::{AcquisitionError, HttpImageSource, ImageSource};
