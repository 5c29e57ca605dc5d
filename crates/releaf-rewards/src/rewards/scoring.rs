use std::sync::Arc;

use tracing::warn;

use super::classifier::{Classifier, InferenceError};
use super::domain::{Category, FeatureVector, PointsResult};
use super::features::{self, DecodeError};
use super::points;

/// Fallback reason when the image bytes could not be decoded.
pub const REASON_EXTRACTION: &str = "feature extraction failed";
/// Fallback reason when the classifier rejected the feature vector.
pub const REASON_CLASSIFICATION: &str = "classification failed";

/// In-process scoring over raw image bytes: extract features, classify, map
/// to points. Performs no I/O; deterministic for fixed classifier state.
pub struct ScoringService<C> {
    classifier: Arc<C>,
}

impl<C> Clone for ScoringService<C> {
    fn clone(&self) -> Self {
        Self {
            classifier: self.classifier.clone(),
        }
    }
}

/// Diagnostic view of one successful scoring attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub features: FeatureVector,
    pub category: Category,
    pub points: u32,
}

/// Internal failure of the in-process scoring stages. Never escapes
/// [`ScoringService::score`]; exposed only to the scoring endpoint for
/// diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl<C> ScoringService<C>
where
    C: Classifier,
{
    pub fn new(classifier: Arc<C>) -> Self {
        Self { classifier }
    }

    /// Score image bytes, converting every internal failure into a typed
    /// fallback result. No error crosses this boundary.
    pub fn score(&self, image_bytes: &[u8]) -> PointsResult {
        match self.score_detailed(image_bytes) {
            Ok(breakdown) => PointsResult::scored(breakdown.points),
            Err(ScoringError::Decode(err)) => {
                warn!(%err, "image feature extraction failed");
                PointsResult::fallback(REASON_EXTRACTION)
            }
            Err(ScoringError::Inference(err)) => {
                warn!(%err, "classification failed");
                PointsResult::fallback(REASON_CLASSIFICATION)
            }
        }
    }

    /// Score image bytes keeping the intermediate features and category.
    pub fn score_detailed(&self, image_bytes: &[u8]) -> Result<ScoreBreakdown, ScoringError> {
        let features = features::extract(image_bytes)?;
        let category = self.classifier.classify(&features)?;
        Ok(ScoreBreakdown {
            features,
            category,
            points: points::points_for(category),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::classifier::ThresholdClassifier;
    use crate::rewards::domain::{ScoreMethod, FALLBACK_POINTS};
    use crate::rewards::features::test_support::solid_png;

    struct FaultyClassifier;

    impl Classifier for FaultyClassifier {
        fn classify(&self, _features: &FeatureVector) -> Result<Category, InferenceError> {
            Err(InferenceError::NonFiniteFeature { name: "avg_red" })
        }
    }

    fn service() -> ScoringService<ThresholdClassifier> {
        ScoringService::new(Arc::new(ThresholdClassifier::builtin()))
    }

    #[test]
    fn green_image_scores_high_category_points() {
        let result = service().score(&solid_png(8, 8, [10, 220, 10]));
        assert_eq!(result.method, ScoreMethod::Scored);
        assert_eq!(result.points, 100);
        assert!(result.reason.is_none());
    }

    #[test]
    fn grey_image_scores_low_category_points() {
        let result = service().score(&solid_png(8, 8, [90, 90, 90]));
        assert_eq!(result.points, 10);
        assert_eq!(result.method, ScoreMethod::Scored);
    }

    #[test]
    fn undecodable_bytes_fall_back_with_extraction_reason() {
        let result = service().score(b"not an image");
        assert_eq!(result.points, FALLBACK_POINTS);
        assert_eq!(result.reason.as_deref(), Some(REASON_EXTRACTION));
    }

    #[test]
    fn classifier_fault_falls_back_with_classification_reason() {
        let service = ScoringService::new(Arc::new(FaultyClassifier));
        let result = service.score(&solid_png(4, 4, [0, 255, 0]));
        assert_eq!(result.points, FALLBACK_POINTS);
        assert_eq!(result.reason.as_deref(), Some(REASON_CLASSIFICATION));
    }

    #[test]
    fn detailed_score_exposes_features_and_category() {
        let breakdown = service()
            .score_detailed(&solid_png(8, 8, [10, 220, 10]))
            .expect("green image scores");
        assert_eq!(breakdown.category, Category::High);
        assert_eq!(breakdown.points, 100);
        assert_eq!(breakdown.features.green_ratio, 1.0);
    }

    #[test]
    fn scoring_is_deterministic_for_identical_bytes() {
        let bytes = solid_png(8, 8, [40, 180, 40]);
        let service = service();
        assert_eq!(service.score(&bytes), service.score(&bytes));
    }
}
