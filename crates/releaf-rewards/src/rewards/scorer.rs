use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::classifier::Classifier;
use super::domain::PointsResult;
use super::scoring::ScoringService;

/// The scoring hop failed. Always masked by the pipeline as a
/// "scoring unavailable" fallback, never surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ScorerError {
    #[error("scorer transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("scorer returned status {status}")]
    Status { status: u16 },
    #[error("scorer response missing carbon credit points")]
    MalformedResponse,
}

/// The scoring hop: turns image bytes into a points result, either in-process
/// or across the network. The pipeline is agnostic to which is wired in.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, image_bytes: &[u8]) -> Result<PointsResult, ScorerError>;
}

/// In-process scorer over the local feature extractor and classifier.
pub struct LocalScorer<C> {
    service: ScoringService<C>,
}

impl<C> LocalScorer<C> {
    pub fn new(service: ScoringService<C>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<C> Scorer for LocalScorer<C>
where
    C: Classifier,
{
    async fn score(&self, image_bytes: &[u8]) -> Result<PointsResult, ScorerError> {
        // ScoringService already converts its failures to fallback results.
        Ok(self.service.score(image_bytes))
    }
}

/// Scorer backed by an external classification service.
///
/// Posts the image bytes as a multipart `image` attachment and reads
/// `user_data.carbon_credit_points` from the JSON response. Every other field
/// is diagnostic and ignored; a response without that one field counts as a
/// scoring failure, not a protocol error.
pub struct RemoteScorer {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteScorer {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Scorer for RemoteScorer {
    async fn score(&self, image_bytes: &[u8]) -> Result<PointsResult, ScorerError> {
        let part = reqwest::multipart::Part::bytes(image_bytes.to_vec()).file_name("upload.png");
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ScorerError::Status {
                status: response.status().as_u16(),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|_| ScorerError::MalformedResponse)?;
        let points = points_from_payload(&payload).ok_or(ScorerError::MalformedResponse)?;
        debug!(points, endpoint = %self.endpoint, "remote scorer answered");
        Ok(PointsResult::scored(points))
    }
}

/// Extract the single load-bearing field from a scorer response of any shape.
fn points_from_payload(payload: &Value) -> Option<u32> {
    payload
        .pointer("/user_data/carbon_credit_points")
        .and_then(Value::as_u64)
        .and_then(|points| u32::try_from(points).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::classifier::ThresholdClassifier;
    use crate::rewards::domain::ScoreMethod;
    use crate::rewards::features::test_support::solid_png;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn local_scorer_delegates_to_scoring_service() {
        let scorer = LocalScorer::new(ScoringService::new(Arc::new(
            ThresholdClassifier::builtin(),
        )));
        let result = scorer
            .score(&solid_png(8, 8, [10, 220, 10]))
            .await
            .expect("local scorer never errors");
        assert_eq!(result.points, 100);
        assert_eq!(result.method, ScoreMethod::Scored);
    }

    #[tokio::test]
    async fn local_scorer_returns_fallback_result_for_bad_bytes() {
        let scorer = LocalScorer::new(ScoringService::new(Arc::new(
            ThresholdClassifier::builtin(),
        )));
        let result = scorer.score(b"junk").await.expect("still a result");
        assert!(result.is_fallback());
    }

    #[test]
    fn points_parse_from_full_scorer_response() {
        let payload = json!({
            "developer_data": {
                "avg_R": 12.0,
                "avg_G": 200.5,
                "avg_B": 9.25,
                "green_ratio": 0.92,
                "predicted_label": "High Green"
            },
            "user_data": {
                "carbon_credit_points": 100,
                "message": "Your image was classified as 'High Green'. You earned 100 eco-credits!"
            }
        });
        assert_eq!(points_from_payload(&payload), Some(100));
    }

    #[test]
    fn missing_points_field_yields_none() {
        assert_eq!(points_from_payload(&json!({})), None);
        assert_eq!(points_from_payload(&json!({"user_data": {}})), None);
        assert_eq!(
            points_from_payload(&json!({"user_data": "unexpected shape"})),
            None
        );
        assert_eq!(
            points_from_payload(&json!({"user_data": {"carbon_credit_points": "100"}})),
            None
        );
    }

    #[test]
    fn negative_points_are_rejected() {
        assert_eq!(
            points_from_payload(&json!({"user_data": {"carbon_credit_points": -5}})),
            None
        );
    }
}
