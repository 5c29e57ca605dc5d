use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::rewards::classifier::ThresholdClassifier;
use crate::rewards::domain::{PointsResult, RewardRequest};
use crate::rewards::features::test_support::solid_png;
use crate::rewards::pipeline::{PipelineLimits, RewardPipeline};
use crate::rewards::scorer::{LocalScorer, Scorer, ScorerError};
use crate::rewards::scoring::ScoringService;
use crate::rewards::source::{AcquisitionError, ImageSource};

pub(super) fn request() -> RewardRequest {
    RewardRequest {
        post_id: "p1".to_string(),
        user_id: "u1".to_string(),
        tags: vec!["tree-planting".to_string()],
        description: Some("planted three oaks".to_string()),
        image_ref: "http://x/green.png".to_string(),
    }
}

pub(super) fn green_png() -> Vec<u8> {
    solid_png(8, 8, [10, 220, 10])
}

pub(super) fn limits() -> PipelineLimits {
    PipelineLimits {
        fetch_timeout: Duration::from_secs(1),
        scoring_timeout: Duration::from_secs(1),
    }
}

/// Source answering with fixed bytes, counting how often it was invoked.
pub(super) struct StaticSource {
    bytes: Vec<u8>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub(super) fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSource for StaticSource {
    async fn fetch(&self, _image_ref: &str) -> Result<Vec<u8>, AcquisitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.bytes.clone())
    }
}

/// Source that always fails with a transport-style error.
pub(super) struct UnreachableSource;

#[async_trait]
impl ImageSource for UnreachableSource {
    async fn fetch(&self, _image_ref: &str) -> Result<Vec<u8>, AcquisitionError> {
        Err(AcquisitionError::Status { status: 502 })
    }
}

/// Source that never answers within any realistic deadline.
pub(super) struct StalledSource;

#[async_trait]
impl ImageSource for StalledSource {
    async fn fetch(&self, _image_ref: &str) -> Result<Vec<u8>, AcquisitionError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }
}

/// Scorer answering with a fixed result.
pub(super) struct FixedScorer(pub(super) PointsResult);

#[async_trait]
impl Scorer for FixedScorer {
    async fn score(&self, _image_bytes: &[u8]) -> Result<PointsResult, ScorerError> {
        Ok(self.0.clone())
    }
}

/// Scorer standing in for an unreachable remote classification service.
pub(super) struct UnavailableScorer;

#[async_trait]
impl Scorer for UnavailableScorer {
    async fn score(&self, _image_bytes: &[u8]) -> Result<PointsResult, ScorerError> {
        Err(ScorerError::Status { status: 503 })
    }
}

/// Scorer that never answers within any realistic deadline.
pub(super) struct StalledScorer;

#[async_trait]
impl Scorer for StalledScorer {
    async fn score(&self, _image_bytes: &[u8]) -> Result<PointsResult, ScorerError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(PointsResult::scored(0))
    }
}

pub(super) fn local_scorer() -> LocalScorer<ThresholdClassifier> {
    LocalScorer::new(ScoringService::new(Arc::new(
        ThresholdClassifier::builtin(),
    )))
}

pub(super) fn pipeline<S, K>(source: S, scorer: K) -> RewardPipeline<S, K>
where
    S: ImageSource,
    K: Scorer,
{
    RewardPipeline::new(Arc::new(source), Arc::new(scorer), limits())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
