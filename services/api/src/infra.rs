use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use releaf_rewards::config::RewardsConfig;
use releaf_rewards::rewards::{
    LocalScorer, ModelLoadError, PointsResult, RemoteScorer, Scorer, ScorerError, ScoringService,
    ThresholdClassifier,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the classifier from the configured artifact, or fall back to the
/// built-in threshold parameters when none is configured.
pub(crate) fn build_classifier(
    model_path: Option<&Path>,
) -> Result<ThresholdClassifier, ModelLoadError> {
    match model_path {
        Some(path) => {
            let classifier = ThresholdClassifier::load(path)?;
            info!(path = %path.display(), version = classifier.version(), "classifier artifact loaded");
            Ok(classifier)
        }
        None => Ok(ThresholdClassifier::builtin()),
    }
}

/// Scoring hop selected by configuration: in-process by default, remote when
/// a scorer URL is configured.
pub(crate) enum ConfiguredScorer {
    Local(LocalScorer<ThresholdClassifier>),
    Remote(RemoteScorer),
}

impl ConfiguredScorer {
    pub(crate) fn from_config(
        config: &RewardsConfig,
        client: reqwest::Client,
        service: ScoringService<ThresholdClassifier>,
    ) -> Self {
        match &config.scorer_url {
            Some(url) => {
                info!(%url, "using remote scorer");
                Self::Remote(RemoteScorer::new(client, url.clone()))
            }
            None => Self::Local(LocalScorer::new(service)),
        }
    }
}

#[async_trait]
impl Scorer for ConfiguredScorer {
    async fn score(&self, image_bytes: &[u8]) -> Result<PointsResult, ScorerError> {
        match self {
            Self::Local(scorer) => scorer.score(image_bytes).await,
            Self::Remote(scorer) => scorer.score(image_bytes).await,
        }
    }
}
