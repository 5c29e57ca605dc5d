use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn};

use super::domain::{PointsResult, RewardRequest, RewardResponse, ValidationError};
use super::response;
use super::scorer::Scorer;
use super::source::ImageSource;

/// Fallback reason when the image bytes could not be acquired.
pub const REASON_ACQUISITION: &str = "image acquisition failed";
/// Fallback reason when the scoring hop failed, timed out, or answered with
/// an unusable shape.
pub const REASON_SCORING: &str = "scoring unavailable";

/// Per-stage deadlines for the two network suspension points.
#[derive(Debug, Clone, Copy)]
pub struct PipelineLimits {
    pub fetch_timeout: Duration,
    pub scoring_timeout: Duration,
}

impl Default for PipelineLimits {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(10),
            scoring_timeout: Duration::from_secs(15),
        }
    }
}

/// Network-facing orchestrator for one reward computation.
///
/// Runs Validating, Fetching, Scoring, and Assembling in order. Validation
/// failures are the caller's bug and surface as an error; failure or timeout
/// in either network stage short-circuits to a fallback response. A single
/// attempt per stage, no retries: one fast safe answer beats added latency.
pub struct RewardPipeline<S, K> {
    source: Arc<S>,
    scorer: Arc<K>,
    limits: PipelineLimits,
}

impl<S, K> RewardPipeline<S, K>
where
    S: ImageSource,
    K: Scorer,
{
    pub fn new(source: Arc<S>, scorer: Arc<K>, limits: PipelineLimits) -> Self {
        Self {
            source,
            scorer,
            limits,
        }
    }

    /// Compute the reward for one request. Always yields a usable response
    /// once validation passes; the degraded path is distinguishable only via
    /// the `fallback` flag.
    pub async fn compute_reward(
        &self,
        request: RewardRequest,
    ) -> Result<RewardResponse, ValidationError> {
        request.validate()?;
        info!(
            post_id = %request.post_id,
            user_id = %request.user_id,
            tags = request.tags.len(),
            "computing reward"
        );

        let image_bytes = match timeout(
            self.limits.fetch_timeout,
            self.source.fetch(&request.image_ref),
        )
        .await
        {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(err)) => {
                warn!(post_id = %request.post_id, %err, "image acquisition failed");
                return Ok(response::assemble(
                    &request,
                    PointsResult::fallback(REASON_ACQUISITION),
                ));
            }
            Err(_) => {
                warn!(post_id = %request.post_id, "image acquisition timed out");
                return Ok(response::assemble(
                    &request,
                    PointsResult::fallback(REASON_ACQUISITION),
                ));
            }
        };

        let result = match timeout(self.limits.scoring_timeout, self.scorer.score(&image_bytes))
            .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                warn!(post_id = %request.post_id, %err, "scoring hop failed");
                PointsResult::fallback(REASON_SCORING)
            }
            Err(_) => {
                warn!(post_id = %request.post_id, "scoring hop timed out");
                PointsResult::fallback(REASON_SCORING)
            }
        };

        if result.is_fallback() {
            info!(post_id = %request.post_id, points = result.points, "awarded fallback points");
        } else {
            info!(post_id = %request.post_id, points = result.points, "awarded points");
        }

        Ok(response::assemble(&request, result))
    }
}
