use super::domain::{PointsResult, RewardRequest, RewardResponse, ScoreMethod};

/// Shape the outgoing payload from a validated request and a resolved points
/// result. Pure mapping with no failure modes.
pub fn assemble(request: &RewardRequest, result: PointsResult) -> RewardResponse {
    RewardResponse {
        post_id: request.post_id.clone(),
        user_id: request.user_id.clone(),
        points: result.points,
        fallback: result.method == ScoreMethod::Fallback,
        reason: result.reason,
    }
}
