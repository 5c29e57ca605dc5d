use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::classifier::Classifier;
use super::domain::RewardRequest;
use super::pipeline::RewardPipeline;
use super::scorer::Scorer;
use super::scoring::{ScoreBreakdown, ScoringError, ScoringService};
use super::source::ImageSource;

/// Router builder for the reward computation endpoint.
pub fn reward_router<S, K>(pipeline: Arc<RewardPipeline<S, K>>) -> Router
where
    S: ImageSource + 'static,
    K: Scorer + 'static,
{
    Router::new()
        .route("/api/v1/rewards", post(compute_reward_handler::<S, K>))
        .with_state(pipeline)
}

/// Router builder for the inbound scoring endpoint (the surface another
/// deployment's [`super::scorer::RemoteScorer`] talks to).
pub fn scoring_router<C>(service: Arc<ScoringService<C>>) -> Router
where
    C: Classifier + 'static,
{
    Router::new()
        .route("/api/v1/score", post(score_image_handler::<C>))
        .with_state(service)
}

pub(crate) async fn compute_reward_handler<S, K>(
    State(pipeline): State<Arc<RewardPipeline<S, K>>>,
    axum::Json(request): axum::Json<RewardRequest>,
) -> Response
where
    S: ImageSource + 'static,
    K: Scorer + 'static,
{
    match pipeline.compute_reward(request).await {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
    }
}

/// Diagnostic half of the scoring endpoint response.
#[derive(Debug, Serialize)]
pub(crate) struct DeveloperData {
    #[serde(rename = "avg_R")]
    pub(crate) avg_r: f64,
    #[serde(rename = "avg_G")]
    pub(crate) avg_g: f64,
    #[serde(rename = "avg_B")]
    pub(crate) avg_b: f64,
    pub(crate) green_ratio: f64,
    pub(crate) predicted_label: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserData {
    pub(crate) carbon_credit_points: u32,
    pub(crate) message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScoreView {
    pub(crate) developer_data: DeveloperData,
    pub(crate) user_data: UserData,
}

impl ScoreView {
    pub(crate) fn from_breakdown(breakdown: &ScoreBreakdown) -> Self {
        let label = breakdown.category.label();
        Self {
            developer_data: DeveloperData {
                avg_r: breakdown.features.avg_red,
                avg_g: breakdown.features.avg_green,
                avg_b: breakdown.features.avg_blue,
                green_ratio: breakdown.features.green_ratio,
                predicted_label: label,
            },
            user_data: UserData {
                carbon_credit_points: breakdown.points,
                message: format!(
                    "Your image was classified as '{label}'. You earned {points} eco-credits!",
                    points = breakdown.points
                ),
            },
        }
    }
}

pub(crate) async fn score_image_handler<C>(
    State(service): State<Arc<ScoringService<C>>>,
    mut multipart: Multipart,
) -> Response
where
    C: Classifier + 'static,
{
    let mut image_bytes = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("image") => {
                match field.bytes().await {
                    Ok(bytes) => image_bytes = Some(bytes),
                    Err(_) => break,
                }
                break;
            }
            Ok(Some(_)) => continue,
            Ok(None) | Err(_) => break,
        }
    }

    let Some(image_bytes) = image_bytes else {
        let payload = json!({ "error": "no file part 'image' in request" });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    };

    match service.score_detailed(&image_bytes) {
        Ok(breakdown) => {
            let view = ScoreView::from_breakdown(&breakdown);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(ScoringError::Decode(error)) => {
            let payload = json!({ "error": format!("failed to process image: {error}") });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(ScoringError::Inference(error)) => {
            let payload = json!({ "error": format!("model prediction failed: {error}") });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
