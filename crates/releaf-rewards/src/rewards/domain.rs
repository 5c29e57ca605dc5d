use serde::{Deserialize, Serialize};

/// Point value returned whenever a genuine classification result could not be
/// obtained. Chosen so degraded responses sit inside the normal point range
/// rather than signalling an error to the end user.
pub const FALLBACK_POINTS: u32 = 200;

/// Incoming reward computation request for a single post.
///
/// All fields are deserialized leniently so that missing identity fields
/// reach [`RewardRequest::validate`] and produce the documented client error
/// instead of a body-rejection from the framework.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardRequest {
    #[serde(default)]
    pub post_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_ref: String,
}

impl RewardRequest {
    /// Reject requests missing the identity fields or the image reference.
    ///
    /// This is the only failure the pipeline surfaces as an error; everything
    /// after validation degrades to a fallback response.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.post_id.trim().is_empty() || self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingIdentity);
        }
        if self.image_ref.trim().is_empty() {
            return Err(ValidationError::MissingImageRef);
        }
        Ok(())
    }
}

/// Malformed-request failures, surfaced to the caller as a client error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("postId and userId are required")]
    MissingIdentity,
    #[error("imageRef is required")]
    MissingImageRef,
}

/// Color summary of a decoded image, the classifier's only input.
///
/// Channel means are computed in double precision over every pixel;
/// `green_ratio` is the fraction of pixels whose green channel strictly
/// exceeds both red and blue, always within `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub avg_red: f64,
    pub avg_green: f64,
    pub avg_blue: f64,
    pub green_ratio: f64,
}

impl FeatureVector {
    pub const LEN: usize = 4;

    pub fn as_array(&self) -> [f64; Self::LEN] {
        [self.avg_red, self.avg_green, self.avg_blue, self.green_ratio]
    }
}

/// Greenness category produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Low,
    Moderate,
    High,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Low, Category::Moderate, Category::High];

    /// Training-domain label, used in scorer responses and user messages.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Low => "Low Green",
            Category::Moderate => "Moderate Green",
            Category::High => "High Green",
        }
    }
}

/// How a point value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMethod {
    Scored,
    Fallback,
}

/// Outcome of one scoring attempt, genuine or degraded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsResult {
    pub points: u32,
    pub method: ScoreMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PointsResult {
    pub fn scored(points: u32) -> Self {
        Self {
            points,
            method: ScoreMethod::Scored,
            reason: None,
        }
    }

    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            points: FALLBACK_POINTS,
            method: ScoreMethod::Fallback,
            reason: Some(reason.into()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.method == ScoreMethod::Fallback
    }
}

/// Payload crossing the outer system boundary back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardResponse {
    pub post_id: String,
    pub user_id: String,
    pub points: u32,
    pub fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
