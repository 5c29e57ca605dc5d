use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::{ImageBuffer, Rgb};
use releaf_rewards::rewards::{
    AcquisitionError, HttpImageSource, ImageSource, LocalScorer, PipelineLimits, RewardPipeline,
    RewardRequest, ScoringService, ThresholdClassifier, FALLBACK_POINTS, REASON_ACQUISITION,
};

fn solid_png(rgb: [u8; 3]) -> Vec<u8> {
    let buffer = ImageBuffer::from_pixel(16, 16, Rgb(rgb));
    let mut bytes = Cursor::new(Vec::new());
    buffer
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("png encodes");
    bytes.into_inner()
}

fn limits() -> PipelineLimits {
    PipelineLimits {
        fetch_timeout: Duration::from_secs(2),
        scoring_timeout: Duration::from_secs(2),
    }
}

fn local_scorer() -> LocalScorer<ThresholdClassifier> {
    LocalScorer::new(ScoringService::new(Arc::new(
        ThresholdClassifier::builtin(),
    )))
}

fn request(image_ref: &str) -> RewardRequest {
    RewardRequest {
        post_id: "p1".to_string(),
        user_id: "u1".to_string(),
        tags: vec!["tree-planting".to_string(), "community".to_string()],
        description: Some("neighborhood tree planting".to_string()),
        image_ref: image_ref.to_string(),
    }
}

struct BrokenSource;

#[async_trait]
impl ImageSource for BrokenSource {
    async fn fetch(&self, _image_ref: &str) -> Result<Vec<u8>, AcquisitionError> {
        Err(AcquisitionError::Status { status: 404 })
    }
}

#[tokio::test]
async fn local_image_flows_through_extraction_classification_and_mapping() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    std::io::Write::write_all(&mut file, &solid_png([12, 230, 16])).expect("png written");
    let path = file.path().to_str().expect("utf-8 path").to_string();

    let pipeline = RewardPipeline::new(
        Arc::new(HttpImageSource::default()),
        Arc::new(local_scorer()),
        limits(),
    );

    let response = pipeline
        .compute_reward(request(&path))
        .await
        .expect("valid request computes");

    // Fully green image: High category, 100 points, genuine score.
    assert_eq!(response.points, 100);
    assert!(!response.fallback);
}

#[tokio::test]
async fn moderate_green_image_earns_moderate_points() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    // 5 of 16 columns green: green_ratio 0.3125, inside the Moderate band.
    let buffer = ImageBuffer::from_fn(16, 16, |x, _| {
        if x < 5 {
            Rgb([0u8, 255, 0])
        } else {
            Rgb([200u8, 40, 40])
        }
    });
    let mut bytes = Cursor::new(Vec::new());
    buffer
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("png encodes");
    std::io::Write::write_all(&mut file, &bytes.into_inner()).expect("png written");
    let path = file.path().to_str().expect("utf-8 path").to_string();

    let pipeline = RewardPipeline::new(
        Arc::new(HttpImageSource::default()),
        Arc::new(local_scorer()),
        limits(),
    );

    let response = pipeline
        .compute_reward(request(&path))
        .await
        .expect("valid request computes");

    assert_eq!(response.points, 50);
    assert!(!response.fallback);
}

#[tokio::test]
async fn unreachable_image_degrades_to_the_documented_fallback() {
    let pipeline = RewardPipeline::new(Arc::new(BrokenSource), Arc::new(local_scorer()), limits());

    let response = pipeline
        .compute_reward(request("http://images.test/missing.png"))
        .await
        .expect("fallback is still a success");

    assert_eq!(response.points, FALLBACK_POINTS);
    assert!(response.fallback);
    assert_eq!(response.reason.as_deref(), Some(REASON_ACQUISITION));
}
