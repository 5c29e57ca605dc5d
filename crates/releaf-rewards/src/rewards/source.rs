use async_trait::async_trait;
use tracing::debug;

/// Image acquisition failed before any bytes were available.
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("image fetch failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("image fetch returned status {status}")]
    Status { status: u16 },
    #[error("image read failed: {0}")]
    Read(#[from] std::io::Error),
}

/// Resolves an image reference to raw bytes. The pipeline owns the timeout;
/// implementations just perform a single acquisition attempt.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, image_ref: &str) -> Result<Vec<u8>, AcquisitionError>;
}

/// Default source: HTTP(S) references are downloaded, anything else is read
/// from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct HttpImageSource {
    client: reqwest::Client,
}

impl HttpImageSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, image_ref: &str) -> Result<Vec<u8>, AcquisitionError> {
        if image_ref.starts_with("http://") || image_ref.starts_with("https://") {
            let response = self.client.get(image_ref).send().await?;
            if !response.status().is_success() {
                return Err(AcquisitionError::Status {
                    status: response.status().as_u16(),
                });
            }
            let bytes = response.bytes().await?;
            debug!(image_ref, len = bytes.len(), "image downloaded");
            return Ok(bytes.to_vec());
        }

        let bytes = tokio::fs::read(image_ref).await?;
        debug!(image_ref, len = bytes.len(), "image read from disk");
        Ok(bytes)
    }
}
