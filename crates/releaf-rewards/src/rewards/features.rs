use super::domain::FeatureVector;

/// Failure to turn raw bytes into a feature vector.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("image bytes could not be decoded: {0}")]
    Undecodable(#[from] image::ImageError),
    #[error("image has zero area")]
    EmptyImage,
}

/// Decode `bytes` and compute the color feature summary.
///
/// The image is normalized to 8-bit RGB before any statistics are taken, so
/// the channel order is canonical regardless of the source encoding. Sums are
/// accumulated in f64 to stay exact for any realistic image size.
pub fn extract(bytes: &[u8]) -> Result<FeatureVector, DecodeError> {
    let rgb = image::load_from_memory(bytes)?.to_rgb8();

    let pixel_count = (rgb.width() as u64) * (rgb.height() as u64);
    if pixel_count == 0 {
        return Err(DecodeError::EmptyImage);
    }

    let mut sum_red = 0.0f64;
    let mut sum_green = 0.0f64;
    let mut sum_blue = 0.0f64;
    let mut green_dominant = 0u64;

    for pixel in rgb.pixels() {
        let [red, green, blue] = pixel.0;
        sum_red += red as f64;
        sum_green += green as f64;
        sum_blue += blue as f64;
        if green > red && green > blue {
            green_dominant += 1;
        }
    }

    let total = pixel_count as f64;
    Ok(FeatureVector {
        avg_red: sum_red / total,
        avg_green: sum_green / total,
        avg_blue: sum_blue / total,
        green_ratio: green_dominant as f64 / total,
    })
}
