use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::future::join_all;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{IngestError, ValidationError};

/// Prefix of every inline image produced here
pub const JPEG_DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Largest size an ingested image may have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBounds {
    pub max_width: u32,
    pub max_height: u32,
}

impl ImageBounds {
    pub const fn new(max_width: u32, max_height: u32) -> Self {
        Self { max_width, max_height }
    }
}

/// Compute the output size for a `width`×`height` source.
///
/// Landscape sources wider than the bounds are scaled by width, anything else
/// taller than the bounds by height. If the first pass still leaves the other
/// side out of bounds it is scaled again. Never upscales.
pub fn fit_within(width: u32, height: u32, bounds: ImageBounds) -> (u32, u32) {
    let (mut w, mut h) = (width as f64, height as f64);

    if w >= h && w > bounds.max_width as f64 {
        let scale = bounds.max_width as f64 / w;
        w *= scale;
        h *= scale;
    } else if h > bounds.max_height as f64 {
        let scale = bounds.max_height as f64 / h;
        w *= scale;
        h *= scale;
    }

    // Second pass for sources that overflow both ways
    if h > bounds.max_height as f64 {
        let scale = bounds.max_height as f64 / h;
        w *= scale;
        h *= scale;
    }
    if w > bounds.max_width as f64 {
        let scale = bounds.max_width as f64 / w;
        w *= scale;
        h *= scale;
    }

    (
        (w.round() as u32).clamp(1, width.max(1)),
        (h.round() as u32).clamp(1, height.max(1)),
    )
}

/// Reject a batch that would push an item past `cap` photos.
/// Runs before any file is read.
pub fn check_batch_capacity(existing: usize, incoming: usize, cap: usize) -> Result<(), ValidationError> {
    if existing + incoming > cap {
        return Err(ValidationError::TooManyImages { existing, incoming, cap });
    }
    Ok(())
}

/// Downscale and re-encode an already decoded image, returning a data URL
pub fn encode_inline(img: &DynamicImage, bounds: ImageBounds, quality: f32, file: &str) -> Result<String, IngestError> {
    let (width, height) = fit_within(img.width(), img.height(), bounds);

    let scaled = if (width, height) == (img.width(), img.height()) {
        img.to_rgb8()
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3).to_rgb8()
    };

    let mut jpeg = Vec::new();
    let quality = (quality.clamp(0.01, 1.0) * 100.0).round() as u8;
    JpegEncoder::new_with_quality(&mut jpeg, quality)
        .encode_image(&scaled)
        .map_err(|source| IngestError::Encode { file: file.to_string(), source })?;

    debug!("🗜️  {} -> {}x{} ({}KB)", file, width, height, jpeg.len() / 1024);
    Ok(format!("{}{}", JPEG_DATA_URL_PREFIX, STANDARD.encode(&jpeg)))
}

/// Blocking implementation of single-file ingestion
fn ingest_file_blocking(path: &Path, bounds: ImageBounds, quality: f32) -> Result<String, IngestError> {
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let bytes = std::fs::read(path).map_err(|source| IngestError::Read { file: file.clone(), source })?;
    let img = image::load_from_memory(&bytes).map_err(|source| IngestError::Decode { file: file.clone(), source })?;

    encode_inline(&img, bounds, quality, &file)
}

/// Turn one picked file into an inline image
pub async fn ingest_file(path: PathBuf, bounds: ImageBounds, quality: f32) -> Result<String, IngestError> {
    // Spawn blocking because decoding and resampling are CPU-intensive
    tokio::task::spawn_blocking(move || ingest_file_blocking(&path, bounds, quality))
        .await
        .map_err(|e| IngestError::Worker { message: e.to_string() })?
}

/// Ingest a batch of files concurrently.
///
/// All files run to completion before this returns. If any file fails, the
/// whole batch fails with the first error in input order and nothing is
/// returned.
pub async fn ingest_batch(paths: Vec<PathBuf>, bounds: ImageBounds, quality: f32) -> Result<Vec<String>, IngestError> {
    let count = paths.len();
    let jobs = paths.into_iter().map(|path| ingest_file(path, bounds, quality));

    let images = join_all(jobs).await.into_iter().collect::<Result<Vec<_>, _>>()?;

    info!("📸 Ingested {} images", count);
    Ok(images)
}

/// Decode an inline data URL back into its raw bytes.
/// Returns `None` for remote references and malformed strings.
pub fn decode_inline(image: &str) -> Option<Vec<u8>> {
    let rest = image.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    if !header.ends_with(";base64") {
        return None;
    }
    STANDARD.decode(payload).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    const PORTFOLIO: ImageBounds = ImageBounds::new(2000, 1200);

    fn synthetic(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    }

    fn decoded_size(inline: &str) -> (u32, u32) {
        let bytes = decode_inline(inline).unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn test_fit_wide_source() {
        assert_eq!(fit_within(4000, 2000, PORTFOLIO), (2000, 1000));
    }

    #[test]
    fn test_fit_tall_source() {
        assert_eq!(fit_within(1500, 3000, PORTFOLIO), (600, 1200));
    }

    #[test]
    fn test_fit_landscape_within_width_but_too_tall() {
        assert_eq!(fit_within(1900, 1500, PORTFOLIO), (1520, 1200));
    }

    #[test]
    fn test_fit_never_exceeds_either_bound() {
        let (w, h) = fit_within(4000, 3900, PORTFOLIO);
        assert!(w <= 2000 && h <= 1200);
    }

    #[test]
    fn test_fit_never_upscales() {
        assert_eq!(fit_within(640, 480, PORTFOLIO), (640, 480));
    }

    #[test]
    fn test_encode_scales_and_keeps_aspect() {
        let inline = encode_inline(&synthetic(4000, 2000), PORTFOLIO, 0.85, "wide.png").unwrap();
        assert!(inline.starts_with(JPEG_DATA_URL_PREFIX));

        let (w, h) = decoded_size(&inline);
        assert!(w <= 2000 && h <= 1200);
        let ratio = w as f64 / h as f64;
        assert!((ratio - 2.0).abs() < 0.01);
    }

    #[test]
    fn test_batch_capacity() {
        let err = check_batch_capacity(45, 10, 50).unwrap_err();
        assert_eq!(err, ValidationError::TooManyImages { existing: 45, incoming: 10, cap: 50 });
        assert!(check_batch_capacity(45, 5, 50).is_ok());
    }

    #[test]
    fn test_decode_inline_rejects_remote_references() {
        assert!(decode_inline("https://images.unsplash.com/photo.jpg").is_none());
        assert!(decode_inline("data:image/jpeg,notbase64").is_none());
        assert_eq!(decode_inline("data:image/png;base64,AAEC"), Some(vec![0, 1, 2]));
    }

    #[tokio::test]
    async fn test_ingest_batch_reencodes_every_file() {
        let dir = TempDir::new().unwrap();
        let small = dir.path().join("small.png");
        let large = dir.path().join("large.png");
        synthetic(320, 240).save(&small).unwrap();
        synthetic(2400, 1200).save(&large).unwrap();

        let images = ingest_batch(vec![small, large], PORTFOLIO, 0.85).await.unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(decoded_size(&images[0]), (320, 240));
        assert_eq!(decoded_size(&images[1]), (2000, 1000));
    }

    #[tokio::test]
    async fn test_ingest_batch_fails_as_a_whole() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.png");
        let bad = dir.path().join("bad.jpg");
        synthetic(100, 100).save(&good).unwrap();
        std::fs::write(&bad, b"not an image").unwrap();

        let err = ingest_batch(vec![good, bad], PORTFOLIO, 0.85).await.unwrap_err();
        assert!(matches!(err, IngestError::Decode { ref file, .. } if file == "bad.jpg"));
    }

    #[tokio::test]
    async fn test_missing_file_is_a_read_error() {
        let err = ingest_file(PathBuf::from("/nonexistent/path.jpg"), PORTFOLIO, 0.85).await.unwrap_err();
        assert!(matches!(err, IngestError::Read { .. }));
    }
}
