//! Pure Rust resize engine built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Step | Crate / function |
//! |---|---|
//! | Decode | `image::ImageReader` with format sniffing |
//! | Resize | `DynamicImage::resize_to_fill` with `Lanczos3` |
//! | Encode | `image::codecs::jpeg::JpegEncoder::new_with_quality` |
//!
//! `resize_to_fill` scales the source to cover the target box and then
//! center-crops, so the output is always exactly the requested size without
//! distorting the aspect ratio.

use super::backend::{BackendError, ImageBackend};
use super::params::ResizeParams;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` crate.
///
/// Decoding and encoding are deterministic for a given input, which is what
/// lets concurrent cache misses overwrite each other safely.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Encode as baseline JPEG into memory.
///
/// JPEG has no alpha channel, so the image is flattened to RGB8 first.
fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, BackendError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))?;
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn resize_to_jpeg(&self, params: &ResizeParams) -> Result<Vec<u8>, BackendError> {
        let img = load_image(&params.source)?;
        let filled = img.resize_to_fill(params.width, params.height, FilterType::Lanczos3);
        encode_jpeg(&filled, params.quality.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Quality;
    use crate::test_helpers::create_test_jpeg;

    fn params(source: &Path, width: u32, height: u32) -> ResizeParams {
        ResizeParams {
            source: source.to_path_buf(),
            width,
            height,
            quality: Quality::default(),
        }
    }

    #[test]
    fn resize_synthetic_to_exact_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 400, 300);

        let bytes = RustBackend::new()
            .resize_to_jpeg(&params(&source, 100, 100))
            .unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (100, 100));
        assert_eq!(
            image::guess_format(&bytes).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn resize_upscales_when_target_is_larger() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 40, 30);

        let bytes = RustBackend::new()
            .resize_to_jpeg(&params(&source, 160, 90))
            .unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (160, 90));
    }

    #[test]
    fn resize_is_deterministic() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 300, 200);

        let backend = RustBackend::new();
        let a = backend.resize_to_jpeg(&params(&source, 64, 64)).unwrap();
        let b = backend.resize_to_jpeg(&params(&source, 64, 64)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn resize_nonexistent_source_is_io_error() {
        let result =
            RustBackend::new().resize_to_jpeg(&params(Path::new("/nonexistent/a.jpg"), 10, 10));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn resize_corrupt_source_is_processing_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("broken.jpg");
        std::fs::write(&source, b"definitely not a jpeg").unwrap();

        let result = RustBackend::new().resize_to_jpeg(&params(&source, 10, 10));
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }
}
