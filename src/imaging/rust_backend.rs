//! Production backend: `image` for decoding, libwebp (via `webp`) for encoding.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, BMP, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Encode → WebP (lossy, quality + method) | `webp::Encoder::encode_advanced` |
//!
//! The `image` crate's own WebP encoder is lossless-only, so lossy output
//! with a quality knob goes through libwebp.

use super::backend::{BackendError, ImageBackend};
use super::params::EncodeParams;
use image::{DynamicImage, ImageReader, RgbImage};
use std::path::Path;

/// Backend built on the `image` and `webp` crates.
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

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        // Sniff the header so a mislabelled extension still decodes
        ImageReader::open(path)
            .map_err(BackendError::Io)?
            .with_guessed_format()
            .map_err(BackendError::Io)?
            .decode()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "Failed to decode {}: {}",
                    path.display(),
                    e
                ))
            })
    }

    fn encode(&self, image: &RgbImage, params: &EncodeParams) -> Result<(), BackendError> {
        let mut config = webp::WebPConfig::new().map_err(|_| {
            BackendError::ProcessingFailed("Failed to initialise WebP encoder config".into())
        })?;
        config.lossless = 0;
        config.quality = params.settings.quality.value() as f32;
        config.method = params.settings.method.value() as i32;

        let encoder = webp::Encoder::from_rgb(image.as_raw(), image.width(), image.height());
        let encoded = encoder.encode_advanced(&config).map_err(|e| {
            BackendError::ProcessingFailed(format!("WebP encode failed: {:?}", e))
        })?;

        std::fs::write(&params.output, &*encoded)?;
        Ok(())
    }
}
