//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait covers the two operations that touch codecs:
//! decoding a source file and encoding a finished RGB buffer to disk.
//! Everything between (flattening, cropping, resizing) is plain pixel work
//! in [`operations`](super::operations).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::EncodeParams;
use image::{DynamicImage, RgbImage};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Open and fully decode a source image.
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Encode an opaque RGB image and write it to `params.output`.
    fn encode(&self, image: &RgbImage, params: &EncodeParams) -> Result<(), BackendError>;
}
