//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! and the [`backend`](super::backend), which does the pixel and codec work.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 85). Clamped on construction.
//! - [`Method`]: libwebp compression effort (0–6, default 6). Clamped on construction.
//! - [`EncodeSettings`]: Quality + method, shared by full-size images and thumbnails.
//! - [`EncodeParams`]: Everything needed for one encode: output path + settings.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Compression effort (0 = fastest, 6 = slowest and smallest).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Method(pub u32);

impl Method {
    pub fn new(value: u32) -> Self {
        Self(value.min(6))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Method {
    fn default() -> Self {
        Self(6)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeSettings {
    pub quality: Quality,
    pub method: Method,
}

/// Parameters for a single encode-to-file operation.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub output: PathBuf,
    pub settings: EncodeSettings,
}
