//! Image processing.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (jpeg, png, gif, bmp, tiff, webp) |
//! | **Flatten** | alpha composited over white → `RgbImage` |
//! | **Thumbnail** | center crop + `imageops::resize` (Lanczos3) |
//! | **Encode** | libwebp via the `webp` crate, lossy, quality + method |
//!
//! The module is split into:
//! - **Calculations**: Pure crop math (unit testable)
//! - **Parameters**: Data structures describing encodes
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Flatten, thumbnail and the decode → encode pipeline for one asset

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{CropRect, center_crop};
pub use operations::{
    AssetConfig, AssetPaths, OUTPUT_EXTENSION, create_thumbnail, flatten_to_rgb,
    render_asset,
};
pub use params::{EncodeParams, EncodeSettings, Method, Quality};
pub use rust_backend::RustBackend;
