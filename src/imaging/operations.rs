//! High-level image operations.
//!
//! These functions combine the pure pixel work (alpha flattening, center
//! crop, Lanczos3 resize) with backend decode/encode calls to turn one source
//! file into a full-size image and a thumbnail.

use super::backend::{BackendError, ImageBackend};
use super::calculations::center_crop;
use super::params::{EncodeParams, EncodeSettings};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Extension of every generated file.
pub const OUTPUT_EXTENSION: &str = "webp";

/// Configuration shared by both outputs of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetConfig {
    pub encode: EncodeSettings,
    /// Thumbnail `(width, height)`.
    pub thumbnail_size: (u32, u32),
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            encode: EncodeSettings::default(),
            thumbnail_size: (340, 170),
        }
    }
}

/// Where the two outputs for one asset go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub full: PathBuf,
    pub thumb: PathBuf,
}

impl AssetPaths {
    /// `<full_dir>/<stem>.webp` and `<thumb_dir>/<stem>.webp`.
    pub fn new(full_dir: &Path, thumb_dir: &Path, stem: &str) -> Self {
        let name = format!("{}.{}", stem, OUTPUT_EXTENSION);
        Self {
            full: full_dir.join(&name),
            thumb: thumb_dir.join(&name),
        }
    }
}

/// Composite `channel` over white using `alpha` as coverage.
fn over_white(channel: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((channel as u32 * a + 255 * (255 - a) + 127) / 255) as u8
}

/// Reduce any decoded image to opaque 8-bit RGB.
///
/// Images with an alpha channel (including palette images with a
/// transparent entry, which decode to RGBA) are composited onto white.
/// Everything else is converted directly.
pub fn flatten_to_rgb(image: DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.into_rgb8();
    }
    let rgba = image.into_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        Rgb([over_white(r, a), over_white(g, a), over_white(b, a)])
    })
}

/// Center-crop `image` to the aspect of `size`, then resize to exactly `size`.
pub fn create_thumbnail(image: &RgbImage, size: (u32, u32)) -> RgbImage {
    let rect = center_crop(image.dimensions(), size);
    let cropped = imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image();
    imageops::resize(&cropped, size.0, size.1, FilterType::Lanczos3)
}

/// Decode `source` and write its full-size image and thumbnail.
///
/// On any error, outputs already written for this asset are removed so a
/// failed file leaves nothing behind.
pub fn render_asset(
    backend: &impl ImageBackend,
    source: &Path,
    paths: &AssetPaths,
    config: &AssetConfig,
) -> Result<()> {
    let rgb = flatten_to_rgb(backend.decode(source)?);

    let written = write_outputs(backend, &rgb, paths, config);
    if written.is_err() {
        remove_partial(&paths.full);
        remove_partial(&paths.thumb);
    }
    written
}

fn write_outputs(
    backend: &impl ImageBackend,
    rgb: &RgbImage,
    paths: &AssetPaths,
    config: &AssetConfig,
) -> Result<()> {
    backend.encode(
        rgb,
        &EncodeParams {
            output: paths.full.clone(),
            settings: config.encode,
        },
    )?;

    let thumb = create_thumbnail(rgb, config.thumbnail_size);
    backend.encode(
        &thumb,
        &EncodeParams {
            output: paths.thumb.clone(),
            settings: config.encode,
        },
    )
}

fn remove_partial(path: &Path) {
    // Already absent is the expected case for the second output
    let _ = std::fs::remove_file(path);
}
