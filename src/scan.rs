//! Input folder scanning.
//!
//! Lists the regular files directly inside the input folder whose extension
//! is on the allow-list. Subdirectories are not descended into, and the
//! folder itself is never modified.
//!
//! Files are returned sorted by name so that repeated runs over the same
//! folder assign ids in the same order.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Input folder does not exist: {0}")]
    NotFound(PathBuf),
    #[error("Input path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Extensions accepted as source images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "tif"];

/// Whether `path` has one of the [`IMAGE_EXTENSIONS`].
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// Collect candidate source images from `input`.
pub fn scan_input(input: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !input.exists() {
        return Err(ScanError::NotFound(input.to_path_buf()));
    }
    if !input.is_dir() {
        return Err(ScanError::NotADirectory(input.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(input)? {
        let path = entry?.path();
        if path.is_file() && has_image_extension(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
