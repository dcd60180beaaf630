//! Batch ingest of new background images.
//!
//! One pass over the input folder:
//!
//! ```text
//! scan input/  →  load manifest  →  allocate first id
//!   for each file:  decode → flatten → full.webp + thumb.webp → manifest entry
//! save manifest (only if something was added)
//! ```
//!
//! ## Id assignment
//!
//! The first id is computed once, before any file is touched, from both the
//! manifest and the full-size directory (see [`crate::ids`]). It advances by
//! one after each successful file only, so the ids added by a run form a
//! contiguous block even when some inputs fail. The whole block must fit in
//! the id space before the first file is touched; otherwise the run stops
//! with [`IdError::Exhausted`].
//!
//! ## Failure handling
//!
//! A file that cannot be decoded or encoded is reported through
//! [`IngestEvent::Failed`] and skipped; its partial outputs are removed. A
//! missing or empty input folder is not an error: the run ends with
//! [`Outcome::InputMissing`] or [`Outcome::NoImages`] and touches nothing.
//!
//! ## Crash safety
//!
//! The manifest is written once, after the loop. A run killed midway leaves
//! image files without manifest entries; the next run still treats those ids
//! as taken because the allocator scans the full-size directory.

use crate::config::{IngestConfig, Layout};
use crate::ids::{self, IdError, ImageId};
use crate::imaging::{
    AssetConfig, AssetPaths, EncodeSettings, ImageBackend, Method, OUTPUT_EXTENSION, Quality,
    RustBackend, render_asset,
};
use crate::manifest::{LoadStatus, Manifest, ManifestEntry, ManifestError};
use crate::scan::{self, ScanError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("Id allocation failed: {0}")]
    Ids(#[from] IdError),
}

/// Progress reported while a run is underway.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestEvent {
    /// Candidate files were found in the input folder.
    Found { count: usize },
    /// The existing manifest is unparsable and is being replaced.
    ManifestRecovered { reason: String },
    /// First id this run will hand out.
    StartingId { id: ImageId },
    /// A file was converted and added. `index` is 1-based.
    Processed {
        index: usize,
        total: usize,
        source: PathBuf,
        id: ImageId,
    },
    /// A file was skipped. `index` is 1-based.
    Failed {
        index: usize,
        total: usize,
        source: PathBuf,
        error: String,
    },
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The input folder does not exist (or is not a folder).
    InputMissing(PathBuf),
    /// The input folder has no files with a supported extension.
    NoImages(PathBuf),
    /// Every candidate file was attempted.
    Completed,
}

/// A file that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub source: PathBuf,
    pub error: String,
}

/// Result of a run.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub outcome: Outcome,
    /// Entries appended to the manifest, in id order.
    pub added: Vec<ManifestEntry>,
    pub failures: Vec<Failure>,
    pub manifest_path: PathBuf,
    /// Whether the manifest file was rewritten.
    pub manifest_written: bool,
}

impl IngestReport {
    fn idle(outcome: Outcome, manifest_path: &Path) -> Self {
        Self {
            outcome,
            added: Vec::new(),
            failures: Vec::new(),
            manifest_path: manifest_path.to_path_buf(),
            manifest_written: false,
        }
    }
}

/// Encode settings and thumbnail size taken from config.
pub fn asset_config(config: &IngestConfig) -> AssetConfig {
    AssetConfig {
        encode: EncodeSettings {
            quality: Quality::new(config.images.quality),
            method: Method::new(config.images.method),
        },
        thumbnail_size: (config.thumbnails.size[0], config.thumbnails.size[1]),
    }
}

/// Build the manifest entry for a freshly written asset.
pub fn build_entry(id: ImageId, config: &IngestConfig) -> ManifestEntry {
    let base = config.urls.base_url.trim_end_matches('/');
    ManifestEntry {
        id: id.to_string(),
        category: config.entries.category.clone(),
        kind: "image".to_string(),
        low_res_url: format!("{}/images/thumb/{}.{}", base, id, OUTPUT_EXTENSION),
        high_res_url: format!("{}/images/full/{}.{}", base, id, OUTPUT_EXTENSION),
        name: config.entries.name.clone(),
        featured: config.entries.featured,
    }
}

/// Run an ingest with the production backend.
pub fn ingest(
    config: &IngestConfig,
    layout: &Layout,
    input: &Path,
    on_event: impl FnMut(&IngestEvent),
) -> Result<IngestReport, IngestError> {
    ingest_with_backend(&RustBackend::new(), config, layout, input, on_event)
}

/// Run an ingest using a specific backend (allows testing with mock).
pub fn ingest_with_backend(
    backend: &impl ImageBackend,
    config: &IngestConfig,
    layout: &Layout,
    input: &Path,
    mut on_event: impl FnMut(&IngestEvent),
) -> Result<IngestReport, IngestError> {
    let files = match scan::scan_input(input) {
        Ok(files) => files,
        Err(ScanError::NotFound(path)) | Err(ScanError::NotADirectory(path)) => {
            return Ok(IngestReport::idle(
                Outcome::InputMissing(path),
                &layout.manifest,
            ));
        }
        Err(ScanError::Io(e)) => return Err(e.into()),
    };
    if files.is_empty() {
        return Ok(IngestReport::idle(
            Outcome::NoImages(input.to_path_buf()),
            &layout.manifest,
        ));
    }
    on_event(&IngestEvent::Found { count: files.len() });

    fs::create_dir_all(&layout.full_dir)?;
    fs::create_dir_all(&layout.thumb_dir)?;

    let loaded = Manifest::load(&layout.manifest, config.manifest.on_parse_error)?;
    if let LoadStatus::Recovered(reason) = &loaded.status {
        on_event(&IngestEvent::ManifestRecovered {
            reason: reason.clone(),
        });
    }
    let mut manifest = loaded.manifest;

    let total = files.len();
    let mut next_id = ids::next_image_id(&layout.full_dir, &manifest)?;
    ids::reserve_block(next_id, total)?;
    on_event(&IngestEvent::StartingId { id: next_id });

    let assets = asset_config(config);
    let mut added = Vec::new();
    let mut failures = Vec::new();

    for (i, source) in files.iter().enumerate() {
        let stem = next_id.to_string();
        let paths = AssetPaths::new(&layout.full_dir, &layout.thumb_dir, &stem);

        match render_asset(backend, source, &paths, &assets) {
            Ok(()) => {
                let entry = build_entry(next_id, config);
                manifest.push(&entry)?;
                added.push(entry);
                on_event(&IngestEvent::Processed {
                    index: i + 1,
                    total,
                    source: source.clone(),
                    id: next_id,
                });
                // Only the id after the final possible success can be missing
                if let Some(id) = next_id.next() {
                    next_id = id;
                }
            }
            Err(e) => {
                let error = e.to_string();
                on_event(&IngestEvent::Failed {
                    index: i + 1,
                    total,
                    source: source.clone(),
                    error: error.clone(),
                });
                failures.push(Failure {
                    source: source.clone(),
                    error,
                });
            }
        }
    }

    let manifest_written = !added.is_empty();
    if manifest_written {
        manifest.save(&layout.manifest)?;
    }

    Ok(IngestReport {
        outcome: Outcome::Completed,
        added,
        failures,
        manifest_path: layout.manifest.clone(),
        manifest_written,
    })
}
