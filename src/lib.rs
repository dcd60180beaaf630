//! # bg-ingest
//!
//! Adds new background images to a static asset store. Each run takes a
//! folder of source images, writes a full-size WebP and a 340x170 thumbnail
//! for each, gives each one the next free `image-<n>` id, and appends a
//! placeholder entry to `store/backgrounds.json` for a maintainer to fill in.
//!
//! ```text
//! input_images/photo.jpg
//!   → store/backgrounds/images/full/image-12.webp
//!   → store/backgrounds/images/thumb/image-12.webp
//!   → store/backgrounds.json  += { "id": "image-12", ... }
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `bg-ingest.toml` loading over stock defaults, validation, path [`config::Layout`] |
//! | [`scan`] | Lists candidate images in the input folder |
//! | [`ids`] | `image-<n>` parsing and next-id allocation from manifest + disk |
//! | [`imaging`] | Decode, alpha flattening, center-crop thumbnails, WebP encoding |
//! | [`manifest`] | `backgrounds.json` types, load with parse-error policy, save |
//! | [`ingest`] | The run itself: ties the stages together, reports progress |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Two Sources of Truth for Ids
//!
//! The manifest is edited by hand and image files are sometimes left behind,
//! so the next id is one past the largest number found in *either* the
//! manifest or the full-size directory. Gaps are never refilled.
//!
//! ## One Manifest Write Per Run
//!
//! Images are written as they are processed; the manifest only once at the
//! end, and only if something was added. An interrupted run cannot corrupt
//! the manifest, and its orphaned files still reserve their ids.
//!
//! ## Existing Entries Are Opaque
//!
//! Entries already in the manifest are kept as raw JSON, key order included.
//! Only the `id` string is read from them. A hand edit that changes a value's
//! type never causes the manifest to be discarded.
//!
//! ## Explicit Configuration
//!
//! Paths, base URL, encode settings and placeholders live in
//! [`config::IngestConfig`] and are passed in, never read from globals, so
//! tests run the whole pipeline inside a temporary directory.

pub mod config;
pub mod ids;
pub mod imaging;
pub mod ingest;
pub mod manifest;
pub mod output;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
