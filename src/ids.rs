//! Sequential asset identifiers of the form `image-<n>`.
//!
//! Ids are allocated from two sources that can drift apart: the manifest and
//! the files already written to the full-size directory. A manifest entry may
//! be deleted by hand while its files stay behind, and an interrupted run
//! leaves files with no manifest entry. Both sources are reconciled so an id
//! is never handed out twice.
//!
//! ## Matching
//!
//! The number is taken from the leftmost `image-` followed by at least one
//! digit anywhere in the string:
//! - `"image-12"` → 12
//! - `"image-12.webp"` → 12
//! - `"old-image-7-copy"` → 7
//! - `"image-"`, `"image-x"`, `"photo-3"` → no match
//!
//! Digit runs too long for `u64` claim `u64::MAX`, which leaves no id to
//! hand out: allocation then fails with [`IdError::Exhausted`].

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::manifest::Manifest;

const PREFIX: &str = "image-";

#[derive(Error, Debug)]
pub enum IdError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("No ids left: {needed} more needed after image-{last}")]
    Exhausted { last: u64, needed: u64 },
}

/// A numeric asset id rendered as `image-<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageId(pub u64);

impl ImageId {
    pub fn value(self) -> u64 {
        self.0
    }

    /// The id that follows this one, if there is one.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PREFIX, self.0)
    }
}

/// Extract the number from the first `image-<digits>` occurrence in `text`.
pub fn parse_image_number(text: &str) -> Option<u64> {
    for (pos, _) in text.match_indices(PREFIX) {
        let rest = &text[pos + PREFIX.len()..];
        let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits_len == 0 {
            continue;
        }
        return Some(rest[..digits_len].parse::<u64>().unwrap_or(u64::MAX));
    }
    None
}

/// Numbers claimed by files in the full-size output directory.
///
/// A missing directory claims nothing.
pub fn ids_on_disk(full_dir: &Path) -> io::Result<Vec<u64>> {
    let entries = match fs::read_dir(full_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let mut ids = Vec::new();
    for entry in entries {
        let entry = entry?;
        if let Some(n) = parse_image_number(&entry.file_name().to_string_lossy()) {
            ids.push(n);
        }
    }
    Ok(ids)
}

/// Numbers claimed by `id` fields in the manifest.
pub fn ids_in_manifest(manifest: &Manifest) -> Vec<u64> {
    manifest.ids().filter_map(parse_image_number).collect()
}

/// First id strictly greater than every id claimed on disk or in the manifest.
pub fn next_image_id(full_dir: &Path, manifest: &Manifest) -> Result<ImageId, IdError> {
    let on_disk = ids_on_disk(full_dir)?;
    let max = on_disk
        .into_iter()
        .chain(ids_in_manifest(manifest))
        .max();
    match max {
        None => Ok(ImageId(1)),
        Some(last) => ImageId(last)
            .next()
            .ok_or(IdError::Exhausted { last, needed: 1 }),
    }
}

/// Check that `count` consecutive ids starting at `first` all exist.
pub fn reserve_block(first: ImageId, count: usize) -> Result<(), IdError> {
    let Some(extra) = (count as u64).checked_sub(1) else {
        return Ok(());
    };
    match first.0.checked_add(extra) {
        Some(_) => Ok(()),
        None => Err(IdError::Exhausted {
            last: u64::MAX,
            needed: extra - (u64::MAX - first.0),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestEntry;
    use tempfile::TempDir;

    fn manifest_with(ids: &[&str]) -> Manifest {
        let mut manifest = Manifest::default();
        for id in ids {
            manifest
                .push(&ManifestEntry {
                    id: (*id).to_string(),
                    ..ManifestEntry::default()
                })
                .unwrap();
        }
        manifest
    }

    #[test]
    fn parses_plain_id() {
        assert_eq!(parse_image_number("image-12"), Some(12));
    }

    #[test]
    fn parses_filename_with_extension() {
        assert_eq!(parse_image_number("image-3.webp"), Some(3));
    }

    #[test]
    fn parses_embedded_match() {
        assert_eq!(parse_image_number("old-image-7-copy"), Some(7));
    }

    #[test]
    fn skips_prefix_without_digits() {
        assert_eq!(parse_image_number("image-x image-4"), Some(4));
        assert_eq!(parse_image_number("image-"), None);
        assert_eq!(parse_image_number("photo-3"), None);
        assert_eq!(parse_image_number(""), None);
    }

    #[test]
    fn display_renders_prefix() {
        assert_eq!(ImageId(42).to_string(), "image-42");
        assert_eq!(ImageId(1).next(), Some(ImageId(2)));
        assert_eq!(ImageId(u64::MAX).next(), None);
    }

    #[test]
    fn oversized_number_claims_the_maximum() {
        assert_eq!(
            parse_image_number("image-18446744073709551615"),
            Some(u64::MAX)
        );
        assert_eq!(
            parse_image_number("image-99999999999999999999999"),
            Some(u64::MAX)
        );
    }

    #[test]
    fn largest_id_leaves_nothing_to_allocate() {
        let tmp = TempDir::new().unwrap();
        let manifest = manifest_with(&["image-1", "image-18446744073709551615"]);
        let result = next_image_id(tmp.path(), &manifest);
        assert!(matches!(
            result,
            Err(IdError::Exhausted { last: u64::MAX, needed: 1 })
        ));
    }

    #[test]
    fn last_free_id_is_still_allocated() {
        let tmp = TempDir::new().unwrap();
        let manifest = manifest_with(&["image-18446744073709551614"]);
        let id = next_image_id(tmp.path(), &manifest).unwrap();
        assert_eq!(id, ImageId(u64::MAX));
    }

    #[test]
    fn block_must_fit_below_the_maximum() {
        assert!(reserve_block(ImageId(1), 0).is_ok());
        assert!(reserve_block(ImageId(u64::MAX), 1).is_ok());
        assert!(reserve_block(ImageId(u64::MAX - 2), 3).is_ok());
        assert!(matches!(
            reserve_block(ImageId(u64::MAX - 2), 5),
            Err(IdError::Exhausted { last: u64::MAX, needed: 2 })
        ));
    }

    #[test]
    fn empty_store_starts_at_one() {
        let tmp = TempDir::new().unwrap();
        let id = next_image_id(&tmp.path().join("missing"), &Manifest::default()).unwrap();
        assert_eq!(id, ImageId(1));
    }

    #[test]
    fn gap_in_manifest_is_not_reused() {
        let tmp = TempDir::new().unwrap();
        let manifest = manifest_with(&["image-1", "image-3"]);
        let id = next_image_id(tmp.path(), &manifest).unwrap();
        assert_eq!(id, ImageId(4));
    }

    #[test]
    fn leftover_files_count_as_claimed() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("image-9.webp"), b"").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"").unwrap();
        let manifest = manifest_with(&["image-2"]);
        let id = next_image_id(tmp.path(), &manifest).unwrap();
        assert_eq!(id, ImageId(10));
    }

    #[test]
    fn manifest_ahead_of_disk_wins() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("image-1.webp"), b"").unwrap();
        let manifest = manifest_with(&["image-5", "custom-id"]);
        let id = next_image_id(tmp.path(), &manifest).unwrap();
        assert_eq!(id, ImageId(6));
    }
}
