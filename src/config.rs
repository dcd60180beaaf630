//! Ingest configuration module.
//!
//! Handles loading, validating, and resolving `bg-ingest.toml`. Stock defaults
//! reproduce the layout of the background store; a config file in the project
//! root overrides only the values it names.
//!
//! ## Config File Location
//!
//! ```text
//! project/
//! ├── bg-ingest.toml           # Optional overrides
//! ├── input_images/            # Default input folder
//! └── store/
//!     ├── backgrounds.json     # Manifest
//!     └── backgrounds/images/
//!         ├── full/            # Full-size WebP
//!         └── thumb/           # 340x170 thumbnails
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! input = "input_images"
//! full_dir = "store/backgrounds/images/full"
//! thumb_dir = "store/backgrounds/images/thumb"
//! manifest = "store/backgrounds.json"
//!
//! [urls]
//! base_url = "https://raw.githubusercontent.com/BetterSEQTA/BetterSEQTA-Themes/main/store/backgrounds"
//!
//! [images]
//! quality = 85              # WebP quality (1-100)
//! method = 6                # WebP compression effort (0-6)
//!
//! [thumbnails]
//! size = [340, 170]         # width, height
//!
//! [entries]
//! category = "Uncategorized"
//! name = "No Tags"
//! featured = false
//!
//! [manifest]
//! on_parse_error = "fallback"   # or "fail"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional config file in the project root.
pub const CONFIG_FILENAME: &str = "bg-ingest.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Ingest configuration loaded from `bg-ingest.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Input folder and store locations, relative to the project root.
    pub paths: PathsConfig,
    /// URL prefix written into manifest entries.
    pub urls: UrlsConfig,
    /// WebP encoding settings shared by full-size images and thumbnails.
    pub images: ImagesConfig,
    /// Thumbnail dimensions.
    pub thumbnails: ThumbnailsConfig,
    /// Placeholder values for new manifest entries.
    pub entries: EntriesConfig,
    /// Manifest loading policy.
    pub manifest: ManifestConfig,
}

impl IngestConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.quality == 0 || self.images.quality > 100 {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.images.method > 6 {
            return Err(ConfigError::Validation("images.method must be 0-6".into()));
        }
        if self.thumbnails.size[0] == 0 || self.thumbnails.size[1] == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.size values must be non-zero".into(),
            ));
        }
        if self.urls.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "urls.base_url must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Resolve every configured path against `root`.
    pub fn layout(&self, root: &Path) -> Layout {
        Layout {
            root: root.to_path_buf(),
            input: root.join(&self.paths.input),
            full_dir: root.join(&self.paths.full_dir),
            thumb_dir: root.join(&self.paths.thumb_dir),
            manifest: root.join(&self.paths.manifest),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub input: PathBuf,
    pub full_dir: PathBuf,
    pub thumb_dir: PathBuf,
    pub manifest: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input_images"),
            full_dir: PathBuf::from("store/backgrounds/images/full"),
            thumb_dir: PathBuf::from("store/backgrounds/images/thumb"),
            manifest: PathBuf::from("store/backgrounds.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UrlsConfig {
    /// Prefix for `lowResUrl`/`highResUrl`. A trailing slash is ignored.
    pub base_url: String,
}

impl Default for UrlsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://raw.githubusercontent.com/BetterSEQTA/BetterSEQTA-Themes/main/store/backgrounds"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Lossy WebP quality (1 = worst, 100 = best).
    pub quality: u32,
    /// libwebp compression method (0 = fastest, 6 = smallest output).
    pub method: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            quality: 85,
            method: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Thumbnail size as `[width, height]`.
    pub size: [u32; 2],
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self { size: [340, 170] }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntriesConfig {
    pub category: String,
    pub name: String,
    pub featured: bool,
}

impl Default for EntriesConfig {
    fn default() -> Self {
        Self {
            category: "Uncategorized".to_string(),
            name: "No Tags".to_string(),
            featured: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
    pub on_parse_error: ParseErrorPolicy,
}

/// What to do when the existing manifest cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorPolicy {
    /// Warn and continue with an empty manifest. The next save overwrites the file.
    #[default]
    Fallback,
    /// Abort the run before any image is processed.
    Fail,
}

/// Absolute locations a run reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub root: PathBuf,
    pub input: PathBuf,
    pub full_dir: PathBuf,
    pub thumb_dir: PathBuf,
    pub manifest: PathBuf,
}

impl Layout {
    /// Resolve a user-supplied input folder: absolute paths are kept,
    /// relative ones are joined onto the project root.
    pub fn resolve_input(&self, arg: Option<&Path>) -> PathBuf {
        match arg {
            Some(p) if p.is_absolute() => p.to_path_buf(),
            Some(p) => self.root.join(p),
            None => self.input.clone(),
        }
    }

    /// Parent of the image directories, shown in the run header.
    pub fn store_dir(&self) -> &Path {
        self.full_dir
            .parent()
            .and_then(Path::parent)
            .unwrap_or(&self.full_dir)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(IngestConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `bg-ingest.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge user values on top of stock defaults, reject unknown keys, validate.
pub fn load_config(root: &Path) -> Result<IngestConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: IngestConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_store_layout() {
        let config = IngestConfig::default();
        assert_eq!(config.paths.input, PathBuf::from("input_images"));
        assert_eq!(
            config.paths.full_dir,
            PathBuf::from("store/backgrounds/images/full")
        );
        assert_eq!(config.paths.manifest, PathBuf::from("store/backgrounds.json"));
        assert_eq!(config.images.quality, 85);
        assert_eq!(config.images.method, 6);
        assert_eq!(config.thumbnails.size, [340, 170]);
        assert_eq!(config.entries.category, "Uncategorized");
        assert!(!config.entries.featured);
        assert_eq!(config.manifest.on_parse_error, ParseErrorPolicy::Fallback);
    }

    #[test]
    fn load_config_without_file_returns_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, IngestConfig::default());
    }

    #[test]
    fn partial_config_overrides_only_named_keys() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[images]\nquality = 70\n\n[manifest]\non_parse_error = \"fail\"\n",
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.images.quality, 70);
        assert_eq!(config.images.method, 6);
        assert_eq!(config.manifest.on_parse_error, ParseErrorPolicy::Fail);
        assert_eq!(config.thumbnails.size, [340, 170]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[images]\nqualty = 70\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        let mut config = IngestConfig::default();
        config.images.quality = 0;
        assert!(config.validate().is_err());

        let mut config = IngestConfig::default();
        config.images.method = 7;
        assert!(config.validate().is_err());

        let mut config = IngestConfig::default();
        config.thumbnails.size = [340, 0];
        assert!(config.validate().is_err());

        let mut config = IngestConfig::default();
        config.urls.base_url = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn merge_toml_keeps_base_keys() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn layout_resolves_against_root() {
        let layout = IngestConfig::default().layout(Path::new("/project"));
        assert_eq!(layout.input, PathBuf::from("/project/input_images"));
        assert_eq!(
            layout.thumb_dir,
            PathBuf::from("/project/store/backgrounds/images/thumb")
        );
        assert_eq!(
            layout.manifest,
            PathBuf::from("/project/store/backgrounds.json")
        );
        assert_eq!(layout.store_dir(), Path::new("/project/store/backgrounds"));
    }

    #[test]
    fn resolve_input_handles_relative_and_absolute() {
        let layout = IngestConfig::default().layout(Path::new("/project"));
        assert_eq!(
            layout.resolve_input(None),
            PathBuf::from("/project/input_images")
        );
        assert_eq!(
            layout.resolve_input(Some(Path::new("batch"))),
            PathBuf::from("/project/batch")
        );
        assert_eq!(
            layout.resolve_input(Some(Path::new("/elsewhere/batch"))),
            PathBuf::from("/elsewhere/batch")
        );
    }
}
