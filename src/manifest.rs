//! The background manifest (`store/backgrounds.json`).
//!
//! ```json
//! {
//!   "backgrounds": [
//!     {
//!       "id": "image-1",
//!       "category": "Uncategorized",
//!       "type": "image",
//!       "lowResUrl": "<base>/images/thumb/image-1.webp",
//!       "highResUrl": "<base>/images/full/image-1.webp",
//!       "name": "No Tags",
//!       "featured": false
//!     }
//!   ]
//! }
//! ```
//!
//! The file is read once at the start of a run and written once at the end.
//! Existing entries are kept as raw JSON: a hand-edited `"name": null` or a
//! numeric `id` is carried through untouched, in its original key order.
//! Only new entries go through the typed [`ManifestEntry`].
//!
//! A file is *unparsable* when it is not valid JSON, when the top level is
//! not an object, or when `backgrounds` is present but not an array. Those
//! cases go through [`ParseErrorPolicy`]; everything else loads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::config::ParseErrorPolicy;

const BACKGROUNDS_KEY: &str = "backgrounds";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not parse {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// One background asset, as written for a newly ingested image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub id: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub low_res_url: String,
    pub high_res_url: String,
    pub name: String,
    pub featured: bool,
}

impl Default for ManifestEntry {
    fn default() -> Self {
        Self {
            id: String::new(),
            category: String::new(),
            kind: "image".to_string(),
            low_res_url: String::new(),
            high_res_url: String::new(),
            name: String::new(),
            featured: false,
        }
    }
}

/// Top-level manifest object.
///
/// `backgrounds` is held apart from the other top-level keys, with its
/// position among them, so the object is rebuilt in file order on save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    backgrounds: Vec<Value>,
    others: Map<String, Value>,
    position: usize,
}

/// How the manifest was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// No manifest file existed; starting empty.
    Missing,
    Loaded,
    /// The file existed but did not parse; starting empty. Carries the reason.
    Recovered(String),
}

#[derive(Debug)]
pub struct LoadedManifest {
    pub manifest: Manifest,
    pub status: LoadStatus,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Manifest {
    /// Read the manifest at `path`.
    ///
    /// A missing file yields an empty manifest. A file that fails to parse
    /// yields an empty manifest under [`ParseErrorPolicy::Fallback`] and an
    /// error under [`ParseErrorPolicy::Fail`]. Read errors other than
    /// not-found are always returned.
    pub fn load(path: &Path, policy: ParseErrorPolicy) -> Result<LoadedManifest, ManifestError> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(LoadedManifest {
                    manifest: Self::default(),
                    status: LoadStatus::Missing,
                });
            }
            Err(e) => return Err(e.into()),
        };
        let parsed = serde_json::from_str::<Value>(&content)
            .map_err(|e| e.to_string())
            .and_then(Self::from_value);
        match parsed {
            Ok(manifest) => Ok(LoadedManifest {
                manifest,
                status: LoadStatus::Loaded,
            }),
            Err(reason) => match policy {
                ParseErrorPolicy::Fallback => Ok(LoadedManifest {
                    manifest: Self::default(),
                    status: LoadStatus::Recovered(reason),
                }),
                ParseErrorPolicy::Fail => Err(ManifestError::Parse {
                    path: path.display().to_string(),
                    reason,
                }),
            },
        }
    }

    /// Split a parsed document into `backgrounds` and the remaining keys.
    fn from_value(value: Value) -> Result<Self, String> {
        let root = match value {
            Value::Object(root) => root,
            other => {
                return Err(format!(
                    "expected an object at the top level, found {}",
                    json_kind(&other)
                ));
            }
        };

        let mut manifest = Self::default();
        let mut position = None;
        for (key, value) in root {
            if key != BACKGROUNDS_KEY {
                manifest.others.insert(key, value);
                continue;
            }
            match value {
                Value::Array(items) => {
                    manifest.backgrounds = items;
                    position = Some(manifest.others.len());
                }
                other => {
                    return Err(format!(
                        "expected \"{}\" to be an array, found {}",
                        BACKGROUNDS_KEY,
                        json_kind(&other)
                    ));
                }
            }
        }
        // An absent list is added after the existing keys
        manifest.position = position.unwrap_or(manifest.others.len());
        Ok(manifest)
    }

    /// Rebuild the top-level object with every key in its original place.
    fn to_value(&self) -> Value {
        let mut root = Map::new();
        root.extend(
            self.others
                .iter()
                .take(self.position)
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        root.insert(
            BACKGROUNDS_KEY.to_string(),
            Value::Array(self.backgrounds.clone()),
        );
        root.extend(
            self.others
                .iter()
                .skip(self.position)
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        Value::Object(root)
    }

    /// Render as pretty JSON (2-space indent) with a single trailing newline.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        let mut json = serde_json::to_string_pretty(&self.to_value())?;
        json.push('\n');
        Ok(json)
    }

    /// Write the whole manifest to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Append a new entry.
    pub fn push(&mut self, entry: &ManifestEntry) -> Result<(), ManifestError> {
        self.backgrounds.push(serde_json::to_value(entry)?);
        Ok(())
    }

    /// Entries in file order, as stored.
    pub fn entries(&self) -> &[Value] {
        &self.backgrounds
    }

    /// String `id` of every entry that has one.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.backgrounds
            .iter()
            .filter_map(|entry| entry.get("id").and_then(Value::as_str))
    }
}
