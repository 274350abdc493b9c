//! Domain types for the Galleria content model.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! The front-matter structs (`AlbumInfo`, `ResourceInfo`) are the exact typed
//! mapping of the on-disk YAML block; unknown fields are ignored on parse by
//! policy, and serialization writes only the fields below.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed album slug, used as directory name and asset-path prefix.
///
/// Derived from the album title via [`crate::slug::derive`]; unique among all
/// loaded albums, recomputed whenever the title changes and before persisting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlbumId(pub String);

impl fmt::Display for AlbumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for AlbumId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AlbumId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Front-matter structs (on-disk schema)
// ---------------------------------------------------------------------------

/// One image entry inside an album's front-matter `resources` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResourceInfo {
    /// Album-relative asset path as stored on disk, e.g. `"summer-2021/img.jpg"`.
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phototitle: Option<String>,
    /// Apply EXIF orientation correction when rendering.
    #[serde(default)]
    pub exif: bool,
}

/// The typed front-matter block of an album index file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumInfo {
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub albumthumb: Option<String>,
    #[serde(default)]
    pub resources: Vec<ResourceInfo>,
}

// ---------------------------------------------------------------------------
// In-memory model
// ---------------------------------------------------------------------------

/// One image asset of an album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// Bare source file name (no directory components) as tracked in memory.
    pub src: String,
    /// Absolute location under the asset root. Derived, never persisted.
    pub full_path: PathBuf,
    pub label: Option<String>,
    pub exif: bool,
}

impl ImageAsset {
    /// Build an asset from a stored `src` value, normalizing it to a bare
    /// file name and resolving its full path under `asset_root/<album-id>/`.
    pub fn from_resource(info: &ResourceInfo, asset_root: &Path, id: &AlbumId) -> Self {
        let name = bare_file_name(&info.src);
        let full_path = asset_root.join(&id.0).join(&name);
        Self {
            src: name,
            full_path,
            label: info.phototitle.clone(),
            exif: info.exif,
        }
    }

    /// Serialize back to the front-matter form, with `src` rewritten to the
    /// album-relative `"{id}/{name}"` path.
    pub fn to_resource(&self, id: &AlbumId) -> ResourceInfo {
        let src = if self.src.is_empty() {
            String::new()
        } else {
            format!("{}/{}", id.0, self.src)
        };
        ResourceInfo {
            src,
            phototitle: self.label.clone(),
            exif: self.exif,
        }
    }
}

/// One content unit: a directory with an index file and zero or more assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub id: AlbumId,
    /// `content/<id>/` under the working copy.
    pub dir_path: PathBuf,
    /// `content/<id>/_index.md`.
    pub index_path: PathBuf,
    pub title: String,
    /// Manual-ordering key only, not wall-clock truth.
    pub date: DateTime<Utc>,
    pub categories: Vec<String>,
    /// Must name the `src` of exactly one asset after save; repaired if not.
    pub thumbnail: Option<String>,
    /// Free-form body text below the front-matter block.
    pub body: String,
    pub assets: Vec<ImageAsset>,
}

impl Album {
    /// Assemble an album from a parsed front-matter block and body text.
    pub fn from_info(
        info: AlbumInfo,
        body: String,
        id: AlbumId,
        dir_path: PathBuf,
        index_path: PathBuf,
        asset_root: &Path,
    ) -> Self {
        let assets = info
            .resources
            .iter()
            .map(|r| ImageAsset::from_resource(r, asset_root, &id))
            .collect();
        Self {
            id,
            dir_path,
            index_path,
            title: info.title,
            date: info.date,
            categories: info.categories,
            thumbnail: info.albumthumb.as_deref().map(bare_file_name),
            body,
            assets,
        }
    }

    /// Serialize the structured fields back to the front-matter form.
    pub fn to_info(&self) -> AlbumInfo {
        AlbumInfo {
            title: self.title.clone(),
            date: self.date,
            categories: self.categories.clone(),
            albumthumb: self.thumbnail.clone(),
            resources: self.assets.iter().map(|a| a.to_resource(&self.id)).collect(),
        }
    }

    /// Categories comma-joined for editing in a single text field.
    pub fn categories_line(&self) -> String {
        self.categories.join(", ")
    }

    /// Replace categories from a comma-separated line, dropping empty entries.
    pub fn set_categories_line(&mut self, line: &str) {
        self.categories = line
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
    }
}

/// Strip directory components from a stored `src` value.
///
/// Stored paths are album-relative (`"<id>/<name>"`), but older trees carry
/// bare names or backslash separators; all collapse to the final segment.
pub fn bare_file_name(src: &str) -> String {
    src.rsplit(['/', '\\'])
        .next()
        .unwrap_or(src)
        .to_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
