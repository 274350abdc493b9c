//! The in-memory content store.
//!
//! Owns the editable album model, loads it from the working copy and tracks
//! whether unsaved edits exist. Disk reconciliation lives in
//! [`crate::reconcile`]; date-based reordering in [`crate::order`].
//!
//! # Working-copy layout
//!
//! ```text
//! <repo>/
//!   content/<album-id>/_index.md    (front matter + body)
//!   assets/<album-id>/<file>        (binary assets)
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Utc;

use galleria_core::types::bare_file_name;
use galleria_core::{frontmatter, slug, Album, AlbumId, CoreError, ImageAsset};

use crate::error::{io_err, StoreError};

pub const INDEX_FILE: &str = "_index.md";
pub const CONTENT_DIR: &str = "content";
pub const ASSETS_DIR: &str = "assets";

/// The in-memory model of all albums in one working copy.
///
/// The full album set is discarded and rebuilt on every [`Store::load`];
/// there is no cross-load object identity. A single active editor is
/// assumed — the store is not safe for concurrent mutation.
#[derive(Debug)]
pub struct Store {
    repo_path: PathBuf,
    albums: Vec<Album>,
    dirty: bool,
}

impl Store {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
            albums: Vec::new(),
            dirty: false,
        }
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// `<repo>/content/`.
    pub fn content_root(&self) -> PathBuf {
        self.repo_path.join(CONTENT_DIR)
    }

    /// `<repo>/assets/`.
    pub fn asset_root(&self) -> PathBuf {
        self.repo_path.join(ASSETS_DIR)
    }

    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------

    /// Rebuild the album model from the working copy.
    ///
    /// Directories without an index file are skipped as transient (an album
    /// mid-creation or a crashed save), not an error. A present index that
    /// fails to parse aborts the whole load.
    pub fn load(&mut self) -> Result<(), StoreError> {
        let content_root = self.content_root();
        let asset_root = self.asset_root();

        let mut albums = Vec::new();
        if content_root.exists() {
            let mut entries: Vec<_> = std::fs::read_dir(&content_root)
                .map_err(|e| io_err(&content_root, e))?
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
                .collect();
            entries.sort_by_key(|e| e.file_name());

            for entry in entries {
                let dir_path = entry.path();
                let index_path = dir_path.join(INDEX_FILE);
                if !index_path.exists() {
                    tracing::debug!(dir = %dir_path.display(), "no index file, skipping");
                    continue;
                }
                let id = AlbumId::from(entry.file_name().to_string_lossy().into_owned());
                tracing::debug!(index = %index_path.display(), "loading album");

                let document =
                    std::fs::read_to_string(&index_path).map_err(|e| io_err(&index_path, e))?;
                let (info, body) =
                    frontmatter::parse(&document, &index_path).map_err(|e| match e {
                        err @ (CoreError::Parse { .. } | CoreError::MissingFrontMatter { .. }) => {
                            StoreError::IndexParse {
                                path: index_path.clone(),
                                source: Box::new(err),
                            }
                        }
                        other => StoreError::Core(other),
                    })?;

                albums.push(Album::from_info(
                    info,
                    body,
                    id,
                    dir_path,
                    index_path,
                    &asset_root,
                ));
            }
        }

        tracing::info!(count = albums.len(), "loaded albums");
        self.albums = albums;
        self.dirty = false;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub(crate) fn albums_mut(&mut self) -> &mut Vec<Album> {
        &mut self.albums
    }

    pub fn album(&self, id: &AlbumId) -> Option<&Album> {
        self.albums.iter().find(|a| &a.id == id)
    }

    /// Distinct categories across all albums, in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for album in &self.albums {
            for cat in &album.categories {
                if !seen.contains(cat) {
                    seen.push(cat.clone());
                }
            }
        }
        seen
    }

    /// Albums in one category, sorted ascending by their ordering date.
    pub fn albums_in_category(&self, category: &str) -> Vec<&Album> {
        let mut list: Vec<&Album> = self
            .albums
            .iter()
            .filter(|a| a.categories.iter().any(|c| c == category))
            .collect();
        list.sort_by_key(|a| a.date);
        list
    }

    /// True when in-memory edits have not been reconciled to disk.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    // -----------------------------------------------------------------------
    // Edit operations
    // -----------------------------------------------------------------------

    /// Create a new album under `category` with the current time as its
    /// ordering date. Fails before any mutation when the title yields an
    /// empty slug. A title that slugs onto an existing album's id gets the
    /// first unused numeric suffix, so the returned id is unique among all
    /// loaded albums and id-keyed edits cannot land on the wrong album.
    pub fn add_album(&mut self, title: &str, category: &str) -> Result<AlbumId, StoreError> {
        let base = slug::derive(title)?;
        let taken: HashSet<String> = self
            .albums
            .iter()
            .map(|a| a.id.0.to_ascii_lowercase())
            .collect();
        let mut candidate = base.0.clone();
        let mut n = 2;
        while taken.contains(&candidate.to_ascii_lowercase()) {
            candidate = format!("{}-{n}", base.0);
            n += 1;
        }
        let id = AlbumId(candidate);
        let dir_path = self.content_root().join(&id.0);
        let index_path = dir_path.join(INDEX_FILE);
        let album = Album {
            id: id.clone(),
            dir_path,
            index_path,
            title: title.to_owned(),
            date: Utc::now(),
            categories: vec![category.to_owned()],
            thumbnail: None,
            body: String::new(),
            assets: Vec::new(),
        };
        self.albums.push(album);
        self.mark_dirty();
        Ok(id)
    }

    /// Remove an album from the model. Its directory and assets are deleted
    /// from disk on the next save.
    pub fn remove_album(&mut self, id: &AlbumId) -> Result<(), StoreError> {
        let before = self.albums.len();
        self.albums.retain(|a| &a.id != id);
        if self.albums.len() == before {
            return Err(unknown(id));
        }
        self.mark_dirty();
        Ok(())
    }

    pub fn set_title(&mut self, id: &AlbumId, title: &str) -> Result<(), StoreError> {
        // Reject a title that cannot slug before accepting the edit; the id
        // itself is recomputed during save.
        slug::derive(title)?;
        self.find_mut(id)?.title = title.to_owned();
        self.mark_dirty();
        Ok(())
    }

    pub fn set_date(&mut self, id: &AlbumId, date: chrono::DateTime<Utc>) -> Result<(), StoreError> {
        self.find_mut(id)?.date = date;
        self.mark_dirty();
        Ok(())
    }

    pub fn set_categories_line(&mut self, id: &AlbumId, line: &str) -> Result<(), StoreError> {
        let album = self.find_mut(id)?;
        album.set_categories_line(line);
        self.mark_dirty();
        Ok(())
    }

    pub fn set_body(&mut self, id: &AlbumId, body: &str) -> Result<(), StoreError> {
        self.find_mut(id)?.body = body.to_owned();
        self.mark_dirty();
        Ok(())
    }

    pub fn set_thumbnail(&mut self, id: &AlbumId, asset_src: Option<&str>) -> Result<(), StoreError> {
        self.find_mut(id)?.thumbnail = asset_src.map(str::to_owned);
        self.mark_dirty();
        Ok(())
    }

    /// Attach an external file as a new asset. The binary is copied under
    /// the asset root on the next save; until then `full_path` points at
    /// the external source.
    pub fn add_asset(
        &mut self,
        id: &AlbumId,
        source: &Path,
        label: Option<&str>,
    ) -> Result<(), StoreError> {
        let src = bare_file_name(&source.to_string_lossy());
        let asset = ImageAsset {
            src,
            full_path: source.to_path_buf(),
            label: label.map(str::to_owned),
            exif: false,
        };
        self.find_mut(id)?.assets.push(asset);
        self.mark_dirty();
        Ok(())
    }

    pub fn remove_asset(&mut self, id: &AlbumId, index: usize) -> Result<(), StoreError> {
        let album = self.find_mut(id)?;
        if index >= album.assets.len() {
            return Err(unknown(id));
        }
        album.assets.remove(index);
        self.mark_dirty();
        Ok(())
    }

    pub fn set_asset_label(
        &mut self,
        id: &AlbumId,
        index: usize,
        label: Option<&str>,
    ) -> Result<(), StoreError> {
        let album = self.find_mut(id)?;
        let asset = album.assets.get_mut(index).ok_or_else(|| unknown(id))?;
        asset.label = label.map(str::to_owned);
        self.mark_dirty();
        Ok(())
    }

    pub fn set_asset_exif(
        &mut self,
        id: &AlbumId,
        index: usize,
        exif: bool,
    ) -> Result<(), StoreError> {
        let album = self.find_mut(id)?;
        let asset = album.assets.get_mut(index).ok_or_else(|| unknown(id))?;
        asset.exif = exif;
        self.mark_dirty();
        Ok(())
    }

    /// Shift an asset by `delta` positions in the display order. The asset
    /// is lifted out and reinserted, so the relative order of everything
    /// else is preserved.
    pub fn move_asset(&mut self, id: &AlbumId, index: usize, delta: i64) -> Result<(), StoreError> {
        let album = self.find_mut(id)?;
        let target = index as i64 + delta;
        if index >= album.assets.len() || target < 0 || target as usize >= album.assets.len() {
            return Err(unknown(id));
        }
        let asset = album.assets.remove(index);
        album.assets.insert(target as usize, asset);
        self.mark_dirty();
        Ok(())
    }

    pub(crate) fn find_mut(&mut self, id: &AlbumId) -> Result<&mut Album, StoreError> {
        self.albums
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| unknown(id))
    }
}

fn unknown(id: &AlbumId) -> StoreError {
    StoreError::UnknownAlbum { id: id.0.clone() }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn store_in(dir: &TempDir) -> Store {
        Store::new(dir.path())
    }

    fn write_album(repo: &Path, id: &str, document: &str) {
        let dir = repo.join(CONTENT_DIR).join(id);
        std::fs::create_dir_all(&dir).expect("mkdir");
        std::fs::write(dir.join(INDEX_FILE), document).expect("write index");
    }

    const DOC: &str = "---\ntitle: Summer\ndate: 2021-06-01T00:00:00Z\ncategories: [nature]\n---\nbody\n";

    #[test]
    fn load_reads_albums_and_clears_dirty() {
        let repo = TempDir::new().expect("repo");
        write_album(repo.path(), "summer", DOC);
        let mut store = store_in(&repo);
        store.add_album("Scratch", "x").expect("add");
        assert!(store.is_dirty());

        store.load().expect("load");
        assert!(!store.is_dirty());
        assert_eq!(store.albums().len(), 1);
        let album = &store.albums()[0];
        assert_eq!(album.id.0, "summer");
        assert_eq!(album.title, "Summer");
        assert_eq!(album.body, "body\n");
    }

    #[test]
    fn load_skips_directory_without_index() {
        let repo = TempDir::new().expect("repo");
        std::fs::create_dir_all(repo.path().join(CONTENT_DIR).join("incomplete"))
            .expect("mkdir");
        write_album(repo.path(), "summer", DOC);
        let mut store = store_in(&repo);
        store.load().expect("load");
        assert_eq!(store.albums().len(), 1);
    }

    #[test]
    fn load_aborts_on_unparsable_index() {
        let repo = TempDir::new().expect("repo");
        write_album(repo.path(), "summer", DOC);
        write_album(repo.path(), "broken", "---\ntitle: [unclosed\n---\n");
        let mut store = store_in(&repo);
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::IndexParse { .. }));
    }

    #[test]
    fn load_aborts_on_index_without_front_matter() {
        let repo = TempDir::new().expect("repo");
        write_album(repo.path(), "plain", "just text, no delimiters\n");
        let mut store = store_in(&repo);
        assert!(matches!(
            store.load().unwrap_err(),
            StoreError::IndexParse { .. }
        ));
    }

    #[test]
    fn edits_mark_dirty() {
        let repo = TempDir::new().expect("repo");
        write_album(repo.path(), "summer", DOC);
        let mut store = store_in(&repo);
        store.load().expect("load");
        let id = AlbumId::from("summer");

        store.set_body(&id, "new body").expect("edit");
        assert!(store.is_dirty());
    }

    #[test]
    fn add_album_rejects_empty_slug_without_mutation() {
        let repo = TempDir::new().expect("repo");
        let mut store = store_in(&repo);
        assert!(store.add_album("***", "nature").is_err());
        assert!(store.albums().is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn remove_album_unknown_id_fails() {
        let repo = TempDir::new().expect("repo");
        let mut store = store_in(&repo);
        let err = store.remove_album(&AlbumId::from("nope")).unwrap_err();
        assert!(matches!(err, StoreError::UnknownAlbum { .. }));
    }

    #[test]
    fn add_album_suffixes_a_colliding_slug() {
        let repo = TempDir::new().expect("repo");
        write_album(repo.path(), "summer", DOC);
        let mut store = store_in(&repo);
        store.load().expect("load");

        let id = store.add_album("Summer!", "nature").expect("add");
        assert_eq!(id.0, "summer-2");
        let next = store.add_album("SUMMER", "nature").expect("add");
        assert_eq!(next.0, "summer-3", "comparison is case-insensitive");
    }

    #[test]
    fn move_asset_shifts_rather_than_swaps() {
        let repo = TempDir::new().expect("repo");
        let mut store = store_in(&repo);
        let id = store.add_album("Summer", "nature").expect("add");
        for name in ["a.jpg", "b.jpg", "c.jpg", "d.jpg"] {
            store
                .add_asset(&id, Path::new(name), None)
                .expect("asset");
        }

        // Lifting d.jpg to the front must not disturb a/b/c's order.
        store.move_asset(&id, 3, -3).expect("move");
        let order: Vec<_> = store.album(&id).expect("album").assets.iter()
            .map(|a| a.src.as_str())
            .collect();
        assert_eq!(order, ["d.jpg", "a.jpg", "b.jpg", "c.jpg"]);

        assert!(store.move_asset(&id, 0, -1).is_err());
        assert!(store.move_asset(&id, 3, 1).is_err());
    }

    #[test]
    fn categories_and_category_listing() {
        let repo = TempDir::new().expect("repo");
        let mut store = store_in(&repo);
        store.add_album("A", "nature").expect("add");
        store.add_album("B", "weddings").expect("add");
        store
            .set_categories_line(&AlbumId::from("b"), "weddings, nature")
            .expect("edit");
        assert_eq!(store.categories(), vec!["nature", "weddings"]);
        assert_eq!(store.albums_in_category("nature").len(), 2);
        assert_eq!(store.albums_in_category("weddings").len(), 1);
    }
}
