//! Disk reconciliation: write the in-memory model back onto the working copy.
//!
//! ## Save protocol (order matters)
//!
//! 1. Recompute every album's slug from its title; de-duplicate slugs so two
//!    albums renamed onto the same title never overwrite each other's files.
//! 2. Resolve per-album asset file names: first unused name wins, later
//!    duplicates get a numeric suffix (`img_2.jpg`, `img_3.jpg`, …),
//!    compared case-insensitively.
//! 3. Repair the thumbnail against the resolved names, then write each
//!    album's index file (front matter + body), creating the directory.
//! 4. Copy asset binaries **in reverse list order** per album. Resolution
//!    can make an earlier asset target the current path of a later one;
//!    copying back-to-front moves every such source out of the way before
//!    it is overwritten.
//! 5. Delete on-disk album directories (content and assets) that no longer
//!    correspond to an in-memory album.
//! 6. Sweep the whole asset root and delete every file no in-memory asset
//!    resolves to — a full second pass that also catches orphans left by
//!    renames and by earlier crashed saves.
//!
//! A missing copy source fails that one asset; the save continues, but any
//! sub-failure makes the overall result a failure and the store stays dirty.

use std::collections::HashSet;
use std::path::PathBuf;

use galleria_core::{frontmatter, slug, Album, AlbumId};

use crate::error::{io_err, StoreError};
use crate::store::{Store, INDEX_FILE};

/// One planned asset move: where the binary currently lives and where the
/// resolved model wants it.
#[derive(Debug)]
struct AssetPlan {
    current: PathBuf,
    target: PathBuf,
}

impl Store {
    /// Reconcile the in-memory model to disk. On full success the store is
    /// marked clean; any sub-failure leaves it dirty and returns an error.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let content_root = self.content_root();
        let asset_root = self.asset_root();

        // 1. Slugs. Recompute every id before touching disk so an empty
        //    slug rejects the save up front.
        let mut used_ids: HashSet<String> = HashSet::new();
        for album in self.albums_mut().iter_mut() {
            let base = slug::derive(&album.title)?;
            let mut candidate = base.0.clone();
            let mut n = 2;
            while !used_ids.insert(candidate.to_ascii_lowercase()) {
                candidate = format!("{}-{n}", base.0);
                n += 1;
            }
            album.id = AlbumId(candidate);
            album.dir_path = content_root.join(&album.id.0);
            album.index_path = album.dir_path.join(INDEX_FILE);
        }

        let mut failures: Vec<StoreError> = Vec::new();
        let mut keep_assets: HashSet<PathBuf> = HashSet::new();
        let mut plans: Vec<Vec<AssetPlan>> = Vec::new();

        // 2. Resolve asset names per album; plan the copies.
        for album in self.albums_mut().iter_mut() {
            let album_asset_dir = asset_root.join(&album.id.0);
            let mut used_names: HashSet<String> = HashSet::new();
            let mut album_plans = Vec::new();

            for asset in &mut album.assets {
                if asset.src.is_empty() {
                    continue;
                }
                let resolved = resolve_name(&asset.src, &mut used_names);
                let target = album_asset_dir.join(&resolved);
                album_plans.push(AssetPlan {
                    current: asset.full_path.clone(),
                    target: target.clone(),
                });
                asset.src = resolved;
                asset.full_path = target.clone();
                keep_assets.insert(target);
            }
            plans.push(album_plans);
        }

        // 3. Thumbnail repair, then index files.
        for album in self.albums_mut().iter_mut() {
            repair_thumbnail(album);
        }
        for album in self.albums() {
            let document = frontmatter::render(&album.to_info(), &album.body)?;
            std::fs::create_dir_all(&album.dir_path).map_err(|e| io_err(&album.dir_path, e))?;
            std::fs::write(&album.index_path, document)
                .map_err(|e| io_err(&album.index_path, e))?;
            tracing::debug!(index = %album.index_path.display(), "wrote index");
        }

        // 4. Copy binaries, back to front.
        for album_plans in &plans {
            for plan in album_plans.iter().rev() {
                if plan.current == plan.target {
                    continue;
                }
                if !plan.current.exists() {
                    tracing::warn!(source = %plan.current.display(), "asset source missing");
                    failures.push(StoreError::AssetSourceMissing {
                        path: plan.current.clone(),
                    });
                    continue;
                }
                if let Some(parent) = plan.target.parent() {
                    if let Err(e) = std::fs::create_dir_all(parent) {
                        failures.push(io_err(parent, e));
                        continue;
                    }
                }
                match std::fs::copy(&plan.current, &plan.target) {
                    Ok(_) => {
                        tracing::debug!(
                            from = %plan.current.display(),
                            to = %plan.target.display(),
                            "copied asset",
                        );
                    }
                    Err(e) => failures.push(io_err(&plan.target, e)),
                }
            }
        }

        // 5. Remove album directories with no in-memory counterpart.
        let live_ids: HashSet<String> = self.albums().iter().map(|a| a.id.0.clone()).collect();
        for root in [&content_root, &asset_root] {
            remove_dead_dirs(root, &live_ids, &mut failures);
        }

        // 6. Full orphan sweep over the asset root.
        sweep_orphans(&asset_root, &keep_assets, &mut failures);

        if failures.is_empty() {
            self.mark_clean();
            tracing::info!(albums = self.albums().len(), "save complete");
            Ok(())
        } else {
            tracing::warn!(failed = failures.len(), "save finished with failures");
            Err(StoreError::PartialSave { failures })
        }
    }
}

/// First unused name wins; later claims on the same name get `_2`, `_3`, …
/// before the extension. Comparison is case-insensitive so the result is
/// safe on case-preserving filesystems.
fn resolve_name(base: &str, used: &mut HashSet<String>) -> String {
    if used.insert(base.to_ascii_lowercase()) {
        return base.to_owned();
    }
    let (stem, ext) = match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (base, None),
    };
    let mut n = 2;
    loop {
        let candidate = match ext {
            Some(ext) => format!("{stem}_{n}.{ext}"),
            None => format!("{stem}_{n}"),
        };
        if used.insert(candidate.to_ascii_lowercase()) {
            return candidate;
        }
        n += 1;
    }
}

/// If the declared thumbnail matches none of the album's resolved asset
/// names, fall back to the first asset with a non-empty source.
fn repair_thumbnail(album: &mut Album) {
    let valid = album
        .thumbnail
        .as_deref()
        .is_some_and(|t| album.assets.iter().any(|a| a.src == t));
    if !valid {
        album.thumbnail = album
            .assets
            .iter()
            .find(|a| !a.src.is_empty())
            .map(|a| a.src.clone());
    }
}

fn remove_dead_dirs(
    root: &PathBuf,
    live_ids: &HashSet<String>,
    failures: &mut Vec<StoreError>,
) {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(_) => return, // no directory yet, nothing to clean
    };
    for entry in entries.filter_map(|e| e.ok()) {
        if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if live_ids.contains(&name) {
            continue;
        }
        let path = entry.path();
        tracing::info!(dir = %path.display(), "removing orphaned album directory");
        if let Err(e) = std::fs::remove_dir_all(&path) {
            failures.push(io_err(&path, e));
        }
    }
}

/// Delete every file under the asset root that no in-memory asset resolves
/// to, then drop album asset directories left empty.
fn sweep_orphans(
    asset_root: &PathBuf,
    keep: &HashSet<PathBuf>,
    failures: &mut Vec<StoreError>,
) {
    let dirs = match std::fs::read_dir(asset_root) {
        Ok(entries) => entries,
        Err(_) => return,
    };
    for dir in dirs.filter_map(|e| e.ok()) {
        if !dir.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let files = match std::fs::read_dir(dir.path()) {
            Ok(entries) => entries,
            Err(e) => {
                failures.push(io_err(dir.path(), e));
                continue;
            }
        };
        for file in files.filter_map(|e| e.ok()) {
            let path = file.path();
            if keep.contains(&path) {
                continue;
            }
            tracing::info!(file = %path.display(), "removing orphaned asset");
            if let Err(e) = std::fs::remove_file(&path) {
                failures.push(io_err(&path, e));
            }
        }
        // Album asset dirs can end up empty after the sweep.
        let _ = std::fs::remove_dir(dir.path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_name_suffixes_duplicates() {
        let mut used = HashSet::new();
        assert_eq!(resolve_name("img.jpg", &mut used), "img.jpg");
        assert_eq!(resolve_name("img.jpg", &mut used), "img_2.jpg");
        assert_eq!(resolve_name("img.jpg", &mut used), "img_3.jpg");
    }

    #[test]
    fn resolve_name_is_case_insensitive() {
        let mut used = HashSet::new();
        assert_eq!(resolve_name("IMG.JPG", &mut used), "IMG.JPG");
        assert_eq!(resolve_name("img.jpg", &mut used), "img_2.jpg");
    }

    #[test]
    fn resolve_name_without_extension() {
        let mut used = HashSet::new();
        assert_eq!(resolve_name("readme", &mut used), "readme");
        assert_eq!(resolve_name("readme", &mut used), "readme_2");
    }

    #[test]
    fn resolve_name_keeps_dotfile_whole() {
        let mut used = HashSet::new();
        assert_eq!(resolve_name(".hidden", &mut used), ".hidden");
        assert_eq!(resolve_name(".hidden", &mut used), ".hidden_2");
    }
}
