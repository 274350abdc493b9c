//! The coordinator owns one working copy end to end.
//!
//! It holds the loaded [`Store`], the [`GitClient`] for the same directory
//! and the event bus, and sequences every operation the front end can
//! trigger: update, edit, save, commit, publish, discard. After each
//! operation it re-derives the [`UiStatus`] so the front end always knows
//! which actions are currently valid.

use std::path::Path;
use std::time::Duration;

use tokio::sync::mpsc;

use galleria_core::{Credentials, SiteConfig};
use galleria_store::{Store, StoreError};
use galleria_vcs::{CommandRunner, GitClient, RepoStatus};

use crate::error::SyncError;
use crate::events::{EventBus, SyncEvent, UiStatus};
use crate::preview::PreviewServer;
use crate::{deploy, preview};

/// Commit message for every checkpoint made through the console.
pub const COMMIT_MESSAGE: &str = "Apply changes from admin console";

pub struct Coordinator {
    store: Store,
    git: GitClient,
    config: SiteConfig,
    credentials: Credentials,
    events: EventBus,
    /// Last observed working-copy status; refreshed by every git-touching
    /// operation, reused by pure edits.
    repo_status: RepoStatus,
}

impl Coordinator {
    pub fn new(
        repo_path: impl AsRef<Path>,
        config: SiteConfig,
        credentials: Credentials,
        events: EventBus,
    ) -> Self {
        let repo_path = repo_path.as_ref();

        // Bridge raw subprocess output into the event stream.
        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
        let bridge = events.clone();
        tokio::spawn(async move {
            while let Some(line) = progress_rx.recv().await {
                bridge.emit(SyncEvent::Progress(line));
            }
        });

        let runner = CommandRunner::with_progress(progress_tx);
        let git = GitClient::new(repo_path, config.remote_url.as_str(), runner)
            .with_identity(&config.author_name, &config.author_email);

        Coordinator {
            store: Store::new(repo_path),
            git,
            config,
            credentials,
            events,
            repo_status: RepoStatus::default(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Update / reload
    // -----------------------------------------------------------------------

    /// Bring the working copy up to date with the remote and reload the
    /// store from disk.
    pub async fn update(&mut self, replace_if_invalid: bool) -> Result<(), SyncError> {
        self.git
            .clone_or_pull(&self.credentials, replace_if_invalid)
            .await?;
        self.load().await?;
        self.refresh_status().await?;
        Ok(())
    }

    /// Reload albums from disk, dropping any unsaved in-memory edits.
    pub async fn load(&mut self) -> Result<(), SyncError> {
        let placeholder = Store::new(self.git.work_dir());
        let mut store = std::mem::replace(&mut self.store, placeholder);
        let (store, result) = tokio::task::spawn_blocking(move || {
            let result = store.load();
            (store, result)
        })
        .await
        .map_err(|e| SyncError::Task(e.to_string()))?;
        self.store = store;
        result?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Apply an in-memory edit and re-derive the action status. The working
    /// copy is untouched until [`save`](Self::save).
    pub fn edit<T>(
        &mut self,
        f: impl FnOnce(&mut Store) -> Result<T, StoreError>,
    ) -> Result<T, SyncError> {
        let value = f(&mut self.store)?;
        self.emit_status();
        Ok(value)
    }

    /// Write all pending edits to the working copy.
    pub async fn save(&mut self) -> Result<(), SyncError> {
        let placeholder = Store::new(self.git.work_dir());
        let mut store = std::mem::replace(&mut self.store, placeholder);
        let (store, result) = tokio::task::spawn_blocking(move || {
            let result = store.save();
            (store, result)
        })
        .await
        .map_err(|e| SyncError::Task(e.to_string()))?;
        self.store = store;
        result?;
        self.refresh_status().await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Repository operations
    // -----------------------------------------------------------------------

    /// Commit all working-copy changes as one checkpoint. No-op on a clean
    /// working copy.
    pub async fn commit(&mut self) -> Result<(), SyncError> {
        if self.git.has_uncommitted_changes().await? {
            self.git.stage_and_commit(COMMIT_MESSAGE).await?;
        }
        self.refresh_status().await?;
        Ok(())
    }

    /// Commit pending changes, push, and start watching the deploy badge.
    ///
    /// A rejected push leaves local commits intact; the refreshed status
    /// still offers publish so the operation can be retried after an
    /// update.
    pub async fn publish(&mut self) -> Result<(), SyncError> {
        if self.git.has_uncommitted_changes().await? {
            self.git.stage_and_commit(COMMIT_MESSAGE).await?;
        }
        let pushed = self.git.push(&self.credentials).await;
        self.refresh_status().await?;
        pushed?;

        if let Some(url) = self.config.badge_url.clone() {
            let hashes = self.config.badge_hashes.clone();
            let interval = Duration::from_secs(self.config.poll_interval_secs);
            let events = self.events.clone();
            tokio::spawn(async move {
                if let Err(err) = deploy::poll_badge(url, hashes, interval, events).await {
                    tracing::warn!(error = %err, "deploy badge polling stopped");
                }
            });
        }
        Ok(())
    }

    /// Throw away all uncommitted changes and untracked files, then reload
    /// from the restored working copy.
    pub async fn discard(&mut self) -> Result<(), SyncError> {
        self.git.hard_reset_and_clean().await?;
        self.load().await?;
        self.refresh_status().await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Preview
    // -----------------------------------------------------------------------

    /// Start the local preview server inside the working copy.
    pub fn start_preview(&self) -> Result<PreviewServer, SyncError> {
        preview::PreviewServer::spawn(
            &self.config.preview_command,
            self.git.work_dir(),
            self.events.clone(),
        )
    }

    // -----------------------------------------------------------------------
    // Status
    // -----------------------------------------------------------------------

    /// Query the working copy and emit a fresh [`UiStatus`].
    pub async fn refresh_status(&mut self) -> Result<UiStatus, SyncError> {
        self.repo_status = self.git.status().await?;
        Ok(self.emit_status())
    }

    fn emit_status(&self) -> UiStatus {
        let status = UiStatus::derive(
            self.store.is_dirty(),
            self.repo_status.dirty,
            self.repo_status.ahead as usize,
            self.repo_status.behind as usize,
        );
        self.events.emit(SyncEvent::Status(status.clone()));
        status
    }
}
