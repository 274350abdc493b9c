//! Error types for galleria-sync.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Core(#[from] galleria_core::CoreError),

    #[error(transparent)]
    Store(#[from] galleria_store::StoreError),

    #[error(transparent)]
    Vcs(#[from] galleria_vcs::VcsError),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("http request to {url} failed: {detail}")]
    Http { url: String, detail: String },

    #[error("background task failed: {0}")]
    Task(String),
}

pub(crate) fn io_err(path: impl AsRef<Path>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.as_ref().to_path_buf(),
        source,
    }
}
