//! Error types for galleria-store.

use std::path::PathBuf;

use thiserror::Error;

use galleria_core::CoreError;

/// All errors that can arise from content-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An error from the core model (slug derivation, YAML, config).
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An index file is present but cannot be parsed. Fatal for the whole
    /// load: silently dropping an album would delete it on the next save.
    #[error("failed to parse index {path}: {source}")]
    IndexParse {
        path: PathBuf,
        #[source]
        source: Box<CoreError>,
    },

    /// No loaded album carries this id.
    #[error("unknown album '{id}'")]
    UnknownAlbum { id: String },

    /// An asset's copy source vanished between edit and save.
    #[error("asset source missing: {path}")]
    AssetSourceMissing { path: PathBuf },

    /// One or more asset copies failed; the rest of the save went through,
    /// but the store stays dirty and the save must not be reported clean.
    #[error("save finished with {} failed asset cop{}", failures.len(), if failures.len() == 1 { "y" } else { "ies" })]
    PartialSave { failures: Vec<StoreError> },
}

/// Convenience constructor for [`StoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}
