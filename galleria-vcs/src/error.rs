//! Error types for galleria-vcs.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from command execution and git operations.
#[derive(Debug, Error)]
pub enum VcsError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external program could not be started at all.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran and exited non-zero while validation was on.
    /// `detail` carries the tail of the process's standard error — for git
    /// this is the human-readable reason (auth failure, non-fast-forward,
    /// push rejection).
    #[error("'{program}' exited with {code:?}: {detail}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        detail: String,
    },

    /// A command produced output the caller cannot interpret.
    #[error("unexpected output from '{program}': {detail}")]
    UnexpectedOutput { program: String, detail: String },
}

/// Convenience constructor for [`VcsError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> VcsError {
    VcsError::Io {
        path: path.into(),
        source,
    }
}
