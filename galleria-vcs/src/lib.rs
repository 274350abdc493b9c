//! Galleria version-control plumbing — serialized command execution and the
//! git client built on it.
//!
//! Public API surface:
//! - [`runner`] — [`CommandRunner`], [`CommandSpec`], progress lines
//! - [`git`] — [`GitClient`], [`RepoStatus`]
//! - [`error`] — [`VcsError`]

pub mod error;
pub mod git;
pub mod runner;

pub use error::VcsError;
pub use git::{GitClient, RepoStatus};
pub use runner::{CommandOutput, CommandRunner, CommandSpec, ProgressLine, StreamSource};
