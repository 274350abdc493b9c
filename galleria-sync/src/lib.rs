//! Galleria synchronization layer — the coordinator that sequences store
//! edits, working-copy operations, the preview server and deploy polling,
//! reporting everything over one event stream.
//!
//! Public API surface:
//! - [`coordinator::Coordinator`] — update / edit / save / commit / publish / discard
//! - [`events`] — [`SyncEvent`], [`UiStatus`], [`EventBus`]
//! - [`preview`] — [`PreviewServer`], [`PreviewState`]
//! - [`deploy`] — badge polling, [`DeployState`]
//! - [`error`] — [`SyncError`]

pub mod coordinator;
pub mod deploy;
pub mod error;
pub mod events;
pub mod preview;

pub use coordinator::{Coordinator, COMMIT_MESSAGE};
pub use deploy::DeployState;
pub use error::SyncError;
pub use events::{EventBus, SyncEvent, UiStatus};
pub use preview::{PreviewServer, PreviewState};
