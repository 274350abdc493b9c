//! Event stream from the coordinator to whatever front end is attached.
//!
//! Every long-running operation reports through a single unbounded channel
//! of [`SyncEvent`] values. The console renders them as they arrive; tests
//! drain the receiver and assert on the sequence.

use tokio::sync::mpsc;

use galleria_vcs::ProgressLine;

use crate::deploy::DeployState;
use crate::preview::PreviewState;

/// Which actions the front end should currently offer.
///
/// Derived from the working copy and the in-memory store after every
/// operation. Commit and discard act on committed-vs-working-tree state, so
/// they stay disabled while unsaved edits exist; saving first keeps the
/// commit honest about what it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiStatus {
    pub unsaved_changes: bool,
    pub repo_dirty: bool,
    pub ahead: usize,
    pub behind: usize,
    pub can_commit: bool,
    pub can_publish: bool,
    pub can_discard: bool,
}

impl UiStatus {
    pub fn derive(unsaved_changes: bool, repo_dirty: bool, ahead: usize, behind: usize) -> Self {
        let can_commit = repo_dirty && !unsaved_changes;
        let can_publish = (repo_dirty || ahead > 0) && !unsaved_changes;
        let can_discard = repo_dirty && !unsaved_changes;
        UiStatus {
            unsaved_changes,
            repo_dirty,
            ahead,
            behind,
            can_commit,
            can_publish,
            can_discard,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// One line of subprocess output, already redacted.
    Progress(ProgressLine),
    /// Action availability changed.
    Status(UiStatus),
    /// The preview server changed state.
    Preview(PreviewState),
    /// The deploy badge reported a new state.
    Deploy(DeployState),
}

/// Cloneable sender side of the event stream.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: mpsc::UnboundedSender<SyncEvent>,
}

impl EventBus {
    pub fn channel() -> (EventBus, mpsc::UnboundedReceiver<SyncEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (EventBus { tx }, rx)
    }

    /// Send an event; a detached front end is not an error.
    pub fn emit(&self, event: SyncEvent) {
        let _ = self.tx.send(event);
    }
}
