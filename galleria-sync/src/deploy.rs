//! Deploy status polling.
//!
//! The hosting provider exposes a status badge image whose bytes change
//! with the deploy state. There is no API token involved, so the poller
//! fetches the badge, hashes the body with SHA-256 and compares the digest
//! against the configured per-state digests. Polling continues while a
//! build is in flight and stops on the first terminal state.

use std::io::Read;
use std::time::Duration;

use sha2::{Digest, Sha256};

use galleria_core::BadgeHashes;

use crate::error::SyncError;
use crate::events::{EventBus, SyncEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployState {
    Published,
    Building,
    Failed,
    Canceled,
    /// Badge digest matched none of the configured states.
    Unknown,
}

impl DeployState {
    /// Terminal states end the poll loop. Only `Building` warrants another
    /// look; an unrecognized badge will not become recognizable by waiting.
    pub fn is_terminal(self) -> bool {
        !matches!(self, DeployState::Building)
    }
}

/// Consecutive fetch failures tolerated before the poller gives up.
const MAX_FETCH_FAILURES: u32 = 30;

/// Classify a badge body by its SHA-256 digest.
pub fn classify(body: &[u8], hashes: &BadgeHashes) -> DeployState {
    let digest = hex::encode(Sha256::digest(body));
    let matches = |known: &Option<String>| {
        known
            .as_deref()
            .map(|h| h.eq_ignore_ascii_case(&digest))
            .unwrap_or(false)
    };
    if matches(&hashes.success) {
        DeployState::Published
    } else if matches(&hashes.building) {
        DeployState::Building
    } else if matches(&hashes.failed) {
        DeployState::Failed
    } else if matches(&hashes.canceled) {
        DeployState::Canceled
    } else {
        tracing::warn!(digest = %digest, "unrecognized deploy badge digest");
        DeployState::Unknown
    }
}

/// Poll the badge endpoint until the deploy reaches a terminal state,
/// emitting a [`SyncEvent::Deploy`] after every fetch. Fetch failures are
/// logged and retried on the next tick, up to [`MAX_FETCH_FAILURES`] in a
/// row.
pub async fn poll_badge(
    url: String,
    hashes: BadgeHashes,
    interval: Duration,
    events: EventBus,
) -> Result<DeployState, SyncError> {
    let mut fetch_failures = 0u32;
    loop {
        match fetch_badge(url.clone()).await {
            Ok(body) => {
                fetch_failures = 0;
                let state = classify(&body, &hashes);
                tracing::info!(state = ?state, "deploy badge polled");
                events.emit(SyncEvent::Deploy(state));
                if state.is_terminal() {
                    return Ok(state);
                }
            }
            Err(err) => {
                fetch_failures += 1;
                tracing::warn!(url = %url, error = %err, "deploy badge fetch failed");
                if fetch_failures >= MAX_FETCH_FAILURES {
                    return Err(err);
                }
            }
        }
        tokio::time::sleep(interval).await;
    }
}

async fn fetch_badge(url: String) -> Result<Vec<u8>, SyncError> {
    tokio::task::spawn_blocking(move || {
        let response = ureq::get(&url).call().map_err(|e| SyncError::Http {
            url: url.clone(),
            detail: e.to_string(),
        })?;
        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| SyncError::Http {
                url: url.clone(),
                detail: e.to_string(),
            })?;
        Ok(body)
    })
    .await
    .map_err(|e| SyncError::Task(e.to_string()))?
}
