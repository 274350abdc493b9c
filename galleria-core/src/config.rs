//! Site configuration and local data root.
//!
//! # Storage layout
//!
//! ```text
//! ~/.galleria/
//!   galleria.yaml   (site configuration)
//!   token.txt       (access token, one line — never written to git config)
//!   repo/           (the version-controlled working copy)
//! ```
//!
//! # API pattern
//!
//! Every function has two forms:
//! - `fn_at(root: &Path, …)` — explicit data root; used in tests with `TempDir`
//! - `fn(…)` — derives the root from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Site-wide configuration, loaded from `galleria.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Remote repository URL (https form, no embedded credentials).
    pub remote_url: String,
    /// Commit author identity, passed per invocation via `-c`.
    pub author_name: String,
    pub author_email: String,
    /// Username paired with the token for network operations.
    pub username: String,
    /// Deploy status badge endpoint, polled after publish.
    #[serde(default)]
    pub badge_url: Option<String>,
    /// Known SHA-256 digests (hex) of the badge body per deploy state.
    #[serde(default)]
    pub badge_hashes: BadgeHashes,
    /// Seconds between status-badge polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Preview renderer invocation, program first.
    #[serde(default = "default_preview_command")]
    pub preview_command: Vec<String>,
}

/// The badge body is deployment-specific, so the digests identifying each
/// state are configuration, not constants. Unlisted states classify as
/// unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BadgeHashes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canceled: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<String>,
}

fn default_poll_interval() -> u64 {
    10
}

fn default_preview_command() -> Vec<String> {
    vec!["hugo".to_owned(), "server".to_owned()]
}

/// Credential pair supplied per network operation, never persisted in
/// repository configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `<root>/.galleria/` — pure, no I/O.
pub fn galleria_root(home: &Path) -> PathBuf {
    home.join(".galleria")
}

/// `<root>/galleria.yaml` — pure, no I/O.
pub fn config_path_at(root: &Path) -> PathBuf {
    root.join("galleria.yaml")
}

/// `<root>/token.txt` — pure, no I/O.
pub fn token_path_at(root: &Path) -> PathBuf {
    root.join("token.txt")
}

/// `<root>/repo/` — the working copy location. Pure, no I/O.
pub fn repo_path_at(root: &Path) -> PathBuf {
    root.join("repo")
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load the site configuration from `<root>/galleria.yaml`.
///
/// Returns `CoreError::ConfigNotFound` if absent, `CoreError::Parse` (with
/// path + line context) if malformed YAML.
pub fn load_at(root: &Path) -> Result<SiteConfig, CoreError> {
    let path = config_path_at(root);
    if !path.exists() {
        return Err(CoreError::ConfigNotFound { path });
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| CoreError::Parse { path, source: e })
}

/// `load_at` convenience wrapper against `~/.galleria/`.
pub fn load() -> Result<SiteConfig, CoreError> {
    load_at(&default_root()?)
}

/// Atomically save the site configuration to `<root>/galleria.yaml`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `rename`. The `.tmp` is
/// always in the same directory as the target (same filesystem).
pub fn save_at(root: &Path, config: &SiteConfig) -> Result<(), CoreError> {
    std::fs::create_dir_all(root)?;
    let path = config_path_at(root);
    let tmp = path.with_file_name("galleria.yaml.tmp");
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp, yaml)?;
    std::fs::rename(&tmp, &path)?;
    Ok(())
}

/// `save_at` convenience wrapper against `~/.galleria/`.
pub fn save(config: &SiteConfig) -> Result<(), CoreError> {
    save_at(&default_root()?, config)
}

/// Read the access token from `<root>/token.txt`, if present.
pub fn read_token_at(root: &Path) -> Result<Option<String>, CoreError> {
    let path = token_path_at(root);
    if !path.exists() {
        return Ok(None);
    }
    let token = std::fs::read_to_string(&path)?.trim().to_owned();
    Ok(if token.is_empty() { None } else { Some(token) })
}

/// Store the access token in `<root>/token.txt`.
pub fn write_token_at(root: &Path, token: &str) -> Result<(), CoreError> {
    std::fs::create_dir_all(root)?;
    std::fs::write(token_path_at(root), token)?;
    Ok(())
}

/// `~/.galleria/`, derived from the home directory.
pub fn default_root() -> Result<PathBuf, CoreError> {
    dirs::home_dir()
        .map(|h| galleria_root(&h))
        .ok_or(CoreError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
