//! Thin stateful wrapper over the external `git` binary.
//!
//! One client owns one working-copy path and one remote URL; every
//! subcommand goes through the shared [`CommandRunner`], so concurrent
//! synchronization and save operations cannot corrupt the working copy.
//!
//! Configuration (author identity, line endings) travels as `-c` pairs on
//! every invocation and credentials as a per-invocation inline credential
//! helper — nothing is ever written to the repository's own configuration.

use std::path::{Path, PathBuf};

use galleria_core::Credentials;

use crate::error::{io_err, VcsError};
use crate::runner::{CommandRunner, CommandSpec};

/// Dirty/ahead/behind snapshot of the working copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepoStatus {
    /// Working copy differs from its last commit.
    pub dirty: bool,
    /// Local commits not yet on the tracked remote branch.
    pub ahead: u32,
    /// Remote commits not yet in the local branch.
    pub behind: u32,
}

pub struct GitClient {
    work_dir: PathBuf,
    remote_url: String,
    /// `-c key=value` pairs applied to every invocation.
    config: Vec<(String, String)>,
    runner: CommandRunner,
}

impl GitClient {
    pub fn new(
        work_dir: impl Into<PathBuf>,
        remote_url: impl Into<String>,
        runner: CommandRunner,
    ) -> Self {
        Self {
            work_dir: work_dir.into(),
            remote_url: remote_url.into(),
            config: vec![("core.autocrlf".to_owned(), "false".to_owned())],
            runner,
        }
    }

    /// Commit author identity, passed as `-c user.name` / `-c user.email`.
    pub fn with_identity(mut self, name: &str, email: &str) -> Self {
        self.config.push(("user.name".to_owned(), name.to_owned()));
        self.config.push(("user.email".to_owned(), email.to_owned()));
        self
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// True iff the working copy already contains version-control metadata.
    pub fn is_valid_repository(&self) -> bool {
        self.work_dir.join(".git").exists()
    }

    // -----------------------------------------------------------------------
    // Clone / pull
    // -----------------------------------------------------------------------

    /// Bring the working copy up to date with the remote.
    ///
    /// No valid repository: performs a full clone, first deleting any stale
    /// directory contents when `replace_if_invalid` is set. Valid
    /// repository: fast-forward-only pull. Authentication failures and
    /// non-fast-forward history fail the attempt — they are surfaced to the
    /// caller, never auto-resolved.
    pub async fn clone_or_pull(
        &self,
        credentials: &Credentials,
        replace_if_invalid: bool,
    ) -> Result<(), VcsError> {
        if self.is_valid_repository() {
            tracing::info!(repo = %self.work_dir.display(), "valid repository, pulling");
            self.pull(credentials).await
        } else {
            tracing::warn!(repo = %self.work_dir.display(), "no valid repository, cloning");
            if replace_if_invalid && self.work_dir.exists() {
                std::fs::remove_dir_all(&self.work_dir).map_err(|e| io_err(&self.work_dir, e))?;
            }
            self.clone(credentials).await
        }
    }

    async fn clone(&self, credentials: &Credentials) -> Result<(), VcsError> {
        let parent = self
            .work_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&parent).map_err(|e| io_err(&parent, e))?;
        let dir_name = self
            .work_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| ".".to_owned());

        let spec = self
            .authenticated(CommandSpec::new("git", parent), credentials)
            .args(["clone", "--progress"])
            .arg(&self.remote_url)
            .arg(dir_name);
        self.runner.run(spec).await?;
        Ok(())
    }

    async fn pull(&self, credentials: &Credentials) -> Result<(), VcsError> {
        let spec = self
            .authenticated(self.base(), credentials)
            .args(["pull", "--ff-only", "--progress"]);
        self.runner.run(spec).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Status
    // -----------------------------------------------------------------------

    /// True iff the working copy differs from its last commit.
    pub async fn has_uncommitted_changes(&self) -> Result<bool, VcsError> {
        let output = self
            .runner
            .run(self.base().args(["status", "--porcelain"]))
            .await?;
        Ok(!output.stdout_trimmed().is_empty())
    }

    /// Count of local commits not yet on the tracked remote branch.
    pub async fn commits_ahead_of_remote(&self) -> Result<u32, VcsError> {
        Ok(self.ahead_behind().await?.0)
    }

    /// Full dirty/ahead/behind snapshot.
    pub async fn status(&self) -> Result<RepoStatus, VcsError> {
        let dirty = self.has_uncommitted_changes().await?;
        let (ahead, behind) = self.ahead_behind().await?;
        Ok(RepoStatus {
            dirty,
            ahead,
            behind,
        })
    }

    async fn ahead_behind(&self) -> Result<(u32, u32), VcsError> {
        // Exits non-zero when no upstream is configured yet; that counts as
        // neither ahead nor behind.
        let output = self
            .runner
            .run(
                self.base()
                    .args(["rev-list", "--left-right", "--count", "HEAD...@{upstream}"])
                    .no_check(),
            )
            .await?;
        if !output.success() {
            return Ok((0, 0));
        }
        let text = output.stdout_trimmed();
        let mut parts = text.split_whitespace();
        match (
            parts.next().and_then(|s| s.parse().ok()),
            parts.next().and_then(|s| s.parse().ok()),
        ) {
            (Some(ahead), Some(behind)) => Ok((ahead, behind)),
            _ => Err(VcsError::UnexpectedOutput {
                program: "git".to_owned(),
                detail: format!("rev-list count output: '{text}'"),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Commit / push / reset
    // -----------------------------------------------------------------------

    /// Stage all changes and create one commit. No-op detection is the
    /// caller's responsibility.
    pub async fn stage_and_commit(&self, message: &str) -> Result<(), VcsError> {
        self.runner.run(self.base().args(["add", "-A"])).await?;
        self.runner
            .run(self.base().args(["commit", "-m"]).arg(message))
            .await?;
        Ok(())
    }

    /// Push to the tracked remote. A rejection (diverged remote) fails with
    /// the remote's reason; it is not retried here.
    pub async fn push(&self, credentials: &Credentials) -> Result<(), VcsError> {
        let spec = self
            .authenticated(self.base(), credentials)
            .args(["push", "--progress"]);
        self.runner.run(spec).await?;
        Ok(())
    }

    /// Discard all uncommitted changes and untracked files, returning the
    /// working copy to its last commit. Destructive and irreversible for
    /// local-only edits — callers confirm before invoking.
    pub async fn hard_reset_and_clean(&self) -> Result<(), VcsError> {
        self.runner
            .run(self.base().args(["reset", "--hard"]))
            .await?;
        self.runner.run(self.base().args(["clean", "-fd"])).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Invocation plumbing
    // -----------------------------------------------------------------------

    fn base(&self) -> CommandSpec {
        let mut spec = CommandSpec::new("git", &self.work_dir);
        for (key, value) in &self.config {
            spec = spec.arg("-c").arg(format!("{key}={value}"));
        }
        spec
    }

    /// Attach a one-shot inline credential helper. The token lives only in
    /// this invocation's argument list and is redacted from logs.
    fn authenticated(&self, spec: CommandSpec, credentials: &Credentials) -> CommandSpec {
        let helper = format!(
            "!f() {{ echo username={}; echo password={}; }}; f",
            credentials.username, credentials.token
        );
        spec.arg("-c")
            .arg(format!("credential.helper={helper}"))
            .secret(credentials.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GitClient {
        GitClient::new("/tmp/nowhere", "https://example.com/r", CommandRunner::new())
            .with_identity("Admin", "admin@example.com")
    }

    #[test]
    fn base_invocation_carries_config_pairs() {
        let spec = client().base();
        let line = spec.display_line();
        assert!(line.contains("core.autocrlf=false"));
        assert!(line.contains("user.name=Admin"));
        assert!(line.contains("user.email=admin@example.com"));
    }

    #[test]
    fn credentials_never_appear_in_display_line() {
        let c = client();
        let creds = Credentials {
            username: "admin".to_owned(),
            token: "tok-abc123".to_owned(),
        };
        let spec = c.authenticated(c.base(), &creds).args(["push"]);
        assert!(!spec.display_line().contains("tok-abc123"));
    }

    #[test]
    fn invalid_repository_detected_without_metadata() {
        assert!(!client().is_valid_repository());
    }
}
