//! Serialized external-process execution.
//!
//! One [`CommandRunner`] guards one working copy: every invocation takes the
//! runner's mutex, so two logically independent operations issued at the
//! same time run one after the other — the second waits, it is not
//! rejected. The working copy is a single directory and is not safe for
//! concurrent version-control commands.
//!
//! Both output streams are consumed line-by-line while the process runs:
//! stdout is logged at `info`, stderr at `warn`, and each line is forwarded
//! to an optional progress channel for the presentation layer.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::{mpsc, Mutex};

use crate::error::VcsError;

const REDACTED: &str = "********";

/// Which stream a progress line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSource {
    Stdout,
    Stderr,
}

/// One line of live process output, forwarded to the presentation layer.
#[derive(Debug, Clone)]
pub struct ProgressLine {
    pub source: StreamSource,
    pub text: String,
}

/// A single external command to run.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    cwd: PathBuf,
    /// Fail the run on a non-zero exit. Callers that interpret exit codes
    /// themselves opt out.
    check: bool,
    /// Argument substrings that must never reach a log line.
    secrets: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            check: true,
            secrets: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Do not treat a non-zero exit as a failure.
    pub fn no_check(mut self) -> Self {
        self.check = false;
        self
    }

    /// Register a secret to redact from the logged command line.
    pub fn secret(mut self, value: impl Into<String>) -> Self {
        self.secrets.push(value.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// The command line as it may appear in logs, secrets redacted.
    pub fn display_line(&self) -> String {
        let mut line = format!("{} {}", self.program, self.args.join(" "));
        for secret in &self.secrets {
            if !secret.is_empty() {
                line = line.replace(secret.as_str(), REDACTED);
            }
        }
        line
    }
}

/// Exit status plus collected stdout of a completed command.
#[derive(Debug)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: Vec<String>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Collected stdout joined back into one trimmed string.
    pub fn stdout_trimmed(&self) -> String {
        self.stdout.join("\n").trim().to_owned()
    }
}

/// Runs one external process at a time, streaming its output.
pub struct CommandRunner {
    gate: Mutex<()>,
    progress: Option<mpsc::UnboundedSender<ProgressLine>>,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner {
    pub fn new() -> Self {
        Self {
            gate: Mutex::new(()),
            progress: None,
        }
    }

    /// A runner that forwards every output line to `progress`.
    pub fn with_progress(progress: mpsc::UnboundedSender<ProgressLine>) -> Self {
        Self {
            gate: Mutex::new(()),
            progress: Some(progress),
        }
    }

    /// Run one command to completion.
    ///
    /// Holds the runner's gate for the whole run. With `check` on (the
    /// default) a non-zero exit becomes [`VcsError::CommandFailed`] carrying
    /// the tail of stderr as the human-readable reason.
    pub async fn run(&self, spec: CommandSpec) -> Result<CommandOutput, VcsError> {
        let _guard = self.gate.lock().await;

        tracing::info!(cwd = %spec.cwd.display(), "$ {}", spec.display_line());

        let mut child = tokio::process::Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| VcsError::Spawn {
                program: spec.program.clone(),
                source,
            })?;

        // Both pipes must be drained while the process runs, or a chatty
        // command can fill one buffer and stall.
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let (stdout_lines, stderr_lines) = tokio::join!(
            self.pump(stdout_pipe, StreamSource::Stdout),
            self.pump(stderr_pipe, StreamSource::Stderr),
        );

        let status = child.wait().await.map_err(|source| VcsError::Spawn {
            program: spec.program.clone(),
            source,
        })?;
        let code = status.code();

        if spec.check && !status.success() {
            return Err(VcsError::CommandFailed {
                program: spec.program.clone(),
                code,
                detail: failure_detail(&stderr_lines),
            });
        }

        Ok(CommandOutput {
            code,
            stdout: stdout_lines,
        })
    }

    async fn pump<R: AsyncRead + Unpin>(
        &self,
        pipe: Option<R>,
        source: StreamSource,
    ) -> Vec<String> {
        let mut collected = Vec::new();
        let Some(pipe) = pipe else {
            return collected;
        };
        let mut lines = BufReader::new(pipe).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match source {
                StreamSource::Stdout => tracing::info!("> {line}"),
                StreamSource::Stderr => tracing::warn!("> {line}"),
            }
            if let Some(progress) = &self.progress {
                let _ = progress.send(ProgressLine {
                    source,
                    text: line.clone(),
                });
            }
            collected.push(line);
        }
        collected
    }
}

/// The last non-empty stderr lines, newest last — what git actually said.
fn failure_detail(stderr: &[String]) -> String {
    let tail: Vec<&str> = stderr
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .rev()
        .take(3)
        .collect();
    if tail.is_empty() {
        "no error output".to_owned()
    } else {
        tail.into_iter().rev().collect::<Vec<_>>().join("; ")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    fn spec(program: &str) -> CommandSpec {
        CommandSpec::new(program, std::env::temp_dir())
    }

    #[tokio::test]
    async fn captures_stdout_lines() {
        let runner = CommandRunner::new();
        let output = runner
            .run(spec("sh").args(["-c", "echo one; echo two"]))
            .await
            .expect("run");
        assert!(output.success());
        assert_eq!(output.stdout, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn nonzero_exit_fails_with_stderr_detail() {
        let runner = CommandRunner::new();
        let err = runner
            .run(spec("sh").args(["-c", "echo broken >&2; exit 3"]))
            .await
            .unwrap_err();
        match err {
            VcsError::CommandFailed { code, detail, .. } => {
                assert_eq!(code, Some(3));
                assert!(detail.contains("broken"));
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_check_reports_exit_code_instead_of_failing() {
        let runner = CommandRunner::new();
        let output = runner
            .run(spec("sh").args(["-c", "exit 1"]).no_check())
            .await
            .expect("run");
        assert_eq!(output.code, Some(1));
        assert!(!output.success());
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let runner = CommandRunner::new();
        let err = runner
            .run(spec("definitely-not-a-real-program-4x7"))
            .await
            .unwrap_err();
        assert!(matches!(err, VcsError::Spawn { .. }));
    }

    #[tokio::test]
    async fn concurrent_runs_are_serialized() {
        // Two sleeps through one runner must take at least the sum of their
        // durations; through two runners they would overlap.
        let runner = Arc::new(CommandRunner::new());
        let started = tokio::time::Instant::now();
        let a = {
            let runner = runner.clone();
            tokio::spawn(async move {
                runner.run(spec("sh").args(["-c", "sleep 0.3"])).await
            })
        };
        let b = {
            let runner = runner.clone();
            tokio::spawn(async move {
                runner.run(spec("sh").args(["-c", "sleep 0.3"])).await
            })
        };
        let (a, b) = tokio::join!(a, b);
        a.expect("join").expect("run");
        b.expect("join").expect("run");
        assert!(started.elapsed() >= Duration::from_millis(600));
    }

    #[tokio::test]
    async fn progress_lines_are_forwarded() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let runner = CommandRunner::with_progress(tx);
        runner
            .run(spec("sh").args(["-c", "echo visible"]))
            .await
            .expect("run");
        let line = rx.recv().await.expect("progress line");
        assert_eq!(line.source, StreamSource::Stdout);
        assert_eq!(line.text, "visible");
    }

    #[test]
    fn display_line_redacts_secrets() {
        let spec = CommandSpec::new("git", "/tmp")
            .arg("-c")
            .arg("credential.helper=!f() { echo password=hunter2; }; f")
            .secret("hunter2");
        assert!(!spec.display_line().contains("hunter2"));
        assert!(spec.display_line().contains(REDACTED));
    }
}
