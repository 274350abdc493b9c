//! Local preview server supervision.
//!
//! The site generator runs as a child process in watch mode inside the
//! working copy. Its stdout is the only signal we get about rebuild
//! progress, so the supervisor tails it line by line and classifies each
//! line into a [`PreviewState`]. Lines that carry no state change are
//! forwarded as plain progress output.

use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use galleria_vcs::{ProgressLine, StreamSource};

use crate::error::{io_err, SyncError};
use crate::events::{EventBus, SyncEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    /// Server is up and the site is browsable.
    Ready,
    /// A source change was detected, rebuild in flight.
    Rebuilding,
    /// Rebuild finished.
    Rebuilt,
    /// The generator reported a build error.
    RendererError(String),
    /// The child process exited.
    Exited,
    /// Line carried no recognizable state.
    Unknown,
}

/// Map one generator output line to a state change.
pub fn classify_line(line: &str) -> PreviewState {
    if line.contains("ERROR") {
        PreviewState::RendererError(line.trim().to_owned())
    } else if line.contains("Web Server is available") {
        PreviewState::Ready
    } else if line.contains("Change detected") {
        PreviewState::Rebuilding
    } else if line.contains("Total in") {
        PreviewState::Rebuilt
    } else {
        PreviewState::Unknown
    }
}

pub struct PreviewServer {
    child: Child,
    reader: JoinHandle<()>,
}

impl PreviewServer {
    /// Start the preview command in `work_dir` and stream its output through
    /// the event bus.
    pub fn spawn(command: &[String], work_dir: &Path, events: EventBus) -> Result<Self, SyncError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| SyncError::Task("empty preview command".to_owned()))?;

        tracing::info!(
            program = %program,
            dir = %work_dir.display(),
            "starting preview server",
        );

        let mut child = Command::new(program)
            .args(args)
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| io_err(work_dir, e))?;

        // Piped in spawn() above; take() cannot fail here.
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let reader = tokio::spawn(async move {
            let out = async {
                if let Some(stdout) = stdout {
                    pump(stdout, StreamSource::Stdout, &events).await;
                }
            };
            let err = async {
                if let Some(stderr) = stderr {
                    pump(stderr, StreamSource::Stderr, &events).await;
                }
            };
            tokio::join!(out, err);
            // Both pipes at EOF means the generator is gone.
            events.emit(SyncEvent::Preview(PreviewState::Exited));
        });

        Ok(PreviewServer { child, reader })
    }

    /// Kill the child and wait for it to exit.
    pub async fn stop(mut self) -> Result<(), SyncError> {
        self.reader.abort();
        self.child
            .kill()
            .await
            .map_err(|e| SyncError::Task(format!("failed to kill preview server: {e}")))?;
        tracing::info!("preview server stopped");
        Ok(())
    }
}

async fn pump(
    pipe: impl tokio::io::AsyncRead + Unpin,
    source: StreamSource,
    events: &EventBus,
) {
    let mut lines = BufReader::new(pipe).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match classify_line(&line) {
            PreviewState::Unknown => {}
            state => events.emit(SyncEvent::Preview(state)),
        }
        events.emit(SyncEvent::Progress(ProgressLine {
            source,
            text: line,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_available_line_means_ready() {
        let line = "Web Server is available at http://localhost:1313/";
        assert_eq!(classify_line(line), PreviewState::Ready);
    }

    #[test]
    fn change_detected_starts_rebuild() {
        let line = "Change detected, rebuilding site.";
        assert_eq!(classify_line(line), PreviewState::Rebuilding);
    }

    #[test]
    fn total_line_finishes_rebuild() {
        assert_eq!(classify_line("Total in 42 ms"), PreviewState::Rebuilt);
    }

    #[test]
    fn error_line_captures_message() {
        let line = "ERROR render of \"page\" failed";
        match classify_line(line) {
            PreviewState::RendererError(message) => assert!(message.contains("render")),
            other => panic!("expected renderer error, got {other:?}"),
        }
    }

    #[test]
    fn ordinary_output_is_unknown() {
        assert_eq!(classify_line("Building sites ..."), PreviewState::Unknown);
    }

    #[tokio::test]
    async fn spawned_process_output_reaches_event_bus() {
        let (events, mut rx) = EventBus::channel();
        let command = vec![
            "sh".to_owned(),
            "-c".to_owned(),
            "echo 'Web Server is available at http://localhost:1313/'".to_owned(),
        ];
        let dir = tempfile::TempDir::new().unwrap();
        let _server = PreviewServer::spawn(&command, dir.path(), events).unwrap();

        let mut saw_ready = false;
        let mut saw_exited = false;
        while let Some(event) = rx.recv().await {
            match event {
                SyncEvent::Preview(PreviewState::Ready) => saw_ready = true,
                SyncEvent::Preview(PreviewState::Exited) => {
                    saw_exited = true;
                    break;
                }
                _ => {}
            }
        }
        assert!(saw_ready);
        assert!(saw_exited);
    }

    #[tokio::test]
    async fn stop_kills_a_long_running_child() {
        let (events, _rx) = EventBus::channel();
        let command = vec!["sleep".to_owned(), "30".to_owned()];
        let dir = tempfile::TempDir::new().unwrap();
        let server = PreviewServer::spawn(&command, dir.path(), events).unwrap();
        server.stop().await.unwrap();
    }
}
