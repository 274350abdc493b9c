//! Command implementations plus the session wiring they share.

pub mod album;
pub mod asset;
pub mod init;
pub mod preview;
pub mod publish;
pub mod status;
pub mod update;

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use tokio::sync::mpsc::UnboundedReceiver;

use galleria_core::{config, Credentials};
use galleria_store::Store;
use galleria_sync::{Coordinator, DeployState, EventBus, PreviewState, SyncEvent};
use galleria_vcs::StreamSource;

/// Resolve the configuration root (`~/.galleria`).
pub(crate) fn root() -> Result<PathBuf> {
    Ok(config::default_root()?)
}

/// Open the store read-write against the local working copy. Purely local;
/// no credentials involved.
pub(crate) fn open_store() -> Result<Store> {
    let root = root()?;
    let repo = config::repo_path_at(&root);
    anyhow::ensure!(
        repo.join(".git").exists(),
        "no working copy at {}; run `galleria update` first",
        repo.display()
    );
    let mut store = Store::new(repo);
    store.load()?;
    Ok(store)
}

/// Build a coordinator for commands that talk to the remote or run
/// subprocesses, with a task printing its event stream.
pub(crate) fn open_coordinator() -> Result<Coordinator> {
    let root = root()?;
    let config = config::load_at(&root)
        .with_context(|| "no configuration found; run `galleria init` first")?;
    let token = config::read_token_at(&root)?
        .with_context(|| "no access token saved; run `galleria init` with --token")?;
    let credentials = Credentials {
        username: config.username.clone(),
        token,
    };

    let (events, rx) = EventBus::channel();
    tokio::spawn(print_events(rx));

    Ok(Coordinator::new(
        config::repo_path_at(&root),
        config,
        credentials,
        events,
    ))
}

/// Render the coordinator's event stream for a one-shot command.
async fn print_events(mut rx: UnboundedReceiver<SyncEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            SyncEvent::Progress(line) => match line.source {
                StreamSource::Stdout => println!("  {}", line.text.dimmed()),
                StreamSource::Stderr => println!("  {}", line.text.yellow()),
            },
            SyncEvent::Preview(state) => print_preview(state),
            SyncEvent::Deploy(state) => print_deploy(state),
            // One-shot commands print their own summaries.
            SyncEvent::Status(_) => {}
        }
    }
}

fn print_preview(state: PreviewState) {
    match state {
        PreviewState::Ready => println!("{} preview server ready", "✓".green()),
        PreviewState::Rebuilding => println!("… rebuilding"),
        PreviewState::Rebuilt => println!("{} rebuilt", "✓".green()),
        PreviewState::RendererError(message) => {
            println!("{} {}", "renderer error:".red(), message)
        }
        PreviewState::Exited => println!("preview server exited"),
        PreviewState::Unknown => {}
    }
}

fn print_deploy(state: DeployState) {
    match state {
        DeployState::Published => println!("{} deploy published", "✓".green()),
        DeployState::Building => println!("… deploy building"),
        DeployState::Failed => println!("{}", "✗ deploy failed".red()),
        DeployState::Canceled => println!("{}", "deploy canceled".yellow()),
        DeployState::Unknown => println!("deploy state unknown"),
    }
}
