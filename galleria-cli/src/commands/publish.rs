//! `galleria commit`, `galleria publish`, `galleria discard`.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct CommitArgs {}

impl CommitArgs {
    pub async fn run(self) -> Result<()> {
        let mut coordinator = super::open_coordinator()?;
        coordinator.load().await?;
        coordinator.commit().await?;
        println!("{} Changes committed", "✓".green());
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Stay attached and report deploy progress until it reaches a
    /// terminal state.
    #[arg(long)]
    pub watch: bool,
}

impl PublishArgs {
    pub async fn run(self) -> Result<()> {
        let mut coordinator = super::open_coordinator()?;
        coordinator.load().await?;
        coordinator.publish().await?;
        println!("{} Pushed to remote", "✓".green());
        if self.watch {
            // Deploy events arrive on the printer task; wait for ctrl-c.
            println!("Watching deploy status; ctrl-c to stop.");
            tokio::signal::ctrl_c().await?;
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DiscardArgs {
    /// Required confirmation; discarding is irreversible.
    #[arg(long)]
    pub yes: bool,
}

impl DiscardArgs {
    pub async fn run(self) -> Result<()> {
        anyhow::ensure!(
            self.yes,
            "discard throws away all unpublished changes; re-run with --yes to confirm"
        );
        let mut coordinator = super::open_coordinator()?;
        coordinator.discard().await?;
        println!("{} Working copy restored to the last commit", "✓".green());
        Ok(())
    }
}
