//! `galleria update` — clone or fast-forward the working copy.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Delete and re-clone a directory that is not a valid repository.
    #[arg(long)]
    pub replace: bool,
}

impl UpdateArgs {
    pub async fn run(self) -> Result<()> {
        let mut coordinator = super::open_coordinator()?;
        coordinator.update(self.replace).await?;

        let store = coordinator.store();
        println!(
            "{} Working copy up to date: {} albums in {} categories",
            "✓".green(),
            store.albums().len(),
            store.categories().len(),
        );
        Ok(())
    }
}
