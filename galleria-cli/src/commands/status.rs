//! `galleria status` — working-copy and remote visibility.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct StatusArgs {}

impl StatusArgs {
    pub async fn run(self) -> Result<()> {
        let mut coordinator = super::open_coordinator()?;
        coordinator.load().await?;
        let status = coordinator.refresh_status().await?;

        let store = coordinator.store();
        println!(
            "{} albums across {} categories",
            store.albums().len(),
            store.categories().len()
        );
        for category in store.categories() {
            println!(
                "  {}: {} albums",
                category.bold(),
                store.albums_in_category(&category).len()
            );
        }

        if status.repo_dirty {
            println!(
                "{}",
                "working copy has uncommitted changes — `galleria publish` will include them"
                    .yellow()
            );
        } else {
            println!("{} working copy clean", "✓".green());
        }
        match (status.ahead, status.behind) {
            (0, 0) => println!("{} in sync with remote", "✓".green()),
            (ahead, 0) => println!(
                "{}",
                format!("{ahead} local commit(s) not yet published").yellow()
            ),
            (0, behind) => println!(
                "{}",
                format!("{behind} remote commit(s) not yet pulled — run `galleria update`").yellow()
            ),
            (ahead, behind) => println!(
                "{}",
                format!("diverged: {ahead} ahead, {behind} behind — update before publishing")
                    .red()
            ),
        }
        Ok(())
    }
}
