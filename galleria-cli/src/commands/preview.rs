//! `galleria preview` — run the site generator's watch server.

use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct PreviewArgs {}

impl PreviewArgs {
    pub async fn run(self) -> Result<()> {
        let coordinator = super::open_coordinator()?;
        let server = coordinator.start_preview()?;
        println!("Preview running; ctrl-c to stop.");
        tokio::signal::ctrl_c().await?;
        server.stop().await?;
        Ok(())
    }
}
