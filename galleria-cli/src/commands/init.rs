//! `galleria init` — write the site configuration and access token.

use anyhow::Result;
use clap::Args;

use galleria_core::{config, BadgeHashes, SiteConfig};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Remote repository URL (https).
    #[arg(long)]
    pub remote: String,

    /// Commit author name.
    #[arg(long)]
    pub author_name: String,

    /// Commit author email.
    #[arg(long)]
    pub author_email: String,

    /// Username sent to the remote when authenticating.
    #[arg(long)]
    pub username: String,

    /// Access token for the remote. Stored outside the configuration file.
    #[arg(long)]
    pub token: Option<String>,

    /// Deploy status badge URL, polled after publishing.
    #[arg(long)]
    pub badge_url: Option<String>,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let root = super::root()?;
        let config = SiteConfig {
            remote_url: self.remote,
            author_name: self.author_name,
            author_email: self.author_email,
            username: self.username,
            badge_url: self.badge_url,
            badge_hashes: BadgeHashes::default(),
            poll_interval_secs: 10,
            preview_command: vec!["hugo".to_owned(), "server".to_owned()],
        };
        config::save_at(&root, &config)?;
        println!("✓ Wrote {}", config::config_path_at(&root).display());

        if let Some(token) = self.token {
            config::write_token_at(&root, &token)?;
            println!("✓ Saved access token");
        }
        println!("Next: run `galleria update` to fetch the site content.");
        Ok(())
    }
}
