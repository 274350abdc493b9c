//! Galleria — photo-album site content console.
//!
//! # Usage
//!
//! ```text
//! galleria init --remote <url> --author-name <name> --author-email <email> --username <user> [--token <token>]
//! galleria update [--replace]
//! galleria status
//! galleria album list [--category <name>]
//! galleria album add <title> --category <name> [--body <text>]
//! galleria album set <id> [--title ...] [--date YYYY-MM-DD] [--categories ...] [--body ...] [--thumb ...]
//! galleria album move <id> --category <name> <up|down>
//! galleria album remove <id>
//! galleria asset list|add|remove|label|exif|move ...
//! galleria commit
//! galleria publish
//! galleria discard --yes
//! galleria preview
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    album::AlbumCommand,
    asset::AssetCommand,
    init::InitArgs,
    preview::PreviewArgs,
    publish::{CommitArgs, DiscardArgs, PublishArgs},
    status::StatusArgs,
    update::UpdateArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "galleria",
    version,
    about = "Manage a photo-album site's albums, assets and publishing",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the site configuration and access token.
    Init(InitArgs),

    /// Clone or fast-forward the working copy from the remote.
    Update(UpdateArgs),

    /// Show album, working-copy and remote status.
    Status(StatusArgs),

    /// Inspect and edit albums.
    Album {
        #[command(subcommand)]
        command: AlbumCommand,
    },

    /// Inspect and edit the images of an album.
    Asset {
        #[command(subcommand)]
        command: AssetCommand,
    },

    /// Checkpoint all working-copy changes as one commit.
    Commit(CommitArgs),

    /// Commit, push and watch the deploy status.
    Publish(PublishArgs),

    /// Discard all uncommitted changes and untracked files.
    Discard(DiscardArgs),

    /// Run the local preview server until interrupted.
    Preview(PreviewArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Init(args) => args.run(),
        Commands::Update(args) => args.run().await,
        Commands::Status(args) => args.run().await,
        Commands::Album { command } => commands::album::run(command),
        Commands::Asset { command } => commands::asset::run(command),
        Commands::Commit(args) => args.run().await,
        Commands::Publish(args) => args.run().await,
        Commands::Discard(args) => args.run().await,
        Commands::Preview(args) => args.run().await,
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
