//! `galleria asset …` — inspect and edit the images of an album.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use galleria_core::AlbumId;

#[derive(Subcommand, Debug)]
pub enum AssetCommand {
    /// List an album's images in display order.
    List(ListArgs),

    /// Add an image from a local file.
    Add(AddArgs),

    /// Remove an image by position.
    Remove(RemoveArgs),

    /// Set or clear an image's label.
    Label(LabelArgs),

    /// Toggle EXIF display for an image.
    Exif(ExifArgs),

    /// Move an image within the display order.
    Move(MoveArgs),
}

pub fn run(command: AssetCommand) -> Result<()> {
    match command {
        AssetCommand::List(args) => args.run(),
        AssetCommand::Add(args) => args.run(),
        AssetCommand::Remove(args) => args.run(),
        AssetCommand::Label(args) => args.run(),
        AssetCommand::Exif(args) => args.run(),
        AssetCommand::Move(args) => args.run(),
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Album identifier.
    pub album: String,
}

impl ListArgs {
    fn run(self) -> Result<()> {
        let store = super::open_store()?;
        let id = AlbumId::from(self.album);
        let album = store
            .album(&id)
            .ok_or_else(|| anyhow::anyhow!("no album '{id}'"))?;
        for (index, asset) in album.assets.iter().enumerate() {
            let thumb = match &album.thumbnail {
                Some(thumb) if *thumb == asset.src => " (thumbnail)",
                _ => "",
            };
            println!(
                "{index:3}  {}  exif={}  {}{}",
                asset.src.bold(),
                asset.exif,
                asset.label.as_deref().unwrap_or("-"),
                thumb,
            );
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Album identifier.
    pub album: String,

    /// Local image file to copy into the album on save.
    pub path: PathBuf,

    /// Display label.
    #[arg(long)]
    pub label: Option<String>,
}

impl AddArgs {
    fn run(self) -> Result<()> {
        let mut store = super::open_store()?;
        let id = AlbumId::from(self.album);
        store.add_asset(&id, &self.path, self.label.as_deref())?;
        store.save()?;
        println!(
            "{} Added '{}' to album '{id}'",
            "✓".green(),
            self.path.display()
        );
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Album identifier.
    pub album: String,

    /// Image position (see `galleria asset list`).
    pub index: usize,
}

impl RemoveArgs {
    fn run(self) -> Result<()> {
        let mut store = super::open_store()?;
        let id = AlbumId::from(self.album);
        store.remove_asset(&id, self.index)?;
        store.save()?;
        println!("{} Removed image {} from '{id}'", "✓".green(), self.index);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct LabelArgs {
    /// Album identifier.
    pub album: String,

    /// Image position.
    pub index: usize,

    /// New label; omit to clear.
    pub label: Option<String>,
}

impl LabelArgs {
    fn run(self) -> Result<()> {
        let mut store = super::open_store()?;
        let id = AlbumId::from(self.album);
        store.set_asset_label(&id, self.index, self.label.as_deref())?;
        store.save()?;
        println!("{} Updated label on image {}", "✓".green(), self.index);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ExifArgs {
    /// Album identifier.
    pub album: String,

    /// Image position.
    pub index: usize,

    /// `true` to show EXIF data, `false` to hide it.
    #[arg(action = clap::ArgAction::Set)]
    pub enabled: bool,
}

impl ExifArgs {
    fn run(self) -> Result<()> {
        let mut store = super::open_store()?;
        let id = AlbumId::from(self.album);
        store.set_asset_exif(&id, self.index, self.enabled)?;
        store.save()?;
        println!("{} Set exif={} on image {}", "✓".green(), self.enabled, self.index);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Album identifier.
    pub album: String,

    /// Image position.
    pub index: usize,

    /// Positions to move by; negative is toward the front.
    #[arg(allow_hyphen_values = true)]
    pub delta: i64,
}

impl MoveArgs {
    fn run(self) -> Result<()> {
        let mut store = super::open_store()?;
        let id = AlbumId::from(self.album);
        store.move_asset(&id, self.index, self.delta)?;
        store.save()?;
        println!("{} Moved image {} by {}", "✓".green(), self.index, self.delta);
        Ok(())
    }
}
