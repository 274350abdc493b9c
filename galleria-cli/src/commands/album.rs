//! `galleria album …` — inspect and edit albums in the working copy.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Subcommand};
use colored::Colorize;

use galleria_core::AlbumId;

#[derive(Subcommand, Debug)]
pub enum AlbumCommand {
    /// List albums, optionally filtered to one category.
    List(ListArgs),

    /// Create a new album.
    Add(AddArgs),

    /// Change fields of an existing album.
    Set(SetArgs),

    /// Move an album within its category's date ordering.
    Move(MoveArgs),

    /// Delete an album, its index file and its assets.
    Remove(RemoveArgs),
}

pub fn run(command: AlbumCommand) -> Result<()> {
    match command {
        AlbumCommand::List(args) => args.run(),
        AlbumCommand::Add(args) => args.run(),
        AlbumCommand::Set(args) => args.run(),
        AlbumCommand::Move(args) => args.run(),
        AlbumCommand::Remove(args) => args.run(),
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only albums in this category, in display order.
    #[arg(long)]
    pub category: Option<String>,
}

impl ListArgs {
    fn run(self) -> Result<()> {
        let store = super::open_store()?;
        let albums: Vec<_> = match self.category.as_deref() {
            Some(category) => store.albums_in_category(category),
            None => store.albums().iter().collect(),
        };
        for album in albums {
            println!(
                "{}  {}  {}  [{}]  ({} images)",
                album.id.to_string().bold(),
                album.date.format("%Y-%m-%d"),
                album.title,
                album.categories_line(),
                album.assets.len(),
            );
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Album title; the identifier is derived from it.
    pub title: String,

    /// Category the album appears under.
    #[arg(long)]
    pub category: String,

    /// Body text below the front matter.
    #[arg(long)]
    pub body: Option<String>,
}

impl AddArgs {
    fn run(self) -> Result<()> {
        let mut store = super::open_store()?;
        let id = store.add_album(&self.title, &self.category)?;
        if let Some(body) = self.body {
            store.set_body(&id, &body)?;
        }
        store.save()?;
        println!("{} Created album '{id}'", "✓".green());
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Album identifier (see `galleria album list`).
    pub id: String,

    /// New title. The identifier is re-derived on save; a changed title
    /// renames the album's directories.
    #[arg(long)]
    pub title: Option<String>,

    /// Ordering date, `YYYY-MM-DD`.
    #[arg(long)]
    pub date: Option<String>,

    /// Comma-separated category list.
    #[arg(long)]
    pub categories: Option<String>,

    /// Body text below the front matter.
    #[arg(long)]
    pub body: Option<String>,

    /// Thumbnail source name; must match one of the album's images.
    #[arg(long)]
    pub thumb: Option<String>,
}

impl SetArgs {
    fn run(self) -> Result<()> {
        let mut store = super::open_store()?;
        let id = AlbumId::from(self.id);

        if let Some(title) = &self.title {
            store.set_title(&id, title)?;
        }
        if let Some(date) = &self.date {
            store.set_date(&id, parse_date(date)?)?;
        }
        if let Some(categories) = &self.categories {
            store.set_categories_line(&id, categories)?;
        }
        if let Some(body) = &self.body {
            store.set_body(&id, body)?;
        }
        if let Some(thumb) = &self.thumb {
            store.set_thumbnail(&id, Some(thumb))?;
        }
        store.save()?;
        println!("{} Updated album '{id}'", "✓".green());
        Ok(())
    }
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Album identifier.
    pub id: String,

    /// Category whose ordering the move applies to.
    #[arg(long)]
    pub category: String,

    /// Earlier (`up`) or later (`down`) in the category's display order.
    pub direction: Direction,
}

impl MoveArgs {
    fn run(self) -> Result<()> {
        let mut store = super::open_store()?;
        let id = AlbumId::from(self.id);
        match self.direction {
            Direction::Up => store.move_up(&id, &self.category)?,
            Direction::Down => store.move_down(&id, &self.category)?,
        }
        store.save()?;
        println!("{} Reordered album '{id}'", "✓".green());
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Album identifier.
    pub id: String,
}

impl RemoveArgs {
    fn run(self) -> Result<()> {
        let mut store = super::open_store()?;
        let id = AlbumId::from(self.id);
        store.remove_album(&id)?;
        store.save()?;
        println!("{} Removed album '{id}'", "✓".green());
        Ok(())
    }
}

fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{value}'; expected YYYY-MM-DD"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("invalid date '{value}'"))?;
    Ok(DateTime::from_naive_utc_and_offset(midnight, Utc))
}

#[cfg(test)]
mod tests {
    use super::parse_date;

    #[test]
    fn parses_plain_dates_as_utc_midnight() {
        let parsed = parse_date("2024-06-01").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-06-01T00:00:00+00:00");
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(parse_date("June 1st").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }
}
