//! Galleria core library — domain types, front matter, slugs, configuration.
//!
//! Public API surface:
//! - [`types`] — newtypes and the album/asset model
//! - [`frontmatter`] — index-file split / parse / render
//! - [`slug`] — title → [`types::AlbumId`] derivation
//! - [`config`] — site configuration and the local data root
//! - [`error`] — [`CoreError`]

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod slug;
pub mod types;

pub use config::{BadgeHashes, Credentials, SiteConfig};
pub use error::CoreError;
pub use types::{Album, AlbumId, AlbumInfo, ImageAsset, ResourceInfo};
