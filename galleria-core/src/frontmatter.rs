//! Front-matter splitting and (de)serialization for album index files.
//!
//! # File format
//!
//! ```text
//! ---
//! title: Summer 2021
//! date: 2021-06-01T00:00:00Z
//! ...
//! ---
//! free-form body text
//! ```
//!
//! The block between the first two `---` delimiter lines is YAML; everything
//! after the closing delimiter is the body, kept verbatim.

use std::path::Path;

use crate::error::CoreError;
use crate::types::AlbumInfo;

const DELIMITER: &str = "---";

/// Split an index document into its raw YAML front matter and body text.
///
/// Fails with [`CoreError::MissingFrontMatter`] when the document does not
/// open with a delimiter line or the closing delimiter is absent. `path` is
/// for error context only.
pub fn split(document: &str, path: &Path) -> Result<(String, String), CoreError> {
    let missing = || CoreError::MissingFrontMatter {
        path: path.to_path_buf(),
    };

    let mut lines = document.split_inclusive('\n');
    let first = lines.next().ok_or_else(missing)?;
    if first.trim_end() != DELIMITER {
        return Err(missing());
    }

    let mut yaml = String::new();
    for line in lines.by_ref() {
        if line.trim_end() == DELIMITER {
            let body: String = lines.collect();
            return Ok((yaml, body));
        }
        yaml.push_str(line);
    }
    Err(missing())
}

/// Parse an index document into its typed front matter and body text.
pub fn parse(document: &str, path: &Path) -> Result<(AlbumInfo, String), CoreError> {
    let (yaml, body) = split(document, path)?;
    let info = serde_yaml::from_str(&yaml).map_err(|e| CoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok((info, body))
}

/// Render an index document: `"---\n" + yaml + "---\n" + body`.
pub fn render(info: &AlbumInfo, body: &str) -> Result<String, CoreError> {
    let mut yaml = serde_yaml::to_string(info)?;
    if !yaml.ends_with('\n') {
        yaml.push('\n');
    }
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{body}"))
}
