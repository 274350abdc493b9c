//! Error types for galleria-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from domain-model and configuration operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An index file without the two `---` front-matter delimiter lines.
    #[error("no front-matter block in {path}")]
    MissingFrontMatter { path: PathBuf },

    /// Slug derivation produced an empty identifier — the title has no
    /// representable characters. Rejected before any disk mutation.
    #[error("title '{title}' yields an empty slug")]
    EmptySlug { title: String },

    /// `dirs::home_dir()` returned `None` — cannot locate the data root.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// The site configuration file did not exist at the expected path.
    #[error("site configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },
}
