//! Typed errors for the curation stages.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurateError {
    /// An input file or folder the caller named does not exist.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to parse {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid file pattern: {0}")]
    Pattern(#[from] globset::Error),
}

pub type CurateResult<T> = std::result::Result<T, CurateError>;
