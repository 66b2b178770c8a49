//! Unified error type for path resolution, tree search, and rendering.

use std::path::Path;

use thiserror::Error;

/// All failures the browsing and search core can produce.
///
/// The HTTP layer maps each variant to a status code; the core itself never
/// formats responses or logs. `OutOfBounds` and `NotFound` are presented
/// identically to clients so that probing cannot reveal anything about the
/// filesystem outside the root.
#[derive(Error, Debug)]
pub enum BrowseError {
    /// The requested path resolves outside the service root.
    #[error("path escapes the root directory")]
    OutOfBounds,

    /// The resolved path does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The target exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// The target is a directory where a file was expected.
    #[error("is a directory: {0}")]
    IsADirectory(String),

    /// The file exists but is not valid UTF-8 text.
    #[error("not a text file: {0}")]
    NotText(String),

    /// Read or stat failure on an existing path.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BrowseError {
    /// Classifies an I/O error from a stat or read on `path`, turning a
    /// missing file into `NotFound` and anything else into `Io`.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            BrowseError::NotFound(path.display().to_string())
        } else {
            BrowseError::Io(err)
        }
    }
}
