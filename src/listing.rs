//! Target access for browse views: directory listing and file reading.

use std::path::Path;

use crate::error::BrowseError;

/// One immediate child of a browsed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirChild {
    /// The child's name, not its full path.
    pub name: String,
    /// Whether the child is itself a directory, so views can render it as a
    /// folder link.
    pub is_dir: bool,
}

/// Lists the immediate children of `abs`, sorted by name.
///
/// Directories and files come back mixed; sorting makes the listing
/// deterministic. Fails with `NotADirectory` when `abs` is a file and
/// `NotFound`/`Io` when it cannot be read.
pub fn list_dir(abs: &Path) -> Result<Vec<DirChild>, BrowseError> {
    let meta = std::fs::metadata(abs).map_err(|e| BrowseError::from_io(abs, e))?;
    if !meta.is_dir() {
        return Err(BrowseError::NotADirectory(abs.display().to_string()));
    }

    let mut children = Vec::new();
    for entry in std::fs::read_dir(abs)? {
        let entry = entry?;
        let is_dir = entry.file_type()?.is_dir();
        children.push(DirChild {
            name: entry.file_name().to_string_lossy().to_string(),
            is_dir,
        });
    }
    children.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(children)
}

/// Reads a file target for rendering.
///
/// The mirror of [`list_dir`]: fails with `IsADirectory` when handed a
/// directory, `NotText` when the content is not valid UTF-8, and
/// `NotFound`/`Io` otherwise.
pub fn read_source(abs: &Path) -> Result<String, BrowseError> {
    let meta = std::fs::metadata(abs).map_err(|e| BrowseError::from_io(abs, e))?;
    if meta.is_dir() {
        return Err(BrowseError::IsADirectory(abs.display().to_string()));
    }
    std::fs::read_to_string(abs).map_err(|e| {
        if e.kind() == std::io::ErrorKind::InvalidData {
            BrowseError::NotText(abs.display().to_string())
        } else {
            BrowseError::Io(e)
        }
    })
}
