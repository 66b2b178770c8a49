//! Line matching and whole-tree search.
//!
//! [`match_lines`] scans one file's content for a literal substring;
//! [`search_tree`] drives the tree walker across every file under the root
//! and aggregates the results in traversal order.

use std::path::Path;

use globset::GlobSet;

use crate::error::BrowseError;
use crate::walk;

/// One matching line with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Path relative to the search root, `/`-separated.
    pub rel_path: String,
    /// 1-based line number.
    pub line_number: usize,
    /// The original line text, unmodified. Carriage returns are not
    /// stripped; only `\n` delimits lines.
    pub line_text: String,
}

/// All matches for one pattern across the tree.
///
/// Ordering is tree-walk order, then line order within each file. There is
/// no deduplication, ranking, or size limit.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub pattern: String,
    pub root_label: String,
    pub matches: Vec<Match>,
}

/// Scans `content` for lines containing `pattern`.
///
/// Content is split on `'\n'` only. Numbering is 1-based and counts the
/// empty segment after a trailing newline as a line, so `"a\n"` has two
/// lines; the empty one can never contain a non-empty pattern. The test is
/// literal, case-sensitive substring containment.
///
/// An empty pattern matches every line. The HTTP layer short-circuits an
/// empty query to the landing view, so this only arises for direct callers.
pub fn match_lines<'a>(content: &'a str, pattern: &str) -> Vec<(usize, &'a str)> {
    content
        .split('\n')
        .enumerate()
        .filter(|(_, line)| line.contains(pattern))
        .map(|(i, line)| (i + 1, line))
        .collect()
}

/// Searches every file under `root` for `pattern`.
///
/// First-error-aborts: one unreadable or non-UTF-8 file fails the whole
/// search rather than producing a partial result.
pub fn search_tree(
    root: &Path,
    pattern: &str,
    excludes: &GlobSet,
) -> Result<SearchResult, BrowseError> {
    let mut matches = Vec::new();

    for entry in walk::walk(root, excludes) {
        let entry = entry.map_err(|e| BrowseError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel_path = entry
            .path()
            .strip_prefix(root)
            .unwrap_or_else(|_| entry.path())
            .to_string_lossy()
            .to_string();

        let content = std::fs::read_to_string(entry.path()).map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                BrowseError::NotText(rel_path.clone())
            } else {
                BrowseError::Io(e)
            }
        })?;

        for (line_number, line_text) in match_lines(&content, pattern) {
            matches.push(Match {
                rel_path: rel_path.clone(),
                line_number,
                line_text: line_text.to_string(),
            });
        }
    }

    Ok(SearchResult {
        pattern: pattern.to_string(),
        root_label: root.display().to_string(),
        matches,
    })
}
