//! Deterministic depth-first traversal of the source tree.
//!
//! Entries are visited in lexicographic order within each directory so that
//! repeated searches over an unchanged tree produce identical match
//! ordering. Version-control metadata (`.git`) is pruned by exact path
//! segment match, and callers may layer additional exclude globs on top.

use std::ffi::OsStr;
use std::path::Path;

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::{DirEntry, WalkDir};

/// Name of the version-control metadata directory pruned from every walk.
pub const VCS_DIR: &str = ".git";

/// Walks `root` depth-first, lexicographically sorted per directory.
///
/// Each call produces an independent traversal. Any entry whose final path
/// segment equals [`VCS_DIR`] is skipped (directories are pruned, so nothing
/// below them is visited), as is any entry whose root-relative path matches
/// `excludes`. A file that merely *contains* `.git` in its name, like
/// `not.git.txt`, is kept.
pub fn walk(root: &Path, excludes: &GlobSet) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
    let root = root.to_path_buf();
    let excludes = excludes.clone();
    WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| !is_excluded(&root, entry, &excludes))
}

fn is_excluded(root: &Path, entry: &DirEntry, excludes: &GlobSet) -> bool {
    // Never prune the root itself, even if its own name is `.git`.
    if entry.depth() == 0 {
        return false;
    }
    if entry.file_name() == OsStr::new(VCS_DIR) {
        return true;
    }
    let rel = entry.path().strip_prefix(root).unwrap_or_else(|_| entry.path());
    excludes.is_match(rel)
}

/// Builds the exclude set from user-supplied glob patterns.
///
/// Patterns are matched against root-relative paths, e.g. `target/**` or
/// `**/*.o`. An empty pattern list produces a set that matches nothing.
pub fn build_excludes(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn rel_files(root: &Path, excludes: &GlobSet) -> Vec<String> {
        walk(root, excludes)
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                e.path()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn files_come_back_sorted_and_recursive() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.txt"), "b").unwrap();
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub").join("c.txt"), "c").unwrap();

        let files = rel_files(tmp.path(), &GlobSet::empty());
        assert_eq!(files, vec!["a.txt", "b.txt", "sub/c.txt"]);
    }

    #[test]
    fn git_directory_is_pruned_by_segment_match() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        fs::write(tmp.path().join(".git").join("HEAD"), "ref").unwrap();
        fs::write(tmp.path().join("not.git.txt"), "kept").unwrap();
        fs::write(tmp.path().join("code.rs"), "fn main() {}").unwrap();

        let files = rel_files(tmp.path(), &GlobSet::empty());
        assert_eq!(files, vec!["code.rs", "not.git.txt"]);
    }

    #[test]
    fn nested_git_directories_are_pruned_too() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("vendor").join(".git")).unwrap();
        fs::write(
            tmp.path().join("vendor").join(".git").join("config"),
            "x",
        )
        .unwrap();
        fs::write(tmp.path().join("vendor").join("lib.rs"), "y").unwrap();

        let files = rel_files(tmp.path(), &GlobSet::empty());
        assert_eq!(files, vec!["vendor/lib.rs"]);
    }

    #[test]
    fn user_excludes_match_relative_paths() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("target")).unwrap();
        fs::write(tmp.path().join("target").join("out.o"), "o").unwrap();
        fs::write(tmp.path().join("main.rs"), "m").unwrap();

        let excludes = build_excludes(&["target/**".to_string()]).unwrap();
        let files = rel_files(tmp.path(), &excludes);
        assert_eq!(files, vec!["main.rs"]);
    }

    #[test]
    fn two_walks_yield_identical_order() {
        let tmp = TempDir::new().unwrap();
        for name in ["z.txt", "m.txt", "a.txt"] {
            fs::write(tmp.path().join(name), name).unwrap();
        }
        let first = rel_files(tmp.path(), &GlobSet::empty());
        let second = rel_files(tmp.path(), &GlobSet::empty());
        assert_eq!(first, second);
    }
}
