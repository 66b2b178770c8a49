//! Maps user-supplied paths into the service root.
//!
//! This is the only security boundary in the system. Composition is purely
//! lexical: the user path is split on `/`, `.` and empty segments are
//! ignored, and `..` pops one level. Popping past the top means the path
//! would land outside the root and the request is rejected. Because the
//! check runs on the final decoded string (the transport layer has already
//! undone percent-escapes by the time it reaches us), encoding tricks like
//! `%2e%2e` cannot bypass it.

use std::path::{Path, PathBuf};

use crate::error::BrowseError;

/// Resolves `user_path` against `root`.
///
/// An empty path or `"/"` resolves to the root itself. Every segment other
/// than `""`, `"."`, and `".."` is treated as a literal child name, so an
/// absolute-looking path like `"/etc/passwd"` stays inside the root
/// (`root/etc/passwd`) rather than overriding it.
pub fn resolve(root: &Path, user_path: &str) -> Result<PathBuf, BrowseError> {
    let mut resolved = root.to_path_buf();
    let mut depth: usize = 0;

    for segment in user_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if depth == 0 {
                    return Err(BrowseError::OutOfBounds);
                }
                depth -= 1;
                resolved.pop();
            }
            name => {
                depth += 1;
                resolved.push(name);
            }
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn root() -> &'static Path {
        Path::new("/srv/code")
    }

    #[test]
    fn empty_and_slash_resolve_to_root() {
        assert_eq!(resolve(root(), "").unwrap(), root());
        assert_eq!(resolve(root(), "/").unwrap(), root());
    }

    #[test]
    fn plain_child_joins_onto_root() {
        assert_eq!(
            resolve(root(), "sub/b.txt").unwrap(),
            Path::new("/srv/code/sub/b.txt")
        );
    }

    #[test]
    fn dot_segments_and_repeated_slashes_are_ignored() {
        assert_eq!(
            resolve(root(), "./sub//./b.txt").unwrap(),
            Path::new("/srv/code/sub/b.txt")
        );
    }

    #[test]
    fn dotdot_within_bounds_pops_one_level() {
        assert_eq!(
            resolve(root(), "sub/../a.txt").unwrap(),
            Path::new("/srv/code/a.txt")
        );
    }

    #[test]
    fn parent_traversal_is_out_of_bounds() {
        assert!(matches!(
            resolve(root(), "../etc/passwd"),
            Err(BrowseError::OutOfBounds)
        ));
    }

    #[test]
    fn traversal_through_a_real_subdirectory_is_out_of_bounds() {
        assert!(matches!(
            resolve(root(), "sub/../../outside"),
            Err(BrowseError::OutOfBounds)
        ));
    }

    #[test]
    fn absolute_user_path_stays_inside_root() {
        assert_eq!(
            resolve(root(), "/etc/passwd").unwrap(),
            Path::new("/srv/code/etc/passwd")
        );
    }

    #[test]
    fn dotdot_inside_a_filename_is_a_literal_name() {
        assert_eq!(
            resolve(root(), "notes..old").unwrap(),
            Path::new("/srv/code/notes..old")
        );
    }
}
