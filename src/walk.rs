//! Depth-first enumeration of the input tree.
//!
//! The walker is a lazy iterator over regular files below a root directory.
//! It never collects the tree up front: each call to `next` advances the
//! underlying [`walkdir`] traversal by as much as it needs to find the next
//! matching file.
//!
//! ## Reserved Prefixes
//!
//! Base names starting with `_` or `+` are reserved:
//!
//! ```text
//! content/
//! ├── index.md            # walked
//! ├── +layout.html        # special file, never walked
//! ├── +config.toml        # special file, never walked
//! └── styles/
//!     ├── main.scss       # walked
//!     └── _vars.scss      # private fragment, never walked
//! ```
//!
//! The rule is applied to files through [`is_reserved`]. Directories are only
//! pruned when [`Walker::prune_reserved_dirs`] is enabled; by default a
//! directory named `_drafts` is still descended into and only its reserved
//! files are skipped.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Base-name prefixes that mark a file as non-emittable.
pub const RESERVED_PREFIXES: &[char] = &['_', '+'];

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Failed to list directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Returns true if the base name of `path` starts with a reserved prefix.
///
/// Paths without a base name (`/`, `..`) are never reserved.
pub fn is_reserved(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with(RESERVED_PREFIXES))
        .unwrap_or(false)
}

/// Lazy depth-first sequence of regular files under a root.
///
/// Created by [`enumerate`]. Once consumed it cannot be replayed; call
/// [`enumerate`] again for a fresh traversal.
pub struct Walker {
    entries: walkdir::IntoIter,
    filter: Option<Box<dyn FnMut(&Path) -> bool>>,
    prune_reserved_dirs: bool,
}

/// Start a traversal of `root`. No filter, no directory pruning.
pub fn enumerate(root: &Path) -> Walker {
    Walker {
        entries: WalkDir::new(root).sort_by_file_name().into_iter(),
        filter: None,
        prune_reserved_dirs: false,
    }
}

impl Walker {
    /// Only yield files for which `filter` returns true.
    pub fn with_filter(mut self, filter: impl FnMut(&Path) -> bool + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Skip whole directories whose base name carries a reserved prefix.
    ///
    /// The root directory itself is never pruned.
    pub fn prune_reserved_dirs(mut self, prune: bool) -> Self {
        self.prune_reserved_dirs = prune;
        self
    }
}

impl Iterator for Walker {
    type Item = Result<PathBuf, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                if self.prune_reserved_dirs && entry.depth() > 0 && is_reserved(entry.path()) {
                    tracing::debug!(path = %entry.path().display(), "Pruning reserved directory");
                    self.entries.skip_current_dir();
                }
                continue;
            }

            // Symlinks are not followed, so anything that isn't a plain file is skipped.
            if !file_type.is_file() {
                continue;
            }

            let keep = match self.filter.as_mut() {
                Some(filter) => filter(entry.path()),
                None => true,
            };
            if keep {
                return Some(Ok(entry.into_path()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{relative_paths, write_tree};
    use tempfile::TempDir;

    fn walk_all(walker: Walker, root: &Path) -> Vec<String> {
        let files: Vec<PathBuf> = walker.collect::<Result<_, _>>().unwrap();
        let mut rel = relative_paths(&files, root);
        rel.sort();
        rel
    }

    #[test]
    fn reserved_prefixes() {
        assert!(is_reserved(Path::new("styles/_vars.scss")));
        assert!(is_reserved(Path::new("+layout.html")));
        assert!(is_reserved(Path::new("/a/b/_drafts")));
        assert!(!is_reserved(Path::new("index.md")));
        assert!(!is_reserved(Path::new("_dir/index.md")));
        assert!(!is_reserved(Path::new("a+b.css")));
        assert!(!is_reserved(Path::new("/")));
    }

    #[test]
    fn yields_every_file_once() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[
                ("index.md", "# Home"),
                ("a/one.txt", "1"),
                ("a/b/two.txt", "2"),
                ("a/b/c/three.txt", "3"),
                ("z.css", "body{}"),
            ],
        );

        let files = walk_all(enumerate(tmp.path()), tmp.path());
        assert_eq!(
            files,
            vec![
                "a/b/c/three.txt",
                "a/b/two.txt",
                "a/one.txt",
                "index.md",
                "z.css"
            ]
        );
    }

    #[test]
    fn directories_are_not_yielded() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("only/file.txt", "x")]);
        std::fs::create_dir_all(tmp.path().join("empty/nested")).unwrap();

        let files = walk_all(enumerate(tmp.path()), tmp.path());
        assert_eq!(files, vec!["only/file.txt"]);
    }

    #[test]
    fn filter_applies_to_files_only() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[
                ("index.md", ""),
                ("+layout.html", ""),
                ("styles/_vars.scss", ""),
                ("styles/main.scss", ""),
                ("_drafts/wip.md", ""),
            ],
        );

        let walker = enumerate(tmp.path()).with_filter(|p| !is_reserved(p));
        let files = walk_all(walker, tmp.path());
        assert_eq!(files, vec!["_drafts/wip.md", "index.md", "styles/main.scss"]);
    }

    #[test]
    fn pruning_skips_reserved_directories() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[
                ("index.md", ""),
                ("_drafts/wip.md", ""),
                ("_drafts/deeper/more.md", ""),
                ("+special/thing.txt", ""),
            ],
        );

        let walker = enumerate(tmp.path())
            .with_filter(|p| !is_reserved(p))
            .prune_reserved_dirs(true);
        let files = walk_all(walker, tmp.path());
        assert_eq!(files, vec!["index.md"]);
    }

    #[test]
    fn root_is_never_pruned() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("_site");
        write_tree(&root, &[("index.md", "")]);

        let files = walk_all(enumerate(&root).prune_reserved_dirs(true), &root);
        assert_eq!(files, vec!["index.md"]);
    }

    #[test]
    fn second_enumeration_is_a_fresh_traversal() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("a.txt", "")]);

        let mut first = enumerate(tmp.path());
        assert!(first.next().is_some());
        assert!(first.next().is_none());

        write_tree(tmp.path(), &[("b.txt", "")]);
        let files = walk_all(enumerate(tmp.path()), tmp.path());
        assert_eq!(files, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let mut walker = enumerate(&tmp.path().join("nope"));
        assert!(matches!(walker.next(), Some(Err(WalkError::Walk(_)))));
    }
}
