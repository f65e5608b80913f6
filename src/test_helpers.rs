//! Shared test utilities for the book-binder test suite.
//!
//! Provides tree builders for temp directories and a recording
//! [`LayoutProvider`] so document and pipeline tests can check what a layout
//! was asked to do without parsing templates.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_tree(tmp.path(), &[
//!     ("+layout.html", ""),
//!     ("guide/intro.md", "# Intro"),
//! ]);
//!
//! let layouts = RecordingLayouts::new("+layout.html");
//! // ... render ...
//! assert_eq!(layouts.calls()[0].title.as_deref(), Some("Intro"));
//! ```

use crate::layout::{LayoutArgs, LayoutError, LayoutProvider};
use filetime::FileTime;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use walkdir::WalkDir;

// =========================================================================
// Trees on disk
// =========================================================================

/// Write `files` (relative path, content) below `root`, creating directories.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }
}

/// Read every file below `root` into a sorted map keyed by relative path.
pub fn read_tree(root: &Path) -> BTreeMap<String, String> {
    WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = slash_path(e.path().strip_prefix(root).unwrap());
            let content = fs::read_to_string(e.path()).unwrap();
            (rel, content)
        })
        .collect()
}

/// Relative forward-slash paths of `files` under `root`, in input order.
pub fn relative_paths(files: &[PathBuf], root: &Path) -> Vec<String> {
    files
        .iter()
        .map(|f| slash_path(f.strip_prefix(root).unwrap()))
        .collect()
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Set the modification time of `path` to `secs` since the Unix epoch.
pub fn set_mtime(path: &Path, secs: i64) {
    filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0)).unwrap();
}

// =========================================================================
// Recording layout provider
// =========================================================================

/// One call made to [`RecordingLayouts::render`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCall {
    pub layout: PathBuf,
    pub source: PathBuf,
    pub title: Option<String>,
    pub content: String,
}

/// Layout provider that records its arguments and wraps content in
/// `[layout]...[/layout]` without reading the layout file.
pub struct RecordingLayouts {
    file_name: String,
    fail: bool,
    calls: Mutex<Vec<LayoutCall>>,
}

impl RecordingLayouts {
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose every render fails with [`LayoutError::Failed`].
    pub fn failing(file_name: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(file_name)
        }
    }

    pub fn calls(&self) -> Vec<LayoutCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl LayoutProvider for RecordingLayouts {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn render(&self, layout: &Path, args: &LayoutArgs<'_>) -> Result<String, LayoutError> {
        self.calls.lock().unwrap().push(LayoutCall {
            layout: layout.to_path_buf(),
            source: args.source.to_path_buf(),
            title: args.title.map(str::to_string),
            content: args.content.to_string(),
        });
        if self.fail {
            return Err(LayoutError::Failed {
                path: layout.to_path_buf(),
                message: "layout refused to render".into(),
            });
        }
        Ok(format!("[layout]{}[/layout]", args.content))
    }
}
