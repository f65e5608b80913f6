//! Style sheet loading with recursive import inlining.
//!
//! Every style source that reaches the output is a single self-contained
//! file. Import directives of the exact form
//!
//! ```text
//! @import "relative/path.css";
//! ```
//!
//! are replaced by the content of the file they name. The path is resolved
//! against the directory of the file containing the directive, so a fragment
//! can be moved together with whatever it imports without touching the entry
//! file. Any other import form (single quotes, `url()`, media queries, several
//! targets) is left for the compiler or the browser.
//!
//! ## Precompiled Syntax
//!
//! `.scss` files are compiled to CSS with [grass](https://docs.rs/grass)
//! after their imports have been expanded:
//!
//! | Importer | Import target | Spliced text |
//! |----------|---------------|--------------|
//! | `.scss` | `.scss` or `.css` | target source, imports expanded |
//! | `.css` | `.css` | target source, imports expanded |
//! | `.css` | `.scss` | target compiled to CSS |
//!
//! Expanding before compiling lets an entry file use variables and mixins
//! declared in `_fragments`.
//!
//! Import forms the inliner leaves alone (`@use`, `@import 'x'`) are resolved
//! by grass. Its load paths are the directories of the entry file and of every
//! fragment spliced into it, searched in that order, so such an import found
//! in a fragment from another directory still resolves next to that fragment.
//! When two of those directories hold a file with the same name, the one
//! closer to the entry file wins.
//!
//! ## Cycles
//!
//! The loader keeps the chain of files currently being expanded. Importing a
//! file that is already on the chain fails with
//! [`StyleError::CircularImport`]. Importing the same fragment from two
//! unrelated places is fine; it is simply read twice.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

static IMPORT_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"@import "([^"\r\n]*)";"#).expect("valid import regex"));

#[derive(Error, Debug)]
pub enum StyleError {
    #[error("Failed to read style sheet {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to compile {path}: {message}")]
    Compile { path: PathBuf, message: String },
    #[error("Circular import of {path} (import chain: {})", format_chain(.chain))]
    CircularImport { path: PathBuf, chain: Vec<PathBuf> },
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Output style handed to the SCSS compiler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    #[default]
    Compressed,
    Expanded,
}

impl From<OutputStyle> for grass::OutputStyle {
    fn from(style: OutputStyle) -> Self {
        match style {
            OutputStyle::Compressed => grass::OutputStyle::Compressed,
            OutputStyle::Expanded => grass::OutputStyle::Expanded,
        }
    }
}

/// Returns true for style sources that need compiling (`.scss`).
pub fn is_precompiled(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("scss"))
        .unwrap_or(false)
}

/// Loads style sheets, inlining imports and compiling SCSS.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleLoader {
    style: OutputStyle,
}

/// One file on the current import chain.
struct ChainEntry {
    /// Canonical path, used for cycle detection.
    key: PathBuf,
    /// Path as written, used in error messages.
    display: PathBuf,
}

impl StyleLoader {
    pub fn new(style: OutputStyle) -> Self {
        Self { style }
    }

    /// Load `path` as a finished, self-contained style sheet.
    pub fn load(&self, path: &Path) -> Result<String, StyleError> {
        let mut chain = Vec::new();
        self.load_finished(path, &mut chain)
    }

    fn load_finished(&self, path: &Path, chain: &mut Vec<ChainEntry>) -> Result<String, StyleError> {
        let mut dirs = Vec::new();
        let expanded = self.expand(path, chain, &mut dirs)?;
        if is_precompiled(path) {
            self.compile(path, &expanded, &dirs)
        } else {
            Ok(expanded)
        }
    }

    /// Read `path` and replace its import directives, recursively.
    ///
    /// The directory of every file spliced into the result is appended to
    /// `dirs`, entry file first.
    fn expand(
        &self,
        path: &Path,
        chain: &mut Vec<ChainEntry>,
        dirs: &mut Vec<PathBuf>,
    ) -> Result<String, StyleError> {
        let source = fs::read_to_string(path).map_err(|e| StyleError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        // The read succeeded, so the path exists and can be canonicalized.
        let key = fs::canonicalize(path).map_err(|e| StyleError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        if chain.iter().any(|entry| entry.key == key) {
            let mut names: Vec<PathBuf> = chain.iter().map(|e| e.display.clone()).collect();
            names.push(path.to_path_buf());
            return Err(StyleError::CircularImport {
                path: path.to_path_buf(),
                chain: names,
            });
        }
        chain.push(ChainEntry {
            key,
            display: path.to_path_buf(),
        });

        let base_dir = path.parent().unwrap_or(Path::new(""));
        if !dirs.iter().any(|d| d == base_dir) {
            dirs.push(base_dir.to_path_buf());
        }
        let importer_precompiled = is_precompiled(path);

        let mut result = String::with_capacity(source.len());
        let mut last = 0;
        for caps in IMPORT_DIRECTIVE.captures_iter(&source) {
            let Some(directive) = caps.get(0) else {
                continue;
            };
            let target = base_dir.join(&caps[1]);

            tracing::debug!(
                importer = %path.display(),
                target = %target.display(),
                "Inlining import"
            );

            let inlined = if importer_precompiled {
                self.expand(&target, chain, dirs)?
            } else {
                self.load_finished(&target, chain)?
            };

            result.push_str(&source[last..directive.start()]);
            result.push_str(&inlined);
            last = directive.end();
        }
        result.push_str(&source[last..]);

        chain.pop();
        Ok(result)
    }

    /// Compile expanded SCSS. `load_dirs` lets Sass-native imports left in
    /// any spliced file resolve next to that file.
    fn compile(&self, path: &Path, scss: &str, load_dirs: &[PathBuf]) -> Result<String, StyleError> {
        let options = grass::Options::default()
            .style(self.style.into())
            .load_paths(load_dirs);

        grass::from_string(scss.to_owned(), &options).map_err(|e| StyleError::Compile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
