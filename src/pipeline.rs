//! Transform dispatch over the input tree.
//!
//! The pipeline walks the input root, picks exactly one transform per file and
//! writes the result to the mirrored location under the output root:
//!
//! ```text
//! content/                         dist/
//! ├── +config.toml                 │        (special, never emitted)
//! ├── +layout.html                 │        (special, never emitted)
//! ├── index.md            ──────►  ├── index.html
//! ├── styles/                      ├── styles/
//! │   ├── main.scss       ──────►  │   └── main.css
//! │   └── _vars.scss               │        (fragment, inlined into main.css)
//! └── img/                         └── img/
//!     └── cover.jpg       ──────►      └── cover.jpg
//! ```
//!
//! ## Transform Table
//!
//! Extension sets are checked in order; the first set containing the file's
//! extension wins. Files matching no set are copied incrementally.
//!
//! | Extensions | Transform | Output extension |
//! |------------|-----------|------------------|
//! | `css`, `scss` | [`Transform::Style`] | `css` |
//! | `md` | [`Transform::Document`] | `html` |
//! | anything else | [`Transform::Copy`] | unchanged |
//!
//! ## Failure
//!
//! There is no partial success: the first failing file aborts the build and
//! its error is returned. The library never exits the process; callers turn
//! the result into a [`BuildStatus`].

use crate::config::BinderConfig;
use crate::copy::{self, CopyOutcome};
use crate::document::{self, DocumentError};
use crate::layout::LayoutProvider;
use crate::style::{StyleError, StyleLoader};
use crate::walk::{self, WalkError};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateOutput {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Output directory {path} is the input directory")]
    SameRoot { path: PathBuf },
    #[error(transparent)]
    Walk(#[from] WalkError),
    #[error("{path} is not inside the input root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to copy {input} to {output}: {source}")]
    Copy {
        input: PathBuf,
        output: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Style(#[from] StyleError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// The transform applied to one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Inline imports, compile SCSS, write `.css`.
    Style,
    /// Markdown to HTML, wrapped in the nearest layout, write `.html`.
    Document,
    /// Verbatim copy, skipped when the output is newer.
    Copy,
}

/// Ordered transform table. The fallback, [`Transform::Copy`], is not listed.
pub const TRANSFORMS: &[(&[&str], Transform)] = &[
    (&["css", "scss"], Transform::Style),
    (&["md"], Transform::Document),
];

impl Transform {
    /// Extension written by this transform, or `None` to keep the input's.
    pub fn output_extension(self) -> Option<&'static str> {
        match self {
            Transform::Style => Some("css"),
            Transform::Document => Some("html"),
            Transform::Copy => None,
        }
    }
}

/// Pick the transform for `path`: first matching extension set, else copy.
pub fn select_transform(path: &Path) -> Transform {
    let Some(ext) = path.extension().map(|e| e.to_string_lossy()) else {
        return Transform::Copy;
    };
    TRANSFORMS
        .iter()
        .find(|(extensions, _)| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .map(|(_, transform)| *transform)
        .unwrap_or(Transform::Copy)
}

/// Map an input file to its location under the output root.
pub fn output_path(
    input_root: &Path,
    output_root: &Path,
    input_file: &Path,
    transform: Transform,
) -> Result<PathBuf, BuildError> {
    let relative = input_file
        .strip_prefix(input_root)
        .map_err(|_| BuildError::OutsideRoot {
            path: input_file.to_path_buf(),
            root: input_root.to_path_buf(),
        })?;
    let mut output = output_root.join(relative);
    if let Some(ext) = transform.output_extension() {
        output.set_extension(ext);
    }
    Ok(output)
}

/// One processed file, streamed to the optional event channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    Styled {
        input: PathBuf,
        output: PathBuf,
    },
    Rendered {
        input: PathBuf,
        output: PathBuf,
        layout: Option<PathBuf>,
    },
    Copied {
        input: PathBuf,
        output: PathBuf,
    },
    UpToDate {
        input: PathBuf,
        output: PathBuf,
    },
}

/// Counts per outcome for a finished build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub styled: usize,
    pub rendered: usize,
    pub copied: usize,
    pub up_to_date: usize,
}

impl BuildReport {
    pub fn total(&self) -> usize {
        self.styled + self.rendered + self.copied + self.up_to_date
    }

    fn record(&mut self, event: &BuildEvent) {
        match event {
            BuildEvent::Styled { .. } => self.styled += 1,
            BuildEvent::Rendered { .. } => self.rendered += 1,
            BuildEvent::Copied { .. } => self.copied += 1,
            BuildEvent::UpToDate { .. } => self.up_to_date += 1,
        }
    }
}

/// Outcome of a whole invocation, independent of how it is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    /// Every file was processed.
    Success,
    /// Missing arguments or invalid configuration; nothing was built.
    Usage,
    /// A file failed and the build was aborted.
    Failed,
}

impl BuildStatus {
    pub fn from_result<T>(result: &Result<T, BuildError>) -> Self {
        match result {
            Ok(_) => BuildStatus::Success,
            Err(_) => BuildStatus::Failed,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            BuildStatus::Success => 0,
            BuildStatus::Usage => 1,
            BuildStatus::Failed => 2,
        }
    }
}

impl From<BuildStatus> for ExitCode {
    fn from(status: BuildStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Build `input_root` into `output_root`.
pub fn build(
    input_root: &Path,
    output_root: &Path,
    config: &BinderConfig,
    layouts: &dyn LayoutProvider,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, BuildError> {
    fs::create_dir_all(output_root).map_err(|e| BuildError::CreateOutput {
        path: output_root.to_path_buf(),
        source: e,
    })?;
    reject_same_root(input_root, output_root)?;

    let styles = StyleLoader::new(config.styles.output_style);
    let incremental = config.copy.incremental;
    let nested_output = nested_output_dir(input_root, output_root);

    tracing::info!(
        input = %input_root.display(),
        output = %output_root.display(),
        "Building"
    );

    let walker = walk::enumerate(input_root)
        .with_filter(move |path| {
            !walk::is_reserved(path)
                && nested_output
                    .as_ref()
                    .is_none_or(|out| !path.starts_with(out))
        })
        .prune_reserved_dirs(config.walk.prune_reserved_dirs);

    let mut report = BuildReport::default();
    for input in walker {
        let input = input?;
        let transform = select_transform(&input);
        let output = output_path(input_root, output_root, &input, transform)?;
        ensure_parent(&output)?;

        let event = match transform {
            Transform::Style => {
                let css = styles.load(&input)?;
                write_output(&output, &css)?;
                BuildEvent::Styled { input, output }
            }
            Transform::Document => {
                let rendered = document::render_document(&input, layouts)?;
                write_output(&output, &rendered.html)?;
                BuildEvent::Rendered {
                    input,
                    output,
                    layout: rendered.layout,
                }
            }
            Transform::Copy => {
                let outcome = if incremental {
                    copy::copy_if_stale(&input, &output)
                } else {
                    copy::copy_always(&input, &output)
                };
                match outcome {
                    Ok(CopyOutcome::Copied) => BuildEvent::Copied { input, output },
                    Ok(CopyOutcome::UpToDate) => BuildEvent::UpToDate { input, output },
                    Err(e) => {
                        return Err(BuildError::Copy {
                            input,
                            output,
                            source: e,
                        });
                    }
                }
            }
        };

        report.record(&event);
        if let Some(tx) = &events {
            // A dropped receiver only means nobody is listening.
            let _ = tx.send(event);
        }
    }

    tracing::info!(files = report.total(), "Build finished");
    Ok(report)
}

/// Building into the input root would overwrite every source in place.
///
/// A missing input root is left for the walker to report.
fn reject_same_root(input_root: &Path, output_root: &Path) -> Result<(), BuildError> {
    let Ok(input) = fs::canonicalize(input_root) else {
        return Ok(());
    };
    let output = fs::canonicalize(output_root).map_err(|e| BuildError::CreateOutput {
        path: output_root.to_path_buf(),
        source: e,
    })?;
    if input == output {
        return Err(BuildError::SameRoot {
            path: output_root.to_path_buf(),
        });
    }
    Ok(())
}

/// The output root's canonical path when it lies inside the input root.
///
/// Walked paths are compared against it so a build into `content/_site` or
/// `content/dist` never reads its own output.
fn nested_output_dir(input_root: &Path, output_root: &Path) -> Option<PathBuf> {
    let input = fs::canonicalize(input_root).ok()?;
    let output = fs::canonicalize(output_root).ok()?;
    if !output.starts_with(&input) || output == input {
        return None;
    }
    // Walked paths are rooted at `input_root` as given, not canonicalized.
    let relative = output.strip_prefix(&input).ok()?;
    Some(input_root.join(relative))
}

fn ensure_parent(path: &Path) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

fn write_output(path: &Path, content: &str) -> Result<(), BuildError> {
    fs::write(path, content).map_err(|e| BuildError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
