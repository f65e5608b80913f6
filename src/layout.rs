//! Layout wrapping for rendered documents.
//!
//! A layout turns a document's rendered HTML into a complete page. Layouts
//! are special files (`+` prefix) found by walking up from the document, see
//! [`crate::resolve`]. How a layout file becomes a rendering function is up to
//! the [`LayoutProvider`] the caller injects into the build.
//!
//! # Calling Convention
//!
//! Every provider receives the same structured argument, [`LayoutArgs`]:
//!
//! - `content`: the rendered HTML of the document
//! - `source`: path of the document being rendered
//! - `title`: text of the document's first level-one heading, if any
//!
//! # Template Layouts
//!
//! The shipped provider, [`TemplateLayouts`], treats the layout file as a
//! [minijinja](https://docs.rs/minijinja) template:
//!
//! ```html
//! <!doctype html>
//! <html>
//!   <head><title>{{ title or "Untitled" }}</title></head>
//!   <body>{{ content }}</body>
//! </html>
//! ```
//!
//! `content` is inserted verbatim. `source` and `title` are HTML-escaped.
//! The template is read and parsed again for every document.

use minijinja::{Environment, Value, context};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default layout file name looked up next to (or above) each document.
pub const DEFAULT_LAYOUT_FILE: &str = "+layout.html";

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Failed to read layout {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Layout {path} failed: {source}")]
    Template {
        path: PathBuf,
        source: minijinja::Error,
    },
    #[error("Layout {path} failed: {message}")]
    Failed { path: PathBuf, message: String },
}

/// Structured argument handed to every layout.
#[derive(Debug, Clone, Copy)]
pub struct LayoutArgs<'a> {
    pub content: &'a str,
    pub source: &'a Path,
    pub title: Option<&'a str>,
}

/// Capability that knows how to apply a layout file.
pub trait LayoutProvider {
    /// File name searched for in the document's ancestor directories.
    fn file_name(&self) -> &str;

    /// Wrap `args.content` using the layout stored at `layout`.
    fn render(&self, layout: &Path, args: &LayoutArgs<'_>) -> Result<String, LayoutError>;
}

/// Renders layout files as minijinja templates.
#[derive(Debug, Clone)]
pub struct TemplateLayouts {
    file_name: String,
}

impl TemplateLayouts {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

impl Default for TemplateLayouts {
    fn default() -> Self {
        Self::new(DEFAULT_LAYOUT_FILE)
    }
}

impl LayoutProvider for TemplateLayouts {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn render(&self, layout: &Path, args: &LayoutArgs<'_>) -> Result<String, LayoutError> {
        let source = fs::read_to_string(layout).map_err(|e| LayoutError::Read {
            path: layout.to_path_buf(),
            source: e,
        })?;
        let template_error = |e: minijinja::Error| LayoutError::Template {
            path: layout.to_path_buf(),
            source: e,
        };

        // Registered under the file name so `.html` layouts get HTML auto-escaping.
        let mut env = Environment::new();
        env.add_template(&self.file_name, &source)
            .map_err(template_error)?;
        let template = env.get_template(&self.file_name).map_err(template_error)?;

        template
            .render(context! {
                content => Value::from_safe_string(args.content.to_string()),
                source => args.source.display().to_string(),
                title => args.title,
            })
            .map_err(template_error)
    }
}
