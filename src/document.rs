//! Markdown document rendering.
//!
//! A document is converted to HTML with [pulldown-cmark] using the plain
//! CommonMark feature set (no tables, footnotes, or other extensions), then
//! handed to the nearest layout, if there is one.
//!
//! [pulldown-cmark]: https://docs.rs/pulldown-cmark

use crate::layout::{LayoutArgs, LayoutError, LayoutProvider};
use crate::resolve;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd, html as md_html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read document {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to look up layout for {path}: {source}")]
    Resolve {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Final output of a document render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub html: String,
    /// Layout file that wrapped the content, if one was found.
    pub layout: Option<PathBuf>,
}

/// Convert markdown text to HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    md_html::push_html(&mut html, parser);
    html
}

/// Plain text of the first non-empty level-one heading, if any.
///
/// Both `# Title` and setext (`Title\n===`) headings count; a `#` line inside
/// a code block does not. Inline markup is dropped, its text kept.
pub fn first_heading(markdown: &str) -> Option<String> {
    let mut current: Option<String> = None;
    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => current = Some(String::new()),
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                if let Some(text) = current.take() {
                    let text = text.trim();
                    if !text.is_empty() {
                        return Some(text.to_string());
                    }
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(buf) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(buf) = current.as_mut() {
                    buf.push(' ');
                }
            }
            _ => {}
        }
    }
    None
}

/// Render the document at `path`, wrapped in its nearest layout.
pub fn render_document(
    path: &Path,
    layouts: &dyn LayoutProvider,
) -> Result<RenderedDocument, DocumentError> {
    let markdown = fs::read_to_string(path).map_err(|e| DocumentError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let content = markdown_to_html(&markdown);

    let layout = resolve::resolve_nearest(path, layouts.file_name()).map_err(|e| {
        DocumentError::Resolve {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    let Some(layout) = layout else {
        return Ok(RenderedDocument {
            html: content,
            layout: None,
        });
    };

    let title = first_heading(&markdown);
    let args = LayoutArgs {
        content: &content,
        source: path,
        title: title.as_deref(),
    };
    let html = layouts.render(&layout, &args)?;

    Ok(RenderedDocument {
        html,
        layout: Some(layout),
    })
}
