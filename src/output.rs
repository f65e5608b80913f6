//! CLI output formatting for a build.
//!
//! # Output Format
//!
//! ```text
//! 📖 Book Binder 📖
//! Input: content
//! Output: dist
//!
//! img/cover.jpg → img/cover.jpg (up to date)
//! index.md → index.html
//!     Layout: +layout.html
//! styles/main.scss → styles/main.css
//!
//! Built 3 files: 1 style sheet, 1 document, 0 copied, 1 up to date
//! ```
//!
//! Paths are shown relative to their root. Anything that cannot be made
//! relative is shown as given.
//!
//! # Architecture
//!
//! Each piece has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::pipeline::{BuildEvent, BuildReport};
use std::path::Path;

fn relative<'a>(path: &'a Path, root: &Path) -> std::path::Display<'a> {
    path.strip_prefix(root).unwrap_or(path).display()
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

// ============================================================================
// Banner
// ============================================================================

pub fn format_banner(input_root: &Path, output_root: &Path) -> Vec<String> {
    vec![
        "📖 Book Binder 📖".to_string(),
        format!("Input: {}", input_root.display()),
        format!("Output: {}", output_root.display()),
    ]
}

pub fn print_banner(input_root: &Path, output_root: &Path) {
    for line in format_banner(input_root, output_root) {
        println!("{}", line);
    }
    println!();
}

// ============================================================================
// Per-file events
// ============================================================================

/// Lines for one processed file: `in → out`, plus the layout for documents.
pub fn format_build_event(event: &BuildEvent, input_root: &Path, output_root: &Path) -> Vec<String> {
    let arrow = |input: &Path, output: &Path| {
        format!(
            "{} → {}",
            relative(input, input_root),
            relative(output, output_root)
        )
    };

    match event {
        BuildEvent::Styled { input, output } | BuildEvent::Copied { input, output } => {
            vec![arrow(input, output)]
        }
        BuildEvent::UpToDate { input, output } => {
            vec![format!("{} (up to date)", arrow(input, output))]
        }
        BuildEvent::Rendered {
            input,
            output,
            layout,
        } => {
            let mut lines = vec![arrow(input, output)];
            if let Some(layout) = layout {
                lines.push(format!("    Layout: {}", relative(layout, input_root)));
            }
            lines
        }
    }
}

// ============================================================================
// Summary
// ============================================================================

pub fn format_summary(report: &BuildReport) -> Vec<String> {
    vec![format!(
        "Built {}: {}, {}, {} copied, {} up to date",
        plural(report.total(), "file", "files"),
        plural(report.styled, "style sheet", "style sheets"),
        plural(report.rendered, "document", "documents"),
        report.copied,
        report.up_to_date,
    )]
}

pub fn print_summary(report: &BuildReport) {
    println!();
    for line in format_summary(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn roots() -> (PathBuf, PathBuf) {
        (PathBuf::from("/site/content"), PathBuf::from("/site/dist"))
    }

    #[test]
    fn banner_lines() {
        let lines = format_banner(Path::new("content"), Path::new("dist"));
        assert_eq!(lines, vec!["📖 Book Binder 📖", "Input: content", "Output: dist"]);
    }

    #[test]
    fn styled_event_shows_relative_paths() {
        let (input, output) = roots();
        let event = BuildEvent::Styled {
            input: input.join("styles/main.scss"),
            output: output.join("styles/main.css"),
        };
        assert_eq!(
            format_build_event(&event, &input, &output),
            vec!["styles/main.scss → styles/main.css"]
        );
    }

    #[test]
    fn rendered_event_with_layout() {
        let (input, output) = roots();
        let event = BuildEvent::Rendered {
            input: input.join("guide/intro.md"),
            output: output.join("guide/intro.html"),
            layout: Some(input.join("+layout.html")),
        };
        assert_eq!(
            format_build_event(&event, &input, &output),
            vec!["guide/intro.md → guide/intro.html", "    Layout: +layout.html"]
        );
    }

    #[test]
    fn rendered_event_without_layout() {
        let (input, output) = roots();
        let event = BuildEvent::Rendered {
            input: input.join("index.md"),
            output: output.join("index.html"),
            layout: None,
        };
        assert_eq!(format_build_event(&event, &input, &output).len(), 1);
    }

    #[test]
    fn up_to_date_event_is_marked() {
        let (input, output) = roots();
        let event = BuildEvent::UpToDate {
            input: input.join("a.png"),
            output: output.join("a.png"),
        };
        assert_eq!(
            format_build_event(&event, &input, &output),
            vec!["a.png → a.png (up to date)"]
        );
    }

    #[test]
    fn paths_outside_roots_shown_as_given() {
        let (input, output) = roots();
        let event = BuildEvent::Copied {
            input: PathBuf::from("/elsewhere/x.txt"),
            output: output.join("x.txt"),
        };
        assert_eq!(
            format_build_event(&event, &input, &output),
            vec!["/elsewhere/x.txt → x.txt"]
        );
    }

    #[test]
    fn summary_counts() {
        let report = BuildReport {
            styled: 1,
            rendered: 2,
            copied: 3,
            up_to_date: 4,
        };
        assert_eq!(
            format_summary(&report),
            vec!["Built 10 files: 1 style sheet, 2 documents, 3 copied, 4 up to date"]
        );
    }

    #[test]
    fn summary_of_single_file() {
        let report = BuildReport {
            rendered: 1,
            ..Default::default()
        };
        assert_eq!(
            format_summary(&report),
            vec!["Built 1 file: 0 style sheets, 1 document, 0 copied, 0 up to date"]
        );
    }
}
