//! # Book Binder
//!
//! A static-content build tool. Point it at a directory of markdown, style
//! sheets and assets and it produces a mirrored output tree ready to serve:
//! documents become HTML pages wrapped in a layout, style sheets become single
//! self-contained CSS files, and everything else is copied.
//!
//! # Architecture: One Pass, One Transform Per File
//!
//! ```text
//! walk        input root  →  lazy sequence of emittable files
//! dispatch    file        →  Style | Document | Copy
//! write       result      →  mirrored path under the output root
//! ```
//!
//! Files are processed one at a time in walk order. The first failure stops
//! the build.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`walk`] | Lazy depth-first file enumeration with reserved-prefix filtering |
//! | [`resolve`] | Nearest-ancestor lookup of special files such as `+layout.html` |
//! | [`style`] | `@import` inlining, cycle detection and SCSS compilation |
//! | [`layout`] | The `LayoutProvider` capability and its minijinja implementation |
//! | [`document`] | Markdown to HTML, wrapped in the nearest layout |
//! | [`copy`] | Timestamp-aware copying of unmanaged files |
//! | [`pipeline`] | Transform dispatch, output paths, build events and status |
//! | [`config`] | `+config.toml` loading and validation |
//! | [`output`] | CLI output formatting of build events |
//!
//! # Reserved Names
//!
//! Base names starting with `_` or `+` never reach the output:
//!
//! - `_name`: private fragments, pulled in by something else
//!   (`@import "_vars.scss";`)
//! - `+name`: special files read by the build itself (`+layout.html`,
//!   `+config.toml`)
//!
//! # Design Decisions
//!
//! ## Imports Before Compilation
//!
//! Style imports are expanded textually before a `.scss` file is handed to
//! the compiler, so an entry file can use variables and mixins from its
//! fragments. A `.css` file importing a `.scss` fragment receives the
//! fragment's compiled output.
//!
//! ## Layouts Are Injected
//!
//! Document rendering never decides how a layout file is interpreted. The
//! caller passes a [`layout::LayoutProvider`]; the binary uses
//! [`layout::TemplateLayouts`] and tests use a recording mock.
//!
//! ## No Process Exit in the Library
//!
//! [`pipeline::build`] returns a `Result`. Only the binary maps it to a
//! [`pipeline::BuildStatus`] and from there to an exit code.

pub mod config;
pub mod copy;
pub mod document;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod resolve;
pub mod style;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_helpers;
