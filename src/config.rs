//! Build configuration.
//!
//! Handles loading and validating `+config.toml`. The file lives in the input
//! root; its `+` prefix keeps it out of the walked sequence, so it is never
//! copied to the output.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [walk]
//! prune_reserved_dirs = false   # skip whole `_dir/` and `+dir/` subtrees
//!
//! [styles]
//! output_style = "compressed"   # or "expanded"
//!
//! [layout]
//! file_name = "+layout.html"    # looked up from each document upward
//!
//! [copy]
//! incremental = true            # skip copies whose output is newer
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [walk]
//! prune_reserved_dirs = true
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::layout::DEFAULT_LAYOUT_FILE;
use crate::style::OutputStyle;
use crate::walk;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the build configuration inside the input root.
pub const CONFIG_FILE: &str = "+config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `+config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BinderConfig {
    /// Tree walking settings.
    pub walk: WalkConfig,
    /// Style sheet compilation settings.
    pub styles: StylesConfig,
    /// Document layout settings.
    pub layout: LayoutConfig,
    /// Unmanaged file copy settings.
    pub copy: CopyConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalkConfig {
    /// Skip directories whose name starts with `_` or `+`, with everything
    /// below them. When false only reserved files are skipped.
    pub prune_reserved_dirs: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StylesConfig {
    /// Output style for compiled `.scss` files.
    pub output_style: OutputStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Layout file name searched for from each document upward.
    pub file_name: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_LAYOUT_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CopyConfig {
    /// Skip copying when the destination is newer than the source.
    pub incremental: bool,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self { incremental: true }
    }
}

impl BinderConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = &self.layout.file_name;
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "layout.file_name must be a bare file name".into(),
            ));
        }
        if !walk::is_reserved(Path::new(name)) {
            return Err(ConfigError::Validation(format!(
                "layout.file_name must start with `_` or `+` (got `{name}`), \
                 otherwise the layout would be copied to the output"
            )));
        }
        Ok(())
    }
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<BinderConfig, ConfigError> {
    let config: BinderConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from a specific file. The file must exist.
pub fn load_config_file(path: &Path) -> Result<BinderConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_config(&content)
}

/// Load `+config.toml` from the input root, falling back to defaults when
/// the file does not exist.
pub fn load_config(input_root: &Path) -> Result<BinderConfig, ConfigError> {
    let path = input_root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(BinderConfig::default());
    }
    load_config_file(&path)
}

/// Returns a fully-commented stock `+config.toml`.
///
/// Used by the `--gen-config` flag.
pub fn stock_config_toml() -> &'static str {
    r##"# Book Binder Configuration
# =========================
# Save as +config.toml in the input directory. All settings are optional;
# values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Walking the input tree
# ---------------------------------------------------------------------------
[walk]
# Files whose name starts with `_` or `+` are never emitted. With this
# option, directories with such names are skipped entirely as well
# (useful for `_drafts/`).
prune_reserved_dirs = false

# ---------------------------------------------------------------------------
# Style sheets (.css, .scss)
# ---------------------------------------------------------------------------
[styles]
# Output style of compiled .scss files: "compressed" or "expanded".
output_style = "compressed"

# ---------------------------------------------------------------------------
# Documents (.md)
# ---------------------------------------------------------------------------
[layout]
# Template searched for from each document's directory upward. The nearest
# one wraps the rendered document. Must start with `_` or `+`.
file_name = "+layout.html"

# ---------------------------------------------------------------------------
# Everything else
# ---------------------------------------------------------------------------
[copy]
# Skip copying a file when its output is already newer than the source.
incremental = true
"##
}
