//! Nearest-ancestor file lookup.
//!
//! Finds a file by name in the directory containing a given path, or in the
//! closest enclosing directory that has one. This is how a document finds its
//! layout: a `+layout.html` in `guide/` applies to every document below
//! `guide/` unless a deeper directory provides its own.
//!
//! ```text
//! content/
//! ├── +layout.html            ← used by index.md and guide/intro.md
//! ├── index.md
//! └── guide/
//!     ├── intro.md
//!     └── api/
//!         ├── +layout.html    ← used by guide/api/ref.md
//!         └── ref.md
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Search upward from the directory containing `from_file` for a regular
/// file named `target_name`.
///
/// Returns the nearest match. The ascent stops before the empty path and
/// before the file-system root, so it always terminates. A missing candidate
/// means "keep looking"; any other I/O error is returned.
pub fn resolve_nearest(from_file: &Path, target_name: &str) -> io::Result<Option<PathBuf>> {
    let Some(start) = from_file.parent() else {
        return Ok(None);
    };

    for dir in start.ancestors() {
        if dir.parent().is_none() {
            break;
        }

        let candidate = dir.join(target_name);
        match fs::metadata(&candidate) {
            Ok(meta) if meta.is_file() => {
                tracing::debug!(
                    from = %from_file.display(),
                    found = %candidate.display(),
                    "Resolved nearest file"
                );
                return Ok(Some(candidate));
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }

    Ok(None)
}
