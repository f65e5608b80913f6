//! Incremental copying of unmanaged files.
//!
//! Images, fonts and anything else without a transform are copied byte for
//! byte. On repeated builds the copy is skipped when the destination is
//! strictly newer than the source. Whenever the answer is uncertain (missing
//! destination, a file system that reports no modification times, equal
//! timestamps) the file is copied again.

use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// What [`copy_if_stale`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    UpToDate,
}

/// Decide whether a copy is needed from the two stat results.
///
/// `output` is `None` when the destination does not exist yet.
pub fn needs_copy(input: &Metadata, output: Option<&Metadata>) -> bool {
    let Some(output) = output else {
        return true;
    };
    is_stale(input.modified().ok(), output.modified().ok())
}

/// Stale unless both times are known and the output's is strictly newer.
pub fn is_stale(input_mtime: Option<SystemTime>, output_mtime: Option<SystemTime>) -> bool {
    match (input_mtime, output_mtime) {
        (Some(input), Some(output)) => output <= input,
        _ => true,
    }
}

/// Copy `input` to `output` unless `output` is already newer.
pub fn copy_if_stale(input: &Path, output: &Path) -> io::Result<CopyOutcome> {
    let input_meta = fs::metadata(input)?;
    let output_meta = match fs::metadata(output) {
        Ok(meta) => Some(meta),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e),
    };

    if needs_copy(&input_meta, output_meta.as_ref()) {
        ensure_distinct(input, output)?;
        fs::copy(input, output)?;
        tracing::debug!(input = %input.display(), output = %output.display(), "Copied");
        Ok(CopyOutcome::Copied)
    } else {
        tracing::debug!(output = %output.display(), "Up to date, skipping copy");
        Ok(CopyOutcome::UpToDate)
    }
}

/// Copy `input` to `output` regardless of timestamps.
pub fn copy_always(input: &Path, output: &Path) -> io::Result<CopyOutcome> {
    ensure_distinct(input, output)?;
    fs::copy(input, output)?;
    Ok(CopyOutcome::Copied)
}

/// `fs::copy` truncates the destination before reading the source, so a file
/// copied onto itself ends up empty.
fn ensure_distinct(input: &Path, output: &Path) -> io::Result<()> {
    let Ok(output) = fs::canonicalize(output) else {
        return Ok(());
    };
    if fs::canonicalize(input)? == output {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} would be copied onto itself", input.display()),
        ));
    }
    Ok(())
}
