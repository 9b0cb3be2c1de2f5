//! Output path handling.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::OverwriteMode;
use crate::{PdfCollateError, Result};

/// Append `.pdf` to `path` unless its name already ends with `.pdf`
/// (case-insensitive).
///
/// # Errors
///
/// Returns [`PdfCollateError::InvalidDestination`] if `path` ends in a
/// separator or has no file name (`dir/`, `..`, empty).
pub fn normalize_destination(path: &Path) -> Result<PathBuf> {
    let raw = path.as_os_str().to_string_lossy();
    if raw.ends_with(std::path::is_separator) || path.file_name().is_none() {
        return Err(PdfCollateError::InvalidDestination {
            path: path.to_path_buf(),
        });
    }

    if raw.to_lowercase().ends_with(".pdf") {
        return Ok(path.to_path_buf());
    }

    let mut normalized = OsString::from(path.as_os_str());
    normalized.push(".pdf");
    Ok(PathBuf::from(normalized))
}

/// What the save prompt should do with a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteDecision {
    /// Write without asking.
    Write,
    /// The destination exists; ask the user first.
    Confirm,
    /// The destination exists and must not be replaced.
    Refuse,
}

/// Decide how to treat `path` given the configured overwrite mode.
pub fn decide_overwrite(path: &Path, mode: OverwriteMode) -> OverwriteDecision {
    if !path.exists() {
        return OverwriteDecision::Write;
    }

    match mode {
        OverwriteMode::Force => OverwriteDecision::Write,
        OverwriteMode::Prompt => OverwriteDecision::Confirm,
        OverwriteMode::NoClobber => OverwriteDecision::Refuse,
    }
}
