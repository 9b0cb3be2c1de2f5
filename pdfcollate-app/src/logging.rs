//! File logging.
//!
//! The terminal belongs to the UI, so log lines go to a daily rolling file.

use std::path::{Path, PathBuf};

use tracing::Level;

use crate::error::AppError;

/// Default log directory, `<cache_dir>/pdfcollate/logs`.
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(pdfcollate::NAME).join("logs"))
}

/// Install the global subscriber and return the directory logs go to.
pub fn init(log_dir: Option<&Path>, verbose: bool) -> Result<PathBuf, AppError> {
    let dir = match log_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_log_dir().ok_or(AppError::LogDirectory)?,
    };

    let logfile = tracing_appender::rolling::daily(&dir, "log");
    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_max_level(level(verbose))
        .with_writer(logfile)
        .try_init()
        .map_err(|err| AppError::Tracing(err.to_string()))?;

    Ok(dir)
}

fn level(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::INFO }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level() {
        assert_eq!(level(true), Level::DEBUG);
        assert_eq!(level(false), Level::INFO);
    }

    #[test]
    fn test_default_log_dir_ends_with_logs() {
        if let Some(dir) = default_log_dir() {
            assert!(dir.ends_with("pdfcollate/logs"));
        }
    }
}
