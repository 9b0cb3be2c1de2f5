//! Persistent user settings.
//!
//! Settings live in a small JSON file (by default
//! `<config_dir>/pdfcollate/settings.json`). The file is read every time a
//! value is requested and rewritten on every update, so several windows or
//! runs never work from a stale copy.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{PdfCollateError, Result};

/// Contents of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Directory the file chooser starts in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_directory: Option<PathBuf>,
}

/// Reads and writes [`Settings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Per-user default location of the settings file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(crate::NAME).join("settings.json"))
    }

    /// Store at `path`, or at the default location when `path` is `None`.
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        path.or_else(Self::default_path)
            .map(Self::new)
            .ok_or_else(|| PdfCollateError::Settings {
                path: PathBuf::from("settings.json"),
                reason: "no configuration directory available".to_string(),
            })
    }

    /// Path of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the settings file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCollateError::Settings`] if the file exists but cannot be
    /// read or parsed.
    pub fn load(&self) -> Result<Settings> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
            Err(e) => return Err(self.error(e)),
        };

        serde_json::from_str(&contents).map_err(|e| self.error(e))
    }

    /// Write the settings file, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCollateError::Settings`] if the file cannot be written.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.error(e))?;
        }

        let json = serde_json::to_string_pretty(settings).map_err(|e| self.error(e))?;
        std::fs::write(&self.path, json).map_err(|e| self.error(e))?;
        debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }

    /// Directory the file chooser should start in.
    ///
    /// Falls back to the current directory, then the home directory, when
    /// nothing usable is remembered. A broken settings file is logged and
    /// ignored.
    pub fn last_directory(&self) -> PathBuf {
        let remembered = match self.load() {
            Ok(settings) => settings.last_directory,
            Err(err) => {
                warn!(error = %err, "Ignoring unreadable settings");
                None
            }
        };

        remembered
            .filter(|dir| dir.is_dir())
            .or_else(|| std::env::current_dir().ok())
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Remember `dir` as the chooser's starting directory.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCollateError::Settings`] if the file cannot be written.
    pub fn set_last_directory(&self, dir: &Path) -> Result<()> {
        let mut settings = self.load().unwrap_or_default();
        settings.last_directory = Some(dir.to_path_buf());
        self.save(&settings)
    }

    fn error(&self, err: impl std::fmt::Display) -> PdfCollateError {
        PdfCollateError::Settings {
            path: self.path.clone(),
            reason: err.to_string(),
        }
    }
}
