//! Configuration module for pdfcollate.
//!
//! This module holds the validated configuration that drives a session:
//! - Thumbnail scale used by the renderer
//! - Compression applied when exporting
//! - Overwrite behavior of the save prompt
//! - Files to import at startup

use anyhow::{Result, bail};

use crate::PdfCollateError;
use std::{path::PathBuf, str::FromStr};

/// Default thumbnail scale relative to the page size in points.
pub const DEFAULT_THUMBNAIL_SCALE: f32 = 0.7;

/// Largest accepted thumbnail scale.
pub const MAX_THUMBNAIL_SCALE: f32 = 8.0;

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - streams are written as they were read.
    None,
    /// Compress streams that are not compressed yet.
    #[default]
    Standard,
    /// Compress streams and renumber objects densely.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = crate::PdfCollateError;

    /// Parse compression level from string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not "none", "standard", or "maximum".
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfCollateError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// Behavior of the save prompt when the destination already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Ask before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without asking.
    Force,
    /// Never overwrite; the save is refused.
    NoClobber,
}

/// Complete configuration for an editing session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Files imported as soon as the session starts.
    pub inputs: Vec<PathBuf>,

    /// Thumbnail scale factor (1.0 renders one pixel per PDF point).
    pub thumbnail_scale: f32,

    /// Compression level for exports.
    pub compression: CompressionLevel,

    /// Save prompt behavior for existing destinations.
    pub overwrite_mode: OverwriteMode,

    /// Settings file; `None` uses the per-user default location.
    pub settings_path: Option<PathBuf>,

    /// Verbose logging.
    pub verbose: bool,

    /// Number of source files loaded concurrently during export
    /// (None = auto-detect).
    pub jobs: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            thumbnail_scale: DEFAULT_THUMBNAIL_SCALE,
            compression: CompressionLevel::default(),
            overwrite_mode: OverwriteMode::default(),
            settings_path: None,
            verbose: false,
            jobs: None,
        }
    }
}

impl Config {
    /// Returns a reference to the startup inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The thumbnail scale is not a finite positive number or exceeds
    ///   [`MAX_THUMBNAIL_SCALE`]
    /// - Jobs count is zero
    pub fn validate(&self) -> Result<()> {
        if !self.thumbnail_scale.is_finite() || self.thumbnail_scale <= 0.0 {
            bail!(
                "Thumbnail scale must be a positive number, got {}",
                self.thumbnail_scale
            );
        }

        if self.thumbnail_scale > MAX_THUMBNAIL_SCALE {
            bail!(
                "Thumbnail scale {} is too large (maximum is {MAX_THUMBNAIL_SCALE})",
                self.thumbnail_scale
            );
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            bail!("Number of jobs must be at least 1");
        }

        Ok(())
    }

    /// Get the effective number of concurrent source loads.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}
