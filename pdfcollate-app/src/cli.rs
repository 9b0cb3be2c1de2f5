//! CLI argument parsing for pdfcollate.
//!
//! The command line only seeds the interactive session: files to import at
//! startup plus the settings that shape thumbnails, exports and logging.

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use pdfcollate::config::{CompressionLevel, Config, DEFAULT_THUMBNAIL_SCALE, OverwriteMode};
use pdfcollate::{PdfCollateError, Result};

/// Reorder, trash, restore and merge PDF pages.
///
/// pdfcollate shows every page of the given PDFs as an entry in a list.
/// Pages can be moved, removed to a trash and restored, then exported in
/// list order into a new PDF.
#[derive(Parser, Debug)]
#[command(name = "pdfcollate")]
#[command(version)]
#[command(about = "Reorder and merge PDF pages interactively", long_about = None)]
#[command(author)]
pub struct Cli {
    /// PDF files to import at startup
    ///
    /// Glob patterns are expanded relative to the current directory.
    /// More files can be added from within the application.
    #[arg(value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Thumbnail scale relative to the page size in points
    #[arg(short, long, value_name = "FACTOR", default_value_t = DEFAULT_THUMBNAIL_SCALE)]
    pub scale: f32,

    /// Compression level for exported PDFs
    ///
    /// - none: Streams are written as read
    /// - standard: Compress uncompressed streams (default)
    /// - maximum: Compress and renumber objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Overwrite existing files on save without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing files on save
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Settings file holding the remembered directory
    #[arg(long, value_name = "FILE", env = "PDFCOLLATE_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Directory for log files (defaults to the user cache directory)
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of source files loaded concurrently during export
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCollateError::InvalidConfig`] if the compression level
    /// is unknown or the resulting configuration does not validate.
    pub fn to_config(&self) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let config = Config {
            inputs: self.inputs.clone(),
            thumbnail_scale: self.scale,
            compression,
            overwrite_mode,
            settings_path: self.settings.clone(),
            verbose: self.verbose,
            jobs: self.jobs,
        };

        config.validate().map_err(|e| {
            PdfCollateError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before the terminal is taken over.
    ///
    /// # Errors
    ///
    /// Returns an error for flag combinations clap cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.force && self.no_clobber {
            return Err(PdfCollateError::invalid_config(
                "--force and --no-clobber cannot be combined",
            ));
        }

        if let Some(dir) = &self.log_dir
            && dir.is_file()
        {
            return Err(PdfCollateError::invalid_config(format!(
                "Log directory {} is a file",
                dir.display()
            )));
        }

        Ok(())
    }
}
