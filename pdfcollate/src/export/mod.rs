//! Merging the page list into a new PDF.
//!
//! Export walks the list in order, opens each distinct source once,
//! extracts the referenced pages and writes the result atomically. Nothing
//! is written unless every source could be read.
//!
//! # Examples
//!
//! ```no_run
//! use pdfcollate::export::Exporter;
//! use pdfcollate::model::PageList;
//! use std::path::Path;
//!
//! # async fn example(list: &PageList) -> Result<(), Box<dyn std::error::Error>> {
//! let exporter = Exporter::new();
//! let stats = exporter.export(list.entries(), Path::new("merged")).await?;
//! println!("Wrote {} pages to {}", stats.pages, stats.output_path.display());
//! # Ok(())
//! # }
//! ```

pub mod assemble;
pub mod destination;

pub use assemble::{ExportPlan, assemble};
pub use destination::{OverwriteDecision, decide_overwrite, normalize_destination};

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::{CompressionLevel, Config};
use crate::error::{PdfCollateError, Result};
use crate::io::{PdfReader, PdfWriter};
use crate::model::PageEntry;
use crate::utils::format_file_size;

/// Statistics about a completed export.
#[derive(Debug, Clone)]
pub struct ExportStatistics {
    /// Pages written.
    pub pages: usize,
    /// Distinct source files read.
    pub source_files: usize,
    /// Final destination (after normalization).
    pub output_path: PathBuf,
    /// Size of the written file in bytes.
    pub file_size: u64,
    /// Time spent loading sources.
    pub load_time: Duration,
    /// Total time of the export.
    pub total_time: Duration,
}

impl ExportStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }

    /// Short status line for the UI.
    pub fn describe(&self) -> String {
        format!(
            "Saved {} page(s) from {} file(s) to {} ({})",
            self.pages,
            self.source_files,
            self.output_path.display(),
            self.format_file_size()
        )
    }
}

/// Writes page lists to PDF files.
#[derive(Debug, Clone)]
pub struct Exporter {
    reader: PdfReader,
    writer: PdfWriter,
    jobs: usize,
}

impl Exporter {
    /// Create an exporter with standard compression.
    pub fn new() -> Self {
        Self::with_compression(CompressionLevel::default())
    }

    /// Create an exporter using the given compression level.
    pub fn with_compression(compression: CompressionLevel) -> Self {
        Self {
            reader: PdfReader::new(),
            writer: PdfWriter::with_compression(compression),
            jobs: 1,
        }
    }

    /// Create an exporter from the session configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            jobs: config.effective_jobs(),
            ..Self::with_compression(config.compression)
        }
    }

    /// Merge `entries`, in order, into a new PDF at `destination`.
    ///
    /// A destination without a `.pdf` suffix gets one appended.
    ///
    /// # Errors
    ///
    /// - [`PdfCollateError::EmptyInput`] if `entries` is empty
    /// - [`PdfCollateError::InvalidDestination`] if `destination` has no
    ///   file name
    /// - [`PdfCollateError::SourceUnavailable`] if a source cannot be read
    ///   or lost the referenced page
    /// - [`PdfCollateError::Write`] if the destination cannot be written
    ///
    /// The destination is untouched on error.
    pub async fn export(&self, entries: &[PageEntry], destination: &Path) -> Result<ExportStatistics> {
        let start = Instant::now();

        let plan = ExportPlan::from_entries(entries);
        if plan.is_empty() {
            return Err(PdfCollateError::EmptyInput);
        }
        let destination = normalize_destination(destination)?;

        let paths: Vec<PathBuf> = plan.sources().iter().map(|p| p.to_path_buf()).collect();
        let mut loaded = Vec::with_capacity(paths.len());
        for (path, result) in paths.iter().zip(self.reader.load_ordered(&paths, self.jobs).await) {
            let pdf = result.map_err(|err| match err {
                PdfCollateError::UnreadableFile { reason, .. } => {
                    PdfCollateError::source_unavailable(path.clone(), reason)
                }
                other => other,
            })?;
            loaded.push(pdf);
        }
        let load_time = start.elapsed();
        debug!(sources = loaded.len(), elapsed = ?load_time, "Loaded export sources");

        let document = tokio::task::spawn_blocking(move || assemble(&plan, loaded))
            .await
            .map_err(|e| PdfCollateError::other(format!("Assembly task failed: {e}")))??;
        let pages = document.get_pages().len();

        let written = self.writer.save_with_stats(document, &destination).await?;

        let stats = ExportStatistics {
            pages,
            source_files: paths.len(),
            output_path: written.output_path,
            file_size: written.file_size,
            load_time,
            total_time: start.elapsed(),
        };
        info!(
            pages = stats.pages,
            sources = stats.source_files,
            output = %stats.output_path.display(),
            size = %stats.format_file_size(),
            elapsed = ?stats.total_time,
            "Export finished"
        );

        Ok(stats)
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}
