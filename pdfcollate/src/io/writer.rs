//! PDF writing.
//!
//! Documents are serialized into a temporary file created next to the
//! destination and then persisted over it, so the destination is either
//! replaced completely or left untouched.
//!
//! # Examples
//!
//! ```no_run
//! use pdfcollate::io::writer::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # async fn example(doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! let stats = writer.save_with_stats(doc, Path::new("output.pdf")).await?;
//! println!("Wrote {}", stats.format_file_size());
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;

use crate::config::CompressionLevel;
use crate::error::{PdfCollateError, Result};
use crate::utils::format_file_size;

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Compression applied before writing.
    pub compression: CompressionLevel,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compression: CompressionLevel::default(),
            buffer_size: 64 * 1024,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,

    /// Compression that was applied.
    pub compression: CompressionLevel,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a writer using the given compression level.
    pub fn with_compression(compression: CompressionLevel) -> Self {
        Self {
            options: WriteOptions {
                compression,
                ..Default::default()
            },
        }
    }

    /// Save a PDF document to `path` on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCollateError::Write`] if the temporary file cannot be
    /// created, written, or persisted over the destination. The destination
    /// is unchanged in that case.
    pub async fn save_with_stats(&self, doc: Document, path: &Path) -> Result<WriteStatistics> {
        let writer = self.clone();
        let path_buf = path.to_path_buf();

        task::spawn_blocking(move || writer.save_blocking(doc, &path_buf))
            .await
            .map_err(|e| PdfCollateError::other(format!("Write task failed: {e}")))?
    }

    /// Save a PDF document to `path` on the current thread.
    ///
    /// # Errors
    ///
    /// See [`PdfWriter::save_with_stats`].
    pub fn save_blocking(&self, mut doc: Document, path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();
        let write_err = |source: std::io::Error| PdfCollateError::Write {
            path: path.to_path_buf(),
            source,
        };

        match self.options.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => doc.compress(),
            CompressionLevel::Maximum => {
                doc.compress();
                doc.renumber_objects();
            }
        }

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let temp = tempfile::Builder::new()
            .prefix(".pdfcollate-")
            .suffix(".tmp")
            .tempfile_in(&parent)
            .map_err(write_err)?;

        {
            let mut out = BufWriter::with_capacity(self.options.buffer_size, temp.as_file());
            doc.save_to(&mut out)
                .map_err(|e| write_err(std::io::Error::other(e)))?;
            out.flush().map_err(write_err)?;
        }
        temp.as_file().sync_all().map_err(write_err)?;

        let file = temp.persist(path).map_err(|e| write_err(e.error))?;
        let file_size = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(WriteStatistics {
            write_time: start.elapsed(),
            file_size,
            output_path: path.to_path_buf(),
            compression: self.options.compression,
        })
    }

    /// Check if the output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}
