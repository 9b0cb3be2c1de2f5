//! PDF loading.
//!
//! Loading parses the whole file with `lopdf`. Parsing is CPU and I/O bound,
//! so the async entry points run it on the blocking thread pool. The import
//! worker already lives on a blocking thread and calls
//! [`PdfReader::load_blocking`] directly.
//!
//! # Examples
//!
//! ```no_run
//! use pdfcollate::io::reader::PdfReader;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let loaded = reader.load(&PathBuf::from("a.pdf")).await?;
//! println!("{} pages", loaded.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{PdfCollateError, Result};

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to load the document.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

impl LoadedPdf {
    fn new(document: Document, path: PathBuf, load_time: Duration) -> Self {
        let page_count = document.get_pages().len();
        let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        Self {
            document,
            path,
            page_count,
            load_time,
            file_size,
        }
    }
}

/// PDF reader with configurable loading behavior.
#[derive(Debug, Clone)]
pub struct PdfReader {
    /// Whether documents without pages are rejected.
    verify: bool,
}

impl PdfReader {
    /// Create a new PDF reader with default settings.
    pub fn new() -> Self {
        Self { verify: true }
    }

    /// Create a reader that accepts documents without pages.
    pub fn without_verification() -> Self {
        Self { verify: false }
    }

    /// Load a single PDF document on the current thread.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCollateError::UnreadableFile`] if:
    /// - The path is not a regular file
    /// - The file is not a valid PDF
    /// - The PDF is encrypted
    /// - The PDF has no pages (unless verification is off)
    pub fn load_blocking(&self, path: &Path) -> Result<LoadedPdf> {
        let start = Instant::now();
        let path_buf = path.to_path_buf();

        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                return Err(PdfCollateError::unreadable_file(path_buf, "not a regular file"));
            }
            Err(e) => return Err(PdfCollateError::unreadable_file(path_buf, e.to_string())),
        }

        let doc = Document::load(path).map_err(|e| {
            let msg = e.to_string();
            if msg.contains("encrypt") || msg.contains("password") {
                PdfCollateError::unreadable_file(path_buf.clone(), "PDF is encrypted")
            } else {
                PdfCollateError::unreadable_file(path_buf.clone(), msg)
            }
        })?;

        if doc.is_encrypted() {
            return Err(PdfCollateError::unreadable_file(path_buf, "PDF is encrypted"));
        }

        if self.verify && doc.get_pages().is_empty() {
            return Err(PdfCollateError::unreadable_file(path_buf, "PDF has no pages"));
        }

        let loaded = LoadedPdf::new(doc, path_buf, start.elapsed());
        debug!(
            path = %loaded.path.display(),
            pages = loaded.page_count,
            elapsed = ?loaded.load_time,
            "Loaded PDF"
        );
        Ok(loaded)
    }

    /// Load a single PDF document on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// See [`PdfReader::load_blocking`].
    pub async fn load(&self, path: &Path) -> Result<LoadedPdf> {
        let reader = self.clone();
        let path_buf = path.to_path_buf();

        tokio::task::spawn_blocking(move || reader.load_blocking(&path_buf))
            .await
            .map_err(|e| PdfCollateError::other(format!("Load task failed: {e}")))?
    }

    /// Load several documents with bounded concurrency.
    ///
    /// Results come back in the order of `paths`.
    pub async fn load_ordered(&self, paths: &[PathBuf], workers: usize) -> Vec<Result<LoadedPdf>> {
        use futures::stream::{self, StreamExt};

        let tasks = paths.iter().map(|path| {
            let reader = self.clone();
            let path = path.clone();
            async move { reader.load(&path).await }
        });

        stream::iter(tasks)
            .buffered(workers.max(1))
            .collect::<Vec<_>>()
            .await
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}
