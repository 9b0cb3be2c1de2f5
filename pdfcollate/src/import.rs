//! Background page import.
//!
//! An import batch runs on a single blocking worker thread. For every file,
//! in order, the worker loads the document, renders each page through the
//! [`ThumbnailRenderer`] and sends an [`ImportEvent::Page`] back over an
//! unbounded channel. The worker never touches the page list; the receiving
//! side turns imported pages into entries.
//!
//! Exactly one [`ImportEvent::Finished`] is sent per batch, also when the
//! batch was cancelled.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{PdfCollateError, Result};
use crate::io::PdfReader;
use crate::model::PageEntry;
use crate::render::{Thumbnail, ThumbnailRenderer};

/// A page produced by the import worker.
#[derive(Debug)]
pub struct ImportedPage {
    /// Absolute path of the source file.
    pub source: Arc<Path>,
    /// Zero-based page index.
    pub page_index: usize,
    /// Rendered preview, if rendering succeeded.
    pub thumbnail: Option<Thumbnail>,
}

impl ImportedPage {
    /// Turn the imported page into a list entry with a fresh id.
    pub fn into_entry(self) -> PageEntry {
        PageEntry::new(self.source, self.page_index, self.thumbnail)
    }
}

/// Messages sent from the import worker.
#[derive(Debug)]
pub enum ImportEvent {
    /// A file was opened and its pages are about to be imported.
    FileStarted {
        /// The file being imported.
        path: PathBuf,
        /// Zero-based position of the file in the batch.
        index: usize,
        /// Number of files in the batch.
        total: usize,
        /// Number of pages in the file.
        page_count: usize,
    },
    /// One imported page.
    Page(ImportedPage),
    /// A file was skipped.
    FileFailed(PdfCollateError),
    /// The batch is over.
    Finished(ImportSummary),
}

/// Outcome of an import batch.
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    /// Number of files in the batch.
    pub files_total: usize,
    /// Files whose pages were imported.
    pub files_imported: usize,
    /// Files that were skipped, with the reason.
    pub failures: Vec<(PathBuf, String)>,
    /// Pages sent to the interactive side.
    pub pages: usize,
    /// Pages imported without a thumbnail.
    pub render_failures: usize,
    /// Whether the batch was cancelled before completion.
    pub cancelled: bool,
    /// Time spent in the worker.
    pub elapsed: Duration,
}

impl ImportSummary {
    /// Short status line for the UI.
    pub fn describe(&self) -> String {
        let mut text = format!(
            "Imported {} page(s) from {} of {} file(s)",
            self.pages, self.files_imported, self.files_total
        );
        if !self.failures.is_empty() {
            text.push_str(&format!(", {} skipped", self.failures.len()));
        }
        if self.cancelled {
            text.push_str(" (cancelled)");
        }
        text
    }
}

/// Progress of the running batch, as tracked by the interactive side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportProgress {
    /// Number of files in the batch.
    pub files_total: usize,
    /// Files fully processed (imported or skipped).
    pub files_done: usize,
    /// Pages received so far.
    pub pages_added: usize,
    /// File currently being imported.
    pub current_file: Option<PathBuf>,
    /// Pages of the current file received so far.
    pub current_page: usize,
    /// Page count of the current file.
    pub current_page_count: usize,
}

impl ImportProgress {
    /// Progress for a batch of `files_total` files.
    pub fn new(files_total: usize) -> Self {
        Self {
            files_total,
            ..Default::default()
        }
    }

    /// Update the progress with an event from the worker.
    pub fn apply(&mut self, event: &ImportEvent) {
        match event {
            ImportEvent::FileStarted {
                path, page_count, ..
            } => {
                if self.current_file.is_some() {
                    self.files_done += 1;
                }
                self.current_file = Some(path.clone());
                self.current_page = 0;
                self.current_page_count = *page_count;
            }
            ImportEvent::Page(_) => {
                self.pages_added += 1;
                self.current_page += 1;
            }
            ImportEvent::FileFailed(_) => {
                if self.current_file.take().is_some() {
                    self.files_done += 1;
                }
                self.files_done += 1;
            }
            ImportEvent::Finished(_) => {
                self.files_done = self.files_total;
                self.current_file = None;
            }
        }
    }

    /// Completed fraction in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        if self.files_total == 0 {
            return 1.0;
        }
        let partial = if self.current_page_count > 0 && self.current_file.is_some() {
            self.current_page as f64 / self.current_page_count as f64
        } else {
            0.0
        };
        ((self.files_done as f64 + partial) / self.files_total as f64).clamp(0.0, 1.0)
    }
}

/// Runs import batches.
#[derive(Clone)]
pub struct Importer {
    reader: PdfReader,
    renderer: Arc<dyn ThumbnailRenderer>,
}

impl std::fmt::Debug for Importer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Importer")
            .field("reader", &self.reader)
            .field("renderer_available", &self.renderer.is_available())
            .finish()
    }
}

impl Importer {
    /// Create an importer rendering thumbnails with `renderer`.
    pub fn new(renderer: Arc<dyn ThumbnailRenderer>) -> Self {
        Self {
            reader: PdfReader::new(),
            renderer,
        }
    }

    /// Start a batch on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCollateError::NothingToImport`] if `paths` is empty.
    pub fn spawn(&self, paths: Vec<PathBuf>) -> Result<ImportHandle> {
        if paths.is_empty() {
            return Err(PdfCollateError::NothingToImport);
        }

        let (tx, events) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let importer = self.clone();
        let worker_cancel = cancel.clone();
        let total = paths.len();

        let task = tokio::task::spawn_blocking(move || {
            let stop = worker_cancel.clone();
            importer.run_blocking(&paths, &worker_cancel, move |event| {
                if tx.send(event).is_err() {
                    stop.cancel();
                }
            });
        });

        Ok(ImportHandle {
            events,
            cancel,
            task,
            total,
        })
    }

    /// Run a batch on the current thread, passing every event to `emit`.
    ///
    /// The last event is always [`ImportEvent::Finished`], carrying the
    /// same summary that is returned.
    pub fn run_blocking<F>(
        &self,
        paths: &[PathBuf],
        cancel: &CancellationToken,
        mut emit: F,
    ) -> ImportSummary
    where
        F: FnMut(ImportEvent),
    {
        let start = Instant::now();
        let mut summary = ImportSummary {
            files_total: paths.len(),
            ..Default::default()
        };

        'files: for (index, path) in paths.iter().enumerate() {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            let loaded = match self.reader.load_blocking(path) {
                Ok(loaded) => loaded,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Skipping file");
                    summary.failures.push((path.clone(), err.to_string()));
                    emit(ImportEvent::FileFailed(err));
                    continue;
                }
            };

            let absolute = std::path::absolute(path).unwrap_or_else(|_| path.clone());
            let source: Arc<Path> = Arc::from(absolute.as_path());
            let page_count = loaded.page_count;
            drop(loaded);

            debug!(path = %source.display(), pages = page_count, "Importing file");
            emit(ImportEvent::FileStarted {
                path: absolute,
                index,
                total: paths.len(),
                page_count,
            });
            summary.files_imported += 1;

            for page_index in 0..page_count {
                if cancel.is_cancelled() {
                    summary.cancelled = true;
                    break 'files;
                }

                let thumbnail = self.render(&source, page_index, &mut summary);
                emit(ImportEvent::Page(ImportedPage {
                    source: Arc::clone(&source),
                    page_index,
                    thumbnail,
                }));
                summary.pages += 1;
            }
        }

        summary.elapsed = start.elapsed();
        info!(
            pages = summary.pages,
            files = summary.files_imported,
            skipped = summary.failures.len(),
            cancelled = summary.cancelled,
            elapsed = ?summary.elapsed,
            "Import finished"
        );
        emit(ImportEvent::Finished(summary.clone()));
        summary
    }

    fn render(
        &self,
        source: &Path,
        page_index: usize,
        summary: &mut ImportSummary,
    ) -> Option<Thumbnail> {
        if !self.renderer.is_available() {
            return None;
        }

        match self.renderer.render(source, page_index) {
            Ok(thumbnail) => Some(thumbnail),
            Err(err) => {
                warn!(error = %err, "Importing page without thumbnail");
                summary.render_failures += 1;
                None
            }
        }
    }
}

/// Handle to a running import batch.
#[derive(Debug)]
pub struct ImportHandle {
    events: mpsc::UnboundedReceiver<ImportEvent>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
    total: usize,
}

impl ImportHandle {
    /// Wait for the next event. Returns `None` once the worker is gone.
    pub async fn next_event(&mut self) -> Option<ImportEvent> {
        self.events.recv().await
    }

    /// Take the next event if one is ready.
    pub fn try_next_event(&mut self) -> Option<ImportEvent> {
        self.events.try_recv().ok()
    }

    /// Ask the worker to stop after the current page.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Number of files in the batch.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Drain all remaining events until the worker exits.
    pub async fn collect(mut self) -> Vec<ImportEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.events.recv().await {
            events.push(event);
        }
        events
    }
}
