//! The editing session.
//!
//! A [`Session`] owns the page list and the trash, moves entries between
//! them, runs at most one import batch at a time, and exports the list.
//! All mutation happens here, on the interactive side; the import worker
//! only sends events that [`Session::handle_import_event`] applies.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{PdfCollateError, Result};
use crate::export::{ExportStatistics, Exporter};
use crate::import::{ImportEvent, ImportHandle, ImportProgress, ImportSummary, Importer};
use crate::model::{EntryId, PageEntry, PageList, TrashStore};
use crate::render::ThumbnailRenderer;

/// What the view should know about an applied import event.
#[derive(Debug)]
pub enum ImportNotice {
    /// Pages were added or a new file started.
    Progress,
    /// A file of the batch was skipped.
    Failed(PdfCollateError),
    /// The batch is over.
    Finished(ImportSummary),
}

struct ActiveImport {
    handle: ImportHandle,
    progress: ImportProgress,
}

/// Application state shared by all front-ends.
pub struct Session {
    list: PageList,
    trash: TrashStore,
    importer: Importer,
    exporter: Exporter,
    import: Option<ActiveImport>,
    last_import: Option<ImportSummary>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("pages", &self.list.len())
            .field("trashed", &self.trash.len())
            .field("importing", &self.is_importing())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session with the given importer and exporter.
    pub fn new(importer: Importer, exporter: Exporter) -> Self {
        Self {
            list: PageList::new(),
            trash: TrashStore::new(),
            importer,
            exporter,
            import: None,
            last_import: None,
        }
    }

    /// Create a session from the configuration.
    pub fn from_config(config: &Config, renderer: Arc<dyn ThumbnailRenderer>) -> Self {
        Self::new(Importer::new(renderer), Exporter::from_config(config))
    }

    /// The page list.
    pub fn list(&self) -> &PageList {
        &self.list
    }

    /// The trash.
    pub fn trash(&self) -> &TrashStore {
        &self.trash
    }

    /// Summary of the last finished import batch.
    pub fn last_import(&self) -> Option<&ImportSummary> {
        self.last_import.as_ref()
    }

    // Import

    /// Start importing `paths` in the background.
    ///
    /// # Errors
    ///
    /// - [`PdfCollateError::ImportInProgress`] if a batch is still running
    /// - [`PdfCollateError::NothingToImport`] if `paths` is empty
    pub fn start_import(&mut self, paths: Vec<PathBuf>) -> Result<()> {
        if self.is_importing() {
            return Err(PdfCollateError::ImportInProgress);
        }

        let handle = self.importer.spawn(paths)?;
        info!(files = handle.total(), "Import started");
        self.import = Some(ActiveImport {
            progress: ImportProgress::new(handle.total()),
            handle,
        });
        Ok(())
    }

    /// Whether an import batch is running.
    pub fn is_importing(&self) -> bool {
        self.import.is_some()
    }

    /// Progress of the running batch.
    pub fn import_progress(&self) -> Option<&ImportProgress> {
        self.import.as_ref().map(|active| &active.progress)
    }

    /// Ask the running batch to stop. Returns `false` when nothing runs.
    ///
    /// Pages already delivered stay in the list.
    pub fn cancel_import(&self) -> bool {
        match &self.import {
            Some(active) => {
                active.handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Wait for the next event of the running batch.
    ///
    /// Never resolves while no batch runs, so it can sit in a `select!`
    /// next to other event sources. If the worker disappears without
    /// finishing, a cancelled [`ImportEvent::Finished`] is produced instead.
    pub async fn recv_import_event(&mut self) -> ImportEvent {
        let Some(active) = self.import.as_mut() else {
            return std::future::pending().await;
        };

        match active.handle.next_event().await {
            Some(event) => event,
            None => {
                warn!("Import worker exited without finishing");
                ImportEvent::Finished(ImportSummary {
                    files_total: active.progress.files_total,
                    pages: active.progress.pages_added,
                    cancelled: true,
                    ..Default::default()
                })
            }
        }
    }

    /// Apply an event from the import worker.
    pub fn handle_import_event(&mut self, event: ImportEvent) -> ImportNotice {
        if let Some(active) = self.import.as_mut() {
            active.progress.apply(&event);
        }
        self.apply_import_event(event)
    }

    /// Apply every event that is ready without waiting.
    ///
    /// Consecutive pages are appended as one batch.
    pub fn pump_import(&mut self) -> Vec<ImportNotice> {
        let mut notices = Vec::new();
        let mut pages = Vec::new();

        while let Some(active) = self.import.as_mut() {
            let Some(event) = active.handle.try_next_event() else {
                break;
            };
            active.progress.apply(&event);

            match event {
                ImportEvent::Page(page) => pages.push(page.into_entry()),
                other => {
                    self.flush_pages(&mut pages, &mut notices);
                    notices.push(self.apply_import_event(other));
                }
            }
        }
        self.flush_pages(&mut pages, &mut notices);

        notices
    }

    /// Wait until the running batch finishes and return its summary.
    ///
    /// Returns `None` if no batch was running.
    pub async fn wait_for_import(&mut self) -> Option<ImportSummary> {
        while self.is_importing() {
            let event = self.recv_import_event().await;
            if let ImportNotice::Finished(summary) = self.handle_import_event(event) {
                return Some(summary);
            }
        }
        None
    }

    fn flush_pages(&mut self, pages: &mut Vec<PageEntry>, notices: &mut Vec<ImportNotice>) {
        if !pages.is_empty() {
            self.list.extend(pages.drain(..));
            notices.push(ImportNotice::Progress);
        }
    }

    fn apply_import_event(&mut self, event: ImportEvent) -> ImportNotice {
        match event {
            ImportEvent::Page(page) => {
                self.list.append(page.into_entry());
                ImportNotice::Progress
            }
            ImportEvent::FileStarted { .. } => ImportNotice::Progress,
            ImportEvent::FileFailed(err) => ImportNotice::Failed(err),
            ImportEvent::Finished(summary) => {
                self.import = None;
                self.last_import = Some(summary.clone());
                ImportNotice::Finished(summary)
            }
        }
    }

    // Editing

    /// Move the entry at `index` to the trash and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCollateError::Index`] if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Result<EntryId> {
        let entry = self.list.remove_at(index)?;
        let id = entry.id();
        debug!(%id, label = entry.label(), "Moved page to trash");
        self.trash.discard(entry);
        Ok(id)
    }

    /// Bring the entry with `id` back from the trash, appending it to the
    /// list. Returns its new position, or `None` if it is not in the trash.
    pub fn restore(&mut self, id: EntryId) -> Option<usize> {
        let entry = self.trash.restore(id)?;
        debug!(%id, "Restored page");
        self.list.append(entry);
        Some(self.list.len() - 1)
    }

    /// Bring back the most recently trashed entry.
    pub fn restore_latest(&mut self) -> Option<EntryId> {
        let entry = self.trash.restore_latest()?;
        let id = entry.id();
        self.list.append(entry);
        Some(id)
    }

    /// Move the entry at `from` so it ends up at `to`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCollateError::Index`] if either index is out of bounds.
    pub fn move_entry(&mut self, from: usize, to: usize) -> Result<()> {
        self.list.move_to(from, to)
    }

    // Export

    /// Merge the list into a PDF at `destination`.
    ///
    /// # Errors
    ///
    /// - [`PdfCollateError::ImportInProgress`] while a batch is running
    /// - Any error of [`Exporter::export`]
    pub async fn export(&self, destination: &Path) -> Result<ExportStatistics> {
        if self.is_importing() {
            return Err(PdfCollateError::ImportInProgress);
        }
        self.exporter.export(self.list.entries(), destination).await
    }
}
