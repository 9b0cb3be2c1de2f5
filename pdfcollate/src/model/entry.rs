//! Page entries and their identities.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::render::Thumbnail;

static NEXT_ENTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a page entry.
///
/// Ids are unique for the lifetime of the process and never reused, so an id
/// keeps naming the same entry while it travels between the page list and
/// the trash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u64);

impl EntryId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_ENTRY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for logging.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One page of one source file, shown as a row of the page list.
///
/// An entry is not `Clone`: it exists exactly once and is moved between the
/// page list and the trash. Adding the same page again creates a new entry
/// with a new id.
#[derive(Debug)]
pub struct PageEntry {
    id: EntryId,
    source: Arc<Path>,
    page_index: usize,
    thumbnail: Option<Thumbnail>,
    label: String,
}

impl PageEntry {
    /// Create an entry for page `page_index` (zero-based) of `source`.
    ///
    /// The label is provisional until the entry is placed in a list.
    pub fn new(source: Arc<Path>, page_index: usize, thumbnail: Option<Thumbnail>) -> Self {
        let mut entry = Self {
            id: EntryId::next(),
            source,
            page_index,
            thumbnail,
            label: String::new(),
        };
        entry.label = entry.describe();
        entry
    }

    /// Stable identity of this entry.
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Path of the originating PDF.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Shared handle to the source path.
    pub fn source_arc(&self) -> &Arc<Path> {
        &self.source
    }

    /// Zero-based page index in the source.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// 1-based page number, as shown to the user.
    pub fn page_number(&self) -> usize {
        self.page_index + 1
    }

    /// Rendered preview, if rendering succeeded.
    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnail.as_ref()
    }

    /// Display label including the list position.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// File name of the source without its directory.
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    /// Whether this entry references the same page as `other`.
    pub fn same_page_as(&self, other: &PageEntry) -> bool {
        self.page_index == other.page_index && self.source == other.source
    }

    /// Label text without the position prefix.
    pub fn describe(&self) -> String {
        format!("{} — Page {}", self.file_name(), self.page_number())
    }

    pub(crate) fn relabel(&mut self, position: usize) {
        self.label = format!("{}. {}", position + 1, self.describe());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn source(name: &str) -> Arc<Path> {
        Arc::from(PathBuf::from(format!("/docs/{name}")).as_path())
    }

    #[test]
    fn test_ids_are_unique() {
        let a = PageEntry::new(source("a.pdf"), 0, None);
        let b = PageEntry::new(source("a.pdf"), 0, None);
        assert_ne!(a.id(), b.id());
        assert!(a.same_page_as(&b));
    }

    #[test]
    fn test_label_uses_one_based_numbers() {
        let mut entry = PageEntry::new(source("report.pdf"), 2, None);
        assert_eq!(entry.label(), "report.pdf — Page 3");

        entry.relabel(0);
        assert_eq!(entry.label(), "1. report.pdf — Page 3");
    }

    #[test]
    fn test_file_name() {
        let entry = PageEntry::new(source("scan.pdf"), 0, None);
        assert_eq!(entry.file_name(), "scan.pdf");
        assert_eq!(entry.source(), Path::new("/docs/scan.pdf"));
        assert_eq!(entry.page_number(), 1);
    }

    #[test]
    fn test_entry_id_display() {
        let id = EntryId::next();
        assert_eq!(id.to_string(), format!("#{}", id.get()));
    }
}
