//! Holding area for removed entries.

use super::entry::{EntryId, PageEntry};

/// Removed entries, most recently discarded last.
///
/// The trash is unbounded and lives as long as the session.
#[derive(Debug, Default)]
pub struct TrashStore {
    entries: Vec<PageEntry>,
}

impl TrashStore {
    /// Create an empty trash.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put an entry into the trash.
    pub fn discard(&mut self, entry: PageEntry) {
        self.entries.push(entry);
    }

    /// Take the entry with `id` out of the trash.
    pub fn restore(&mut self, id: EntryId) -> Option<PageEntry> {
        self.restore_where(|entry| entry.id() == id)
    }

    /// Take out the most recently discarded entry matching `predicate`.
    pub fn restore_where<F>(&mut self, predicate: F) -> Option<PageEntry>
    where
        F: Fn(&PageEntry) -> bool,
    {
        let index = self.entries.iter().rposition(predicate)?;
        Some(self.entries.remove(index))
    }

    /// Take out the most recently discarded entry.
    pub fn restore_latest(&mut self) -> Option<PageEntry> {
        self.entries.pop()
    }

    /// Read-only view, oldest first.
    pub fn list(&self) -> &[PageEntry] {
        &self.entries
    }

    /// Number of trashed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the trash is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    fn entry(page: usize) -> PageEntry {
        let source: Arc<Path> = Arc::from(PathBuf::from("t.pdf").as_path());
        PageEntry::new(source, page, None)
    }

    #[test]
    fn test_discard_keeps_order() {
        let mut trash = TrashStore::new();
        trash.discard(entry(0));
        trash.discard(entry(1));

        let pages: Vec<_> = trash.list().iter().map(PageEntry::page_index).collect();
        assert_eq!(pages, vec![0, 1]);
    }

    #[test]
    fn test_restore_by_id() {
        let mut trash = TrashStore::new();
        let first = entry(0);
        let id = first.id();
        trash.discard(first);
        trash.discard(entry(1));

        let restored = trash.restore(id).unwrap();
        assert_eq!(restored.id(), id);
        assert_eq!(trash.len(), 1);
        assert!(trash.restore(id).is_none());
    }

    #[test]
    fn test_restore_where_prefers_newest() {
        let mut trash = TrashStore::new();
        let older = entry(4);
        let newer = entry(4);
        let newer_id = newer.id();
        trash.discard(older);
        trash.discard(newer);

        let restored = trash.restore_where(|e| e.page_index() == 4).unwrap();
        assert_eq!(restored.id(), newer_id);
    }

    #[test]
    fn test_restore_latest() {
        let mut trash = TrashStore::new();
        assert!(trash.restore_latest().is_none());

        trash.discard(entry(0));
        trash.discard(entry(1));
        assert_eq!(trash.restore_latest().unwrap().page_index(), 1);
        assert_eq!(trash.restore_latest().unwrap().page_index(), 0);
        assert!(trash.is_empty());
    }
}
