//! The ordered page list.
//!
//! The order of the list is the order of the merged document. Every
//! structural mutation relabels all entries and bumps [`PageList::revision`].

use super::entry::{EntryId, PageEntry};
use crate::{PdfCollateError, Result};

/// Ordered sequence of page entries.
#[derive(Debug, Default)]
pub struct PageList {
    entries: Vec<PageEntry>,
    revision: u64,
}

impl PageList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry at the end.
    pub fn append(&mut self, entry: PageEntry) {
        self.entries.push(entry);
        self.changed();
    }

    /// Add a batch of entries at the end, preserving their order.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = PageEntry>) {
        let before = self.entries.len();
        self.entries.extend(entries);
        if self.entries.len() != before {
            self.changed();
        }
    }

    /// Remove and return the entry at `index`, shifting later entries left.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCollateError::Index`] if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> Result<PageEntry> {
        self.check(index)?;
        let entry = self.entries.remove(index);
        self.changed();
        Ok(entry)
    }

    /// Move the entry at `source` so that it ends up at `target`.
    ///
    /// `target` is a position in the resulting list. Moving an entry onto
    /// its own position changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCollateError::Index`] if either index is out of bounds.
    pub fn move_to(&mut self, source: usize, target: usize) -> Result<()> {
        self.check(source)?;
        self.check(target)?;
        if source == target {
            return Ok(());
        }

        let entry = self.entries.remove(source);
        self.entries.insert(target, entry);
        self.changed();
        Ok(())
    }

    /// Read-only ordered view of all entries.
    pub fn entries(&self) -> &[PageEntry] {
        &self.entries
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&PageEntry> {
        self.entries.get(index)
    }

    /// Current position of the entry with `id`.
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id() == id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PageEntry> {
        self.entries.iter()
    }

    /// Counter bumped on every structural mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn check(&self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(PdfCollateError::index(index, self.entries.len()));
        }
        Ok(())
    }

    fn changed(&mut self) {
        for (position, entry) in self.entries.iter_mut().enumerate() {
            entry.relabel(position);
        }
        self.revision += 1;
    }
}

impl<'a> IntoIterator for &'a PageList {
    type Item = &'a PageEntry;
    type IntoIter = std::slice::Iter<'a, PageEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
