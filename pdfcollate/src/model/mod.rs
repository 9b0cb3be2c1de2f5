//! Page list model.
//!
//! A page list is an ordered sequence of [`PageEntry`] values, each naming
//! one page of one source file. Removed entries go to the [`TrashStore`]
//! and can be restored by their [`EntryId`].

pub mod entry;
pub mod list;
pub mod trash;

pub use entry::{EntryId, PageEntry};
pub use list::PageList;
pub use trash::TrashStore;
