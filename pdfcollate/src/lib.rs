//! pdfcollate - Reorder, trash, restore and merge PDF pages.
//!
//! This library holds everything behind the interactive page list:
//!
//! - An ordered page list model with a recoverable trash
//! - A background import worker rendering page thumbnails
//! - Export of the list into a new PDF, written atomically
//! - Persistent chooser settings
//!
//! Front-ends drive a [`session::Session`] and render its state.
//!
//! # Examples
//!
//! ```no_run
//! use pdfcollate::config::Config;
//! use pdfcollate::render::bind_renderer;
//! use pdfcollate::session::Session;
//! use std::path::{Path, PathBuf};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut session = Session::from_config(&config, bind_renderer(config.thumbnail_scale));
//!
//! session.start_import(vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")])?;
//! session.wait_for_import().await;
//!
//! // Put the last page first, drop the second one, and save.
//! let last = session.list().len() - 1;
//! session.move_entry(last, 0)?;
//! session.remove(1)?;
//! let stats = session.export(Path::new("merged.pdf")).await?;
//! println!("Wrote {} pages", stats.pages);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod io;
pub mod model;
pub mod render;
pub mod session;
pub mod settings;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{PdfCollateError, Result};
pub use model::{EntryId, PageEntry, PageList, TrashStore};
pub use session::Session;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
