//! Error types for pdfcollate.
//!
//! This module defines all error types that can occur while importing pages,
//! editing the page list, and exporting the merged document. Errors are
//! designed to be shown to the user as they are, so every message names the
//! file or index involved.
//!
//! # Error Categories
//!
//! - **Import Errors**: a selected file is not a readable PDF (per file,
//!   never fatal for the batch)
//! - **Export Errors**: nothing to export, a source vanished, the
//!   destination cannot be written
//! - **Model Errors**: list index out of bounds (a defect if it surfaces)
//! - **Session Errors**: an import is already running

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfcollate operations.
pub type Result<T> = std::result::Result<T, PdfCollateError>;

/// Main error type for pdfcollate operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfCollateError {
    /// A file selected for import is not a readable PDF.
    #[error("Cannot read PDF: {}\n  Reason: {reason}", path.display())]
    UnreadableFile {
        /// Path of the rejected file.
        path: PathBuf,
        /// Why the file was rejected.
        reason: String,
    },

    /// Export was requested with an empty page list.
    #[error("There are no pages to export")]
    EmptyInput,

    /// A source referenced by the page list vanished or changed since import.
    #[error(
        "Source file is no longer available: {}\n  Reason: {reason}\n  \
         Hint: remove its pages or add the file again",
        path.display()
    )]
    SourceUnavailable {
        /// Path of the missing or changed source.
        path: PathBuf,
        /// What went wrong while reopening it.
        reason: String,
    },

    /// The destination could not be written.
    #[error("Failed to write output file: {}\n  Reason: {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The destination does not name a file.
    #[error("Not a file name: {}\n  Hint: enter a name such as merged.pdf", path.display())]
    InvalidDestination {
        /// Destination as entered.
        path: PathBuf,
    },

    /// A list position was out of bounds.
    #[error("Index {index} is out of bounds for a list of {len} page(s)")]
    Index {
        /// Requested position.
        index: usize,
        /// Length of the list at the time of the request.
        len: usize,
    },

    /// An import was requested without any files.
    #[error("No files selected for import")]
    NothingToImport,

    /// An import or export was requested while an import is still running.
    #[error("An import is still running; wait for it to finish or cancel it")]
    ImportInProgress,

    /// The operation was cancelled by the user.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// A page could not be rasterized.
    #[error("Failed to render page {} of {}: {reason}", page_index + 1, path.display())]
    Render {
        /// Source file.
        path: PathBuf,
        /// Zero-based page index.
        page_index: usize,
        /// Renderer message.
        reason: String,
    },

    /// The settings file could not be read or written.
    #[error("Settings error at {}: {reason}", path.display())]
    Settings {
        /// Settings file path.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<anyhow::Error> for PdfCollateError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl PdfCollateError {
    /// Create an UnreadableFile error.
    pub fn unreadable_file(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::UnreadableFile {
            path,
            reason: reason.into(),
        }
    }

    /// Create a SourceUnavailable error.
    pub fn source_unavailable(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            path,
            reason: reason.into(),
        }
    }

    /// Create an Index error.
    pub fn index(index: usize, len: usize) -> Self {
        Self::Index { index, len }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error only affects a single file of an import batch.
    ///
    /// Recoverable errors are reported and skipped; the batch goes on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnreadableFile { .. } | Self::Render { .. })
    }

    /// Check if this error is a programming defect rather than a user-facing
    /// condition.
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::Index { .. })
    }

    /// Short title for a message box showing this error.
    pub fn title(&self) -> &'static str {
        match self {
            Self::UnreadableFile { .. } | Self::NothingToImport => "Import",
            Self::EmptyInput
            | Self::SourceUnavailable { .. }
            | Self::Write { .. }
            | Self::InvalidDestination { .. } => "Export",
            Self::ImportInProgress | Self::Cancelled => "Busy",
            Self::Render { .. } => "Thumbnail",
            Self::Settings { .. } | Self::InvalidConfig { .. } => "Configuration",
            Self::Index { .. } | Self::Io { .. } | Self::Other { .. } => "Error",
        }
    }

    /// Message shown in the UI's message box.
    ///
    /// Defects are reported with a hint that this is not the user's fault.
    pub fn user_message(&self) -> String {
        if self.is_defect() {
            format!("Internal error: {self}")
        } else {
            self.to_string()
        }
    }

    /// Get the exit code for this error.
    ///
    /// Only used when the application fails before the interactive session
    /// starts; a session always exits with 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfig { .. } => 2,
            Self::Settings { .. } => 3,
            Self::Io { .. } => 5,
            Self::Cancelled => 130,
            _ => 1,
        }
    }
}
