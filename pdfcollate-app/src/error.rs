use pdfcollate::PdfCollateError;
use thiserror::Error;

/// Errors that end the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No cache directory to write logs to, use --log-dir")]
    LogDirectory,

    #[error("Failed to install logger: {0}")]
    Tracing(String),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error(transparent)]
    Session(#[from] PdfCollateError),
}

impl AppError {
    /// Exit code of the process.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LogDirectory | Self::Tracing(_) => 4,
            Self::Terminal(_) => 5,
            Self::Session(err) => err.exit_code(),
        }
    }
}
