use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by Ride Insights.
#[derive(Error, Debug)]
pub enum InsightsError {
    /// A required column is absent from the input file.
    #[error("Required column missing from dataset: {column}")]
    Schema { column: String },

    /// Filter criteria are malformed (e.g. inverted date range).
    #[error("Invalid filter criteria: {0}")]
    Validation(String),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV record could not be decoded at all.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The dataset file does not exist at any known location.
    #[error("Dataset file not found: {0}")]
    DataFileNotFound(PathBuf),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the insights crates.
pub type Result<T> = std::result::Result<T, InsightsError>;
