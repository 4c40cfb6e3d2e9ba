use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the viewing statistics pipeline.
#[derive(Error, Debug)]
pub enum ViewingError {
    /// A required raw input file could not be located.
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A spreadsheet could not be opened or has no readable worksheet.
    #[error("Failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    /// The viewing activity export produced zero columns.
    #[error("Viewing activity export has no columns: {0}")]
    EmptySheet(PathBuf),

    /// A delimited file could not be parsed or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An aggregate artifact could not be written.
    #[error("Failed to write artifact {path}: {source}")]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The run summary could not be serialised.
    #[error("Failed to serialize JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

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

/// Convenience alias used throughout the viewing crates.
pub type Result<T> = std::result::Result<T, ViewingError>;
