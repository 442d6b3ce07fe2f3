//! Error types for record I/O and table files.

use std::path::{Path, PathBuf};

use moji_core::ConvertError;
use moji_model::ConfigError;
use thiserror::Error;

/// Errors that can occur while reading or writing files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Encoding Errors ===
    /// Encoding label not recognized.
    #[error("unsupported encoding '{encoding}' for {path}")]
    UnsupportedEncoding { path: PathBuf, encoding: String },

    // === CSV Errors ===
    /// Failed to parse or serialize delimited records.
    #[error("CSV error in {path}: {message}")]
    Csv { path: PathBuf, message: String },

    /// Required column not found in a headed file.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    // === Wrapped Errors ===
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("conversion table {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: ConvertError,
    },
}

impl IngestError {
    pub(crate) fn read(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub(crate) fn write(path: &Path, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path, err: &csv::Error) -> Self {
        Self::Csv {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
