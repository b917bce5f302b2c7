//! Error types for docmail operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid inline image data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Missing required element: {0}")]
    MissingElement(String),

    #[error("No {extension} file found in {}", dir.display())]
    NoSourceFile { dir: PathBuf, extension: String },

    #[error("Unsafe archive entry: {0}")]
    UnsafeArchiveEntry(String),

    #[error("Asset host rejected {}: {detail}", path.display())]
    AssetHost { path: PathBuf, detail: String },
}

pub type Result<T> = std::result::Result<T, Error>;
