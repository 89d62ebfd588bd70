//! File-save trait abstraction.
//!
//! The export flow hands the downloaded CSV to a [`FileSaver`], the
//! terminal analogue of the browser's download mechanism.

use std::path::PathBuf;
use thiserror::Error;

/// File-save errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SaveError {
    #[error("Failed to save {file_name}: {message}")]
    WriteFailed { file_name: String, message: String },
}

pub trait FileSaver: Send + Sync {
    /// Store `contents` under `file_name` and return where it landed.
    fn save(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf, SaveError>;
}
