//! Recording file saver for testing.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::traits::{FileSaver, SaveError};

/// A file handed to the saver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// Keeps saved files in memory instead of touching disk.
#[derive(Debug, Clone, Default)]
pub struct RecordingSaver {
    saved: Arc<Mutex<Vec<SavedFile>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl RecordingSaver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Vec<SavedFile> {
        self.saved.lock().unwrap().clone()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }
}

impl FileSaver for RecordingSaver {
    fn save(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf, SaveError> {
        if *self.should_fail.lock().unwrap() {
            return Err(SaveError::WriteFailed {
                file_name: file_name.to_string(),
                message: "Mock save failure".to_string(),
            });
        }
        self.saved.lock().unwrap().push(SavedFile {
            file_name: file_name.to_string(),
            contents: contents.to_vec(),
        });
        Ok(PathBuf::from(file_name))
    }
}
