//! Directory-backed file saver.

use std::fs;
use std::path::{Path, PathBuf};

use crate::traits::{FileSaver, SaveError};

/// Writes files into a fixed directory, overwriting any previous file of
/// the same name.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSaver for DirectorySaver {
    fn save(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf, SaveError> {
        let to_err = |e: std::io::Error| SaveError::WriteFailed {
            file_name: file_name.to_string(),
            message: e.to_string(),
        };

        fs::create_dir_all(&self.dir).map_err(to_err)?;
        let path = self.dir.join(file_name);
        fs::write(&path, contents).map_err(to_err)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_writes_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let saver = DirectorySaver::new(temp_dir.path().join("exports"));

        let path = saver.save("cve_data.csv", b"ID,CVE ID\n1,CVE-2024-1\n").unwrap();

        assert_eq!(path, temp_dir.path().join("exports").join("cve_data.csv"));
        assert_eq!(fs::read(&path).unwrap(), b"ID,CVE ID\n1,CVE-2024-1\n");
    }

    #[test]
    fn test_save_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let saver = DirectorySaver::new(temp_dir.path());

        saver.save("cve_data.csv", b"old").unwrap();
        let path = saver.save("cve_data.csv", b"new").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"new");
    }

    #[test]
    fn test_save_into_file_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();

        let saver = DirectorySaver::new(&blocker);
        let err = saver.save("cve_data.csv", b"data").unwrap_err();
        assert!(matches!(err, SaveError::WriteFailed { ref file_name, .. } if file_name == "cve_data.csv"));
    }
}
