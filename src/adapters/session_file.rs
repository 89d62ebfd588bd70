//! Session-scoped token file.
//!
//! The token is kept under the user's runtime directory
//! (`$XDG_RUNTIME_DIR/cvedash/session-token` on Linux), which the OS wipes
//! when the login session ends. Platforms without a runtime directory fall
//! back to the system temp dir.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::traits::{SessionError, SessionStorage};

const SESSION_DIR: &str = "cvedash";
const SESSION_FILE: &str = "session-token";

#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    /// Token file under the default session directory.
    pub fn new() -> Self {
        let base = dirs::runtime_dir().unwrap_or_else(std::env::temp_dir);
        Self::in_dir(base.join(SESSION_DIR))
    }

    /// Token file inside `dir` (used for `CVEDASH_SESSION_DIR` and tests).
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for SessionFile {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStorage for SessionFile {
    fn read(&self) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::ReadFailed(e.to_string())),
        }
    }

    fn write(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SessionError::WriteFailed(e.to_string()))?;
        }
        fs::write(&self.path, token).map_err(|e| SessionError::WriteFailed(e.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|e| SessionError::WriteFailed(e.to_string()))?;
        }
        Ok(())
    }

    fn erase(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::EraseFailed(e.to_string())),
        }
    }
}
