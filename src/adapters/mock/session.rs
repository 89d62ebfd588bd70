//! In-memory session storage for testing.

use std::sync::{Arc, Mutex};

use crate::traits::{SessionError, SessionStorage};

/// Session storage kept in memory, with switchable failures.
#[derive(Debug, Clone, Default)]
pub struct InMemorySession {
    token: Arc<Mutex<Option<String>>>,
    write_should_fail: Arc<Mutex<bool>>,
    erase_should_fail: Arc<Mutex<bool>>,
}

impl InMemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds `token`, as if persisted earlier in the session.
    pub fn with_token(token: &str) -> Self {
        let storage = Self::default();
        *storage.token.lock().unwrap() = Some(token.to_string());
        storage
    }

    pub fn stored(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    pub fn set_write_should_fail(&self, should_fail: bool) {
        *self.write_should_fail.lock().unwrap() = should_fail;
    }

    pub fn set_erase_should_fail(&self, should_fail: bool) {
        *self.erase_should_fail.lock().unwrap() = should_fail;
    }
}

impl SessionStorage for InMemorySession {
    fn read(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.lock().unwrap().clone())
    }

    fn write(&self, token: &str) -> Result<(), SessionError> {
        if *self.write_should_fail.lock().unwrap() {
            return Err(SessionError::WriteFailed("Mock write failure".to_string()));
        }
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn erase(&self) -> Result<(), SessionError> {
        if *self.erase_should_fail.lock().unwrap() {
            return Err(SessionError::EraseFailed("Mock erase failure".to_string()));
        }
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}
