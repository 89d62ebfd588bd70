//! Session token storage trait abstraction.
//!
//! [`SessionStorage`] is where the [`SessionStore`](crate::auth::SessionStore)
//! persists the bearer token. Implementations must scope persistence to the
//! current login session: the token may survive a process restart but not an
//! OS logout or reboot.

use thiserror::Error;

/// Session storage errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Failed to read session: {0}")]
    ReadFailed(String),
    #[error("Failed to write session: {0}")]
    WriteFailed(String),
    #[error("Failed to erase session: {0}")]
    EraseFailed(String),
}

/// Persistent backing for the session token.
pub trait SessionStorage: Send + Sync {
    /// Read the persisted token, `Ok(None)` if none is stored.
    fn read(&self) -> Result<Option<String>, SessionError>;

    /// Persist `token`, replacing any previous value.
    fn write(&self, token: &str) -> Result<(), SessionError>;

    /// Erase the persisted token. Erasing an empty store succeeds.
    fn erase(&self) -> Result<(), SessionError>;
}
