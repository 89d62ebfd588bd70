//! The current session token.
//!
//! One `SessionStore` is created at startup and shared (behind an `Arc`)
//! with the gateway and the orchestrator. Nothing else reads the backing
//! storage directly.

use std::sync::RwLock;
use tracing::{debug, info, warn};

use super::token::{decode_claims, TokenClaims};
use crate::traits::{SessionError, SessionStorage};

pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    token: RwLock<Option<String>>,
}

impl SessionStore {
    /// Load the persisted token, discarding it if it has visibly expired.
    ///
    /// A storage read failure is treated as "no session".
    pub fn initialize<S: SessionStorage + 'static>(storage: S) -> Self {
        let persisted = match storage.read() {
            Ok(token) => token,
            Err(e) => {
                warn!("Could not read persisted session: {}", e);
                None
            }
        };

        let store = Self {
            storage: Box::new(storage),
            token: RwLock::new(persisted),
        };
        // Validates and erases an expired token.
        let present = store.token().is_some();
        debug!("Session initialized (token present: {})", present);
        store
    }

    /// The current token, or `None` if absent or expired.
    pub fn token(&self) -> Option<String> {
        let current = self
            .token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()?;

        let expired = decode_claims(&current).is_some_and(|claims| claims.is_expired());
        if expired {
            info!("Session token expired, clearing session");
            self.clear();
            return None;
        }
        Some(current)
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    /// Persist and adopt `token`. On a storage failure the previous
    /// session stays in effect. An empty token clears the session.
    pub fn set_token(&self, token: &str) -> Result<(), SessionError> {
        let token = token.trim();
        if token.is_empty() {
            self.clear();
            return Ok(());
        }

        self.storage.write(token)?;
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        debug!("Session token set");
        Ok(())
    }

    /// Drop the session. The in-memory token is always cleared, even if
    /// erasing the persisted copy fails.
    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        if let Err(e) = self.storage.erase() {
            warn!("Could not erase persisted session: {}", e);
        }
    }

    pub fn claims(&self) -> Option<TokenClaims> {
        self.token().as_deref().and_then(decode_claims)
    }

    /// Who is signed in, when the token says.
    pub fn subject(&self) -> Option<String> {
        self.claims().and_then(|claims| claims.sub)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let present = self
            .token
            .read()
            .map(|t| t.is_some())
            .unwrap_or(false);
        f.debug_struct("SessionStore")
            .field("token_present", &present)
            .finish()
    }
}
