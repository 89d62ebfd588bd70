//! The dashboard's error taxonomy.

use thiserror::Error;

use super::ErrorCategory;
use crate::traits::{HttpError, SaveError, SessionError};

/// Failure of a backend call or of the flows built on top of one.
///
/// `Clone` so a failure can be stored in a resource's `Failed` state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// No token, an expired token, or a 401 from the backend.
    #[error("Not authenticated")]
    Unauthenticated,

    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response (or an error-shaped body) from a JSON endpoint.
    #[error("Server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    /// The CSV export failed. `status` is absent when the download
    /// succeeded but the file could not be saved.
    #[error("Export failed: {detail}")]
    ExportFailed { status: Option<u16>, detail: String },

    /// A 2xx response whose body did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rejected locally before any request was sent.
    #[error("{0}")]
    InvalidInput(String),

    /// The session token could not be persisted or erased.
    #[error("Session storage error: {0}")]
    Session(String),
}

impl ApiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Unauthenticated => ErrorCategory::Auth,
            ApiError::Network(_) => ErrorCategory::Network,
            ApiError::Server { .. } => ErrorCategory::Server,
            ApiError::ExportFailed { .. } => ErrorCategory::Export,
            ApiError::InvalidResponse(_) => ErrorCategory::Client,
            ApiError::InvalidInput(_) => ErrorCategory::User,
            ApiError::Session(_) => ErrorCategory::Client,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// True when the session must be dropped and the user sent to log in.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, ApiError::Unauthenticated)
    }

    /// Text for the notice shown to the analyst.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthenticated => "Your session has ended. Please log in again.".to_string(),
            ApiError::Network(_) => "Failed to fetch data. Please try again.".to_string(),
            ApiError::Server { detail, .. } => format!("Failed to fetch data: {}", detail),
            ApiError::ExportFailed { .. } => "Failed to export CSV. Please try again.".to_string(),
            ApiError::InvalidResponse(msg) => msg.clone(),
            ApiError::InvalidInput(msg) => msg.clone(),
            ApiError::Session(_) => "Could not store the session token.".to_string(),
        }
    }
}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        ApiError::Network(e.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        ApiError::Session(e.to_string())
    }
}

impl From<SaveError> for ApiError {
    fn from(e: SaveError) -> Self {
        ApiError::ExportFailed {
            status: None,
            detail: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ApiError::Unauthenticated.to_string(), "Not authenticated");
        assert_eq!(
            ApiError::Server {
                status: 500,
                detail: "db down".to_string()
            }
            .to_string(),
            "Server error (500): db down"
        );
        assert_eq!(
            ApiError::ExportFailed {
                status: Some(500),
                detail: "boom".to_string()
            }
            .to_string(),
            "Export failed: boom"
        );
        assert_eq!(
            ApiError::InvalidInput("Passwords do not match.".to_string()).to_string(),
            "Passwords do not match."
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(ApiError::Unauthenticated.category(), ErrorCategory::Auth);
        assert_eq!(ApiError::Network("x".into()).category(), ErrorCategory::Network);
        assert_eq!(
            ApiError::ExportFailed { status: None, detail: "x".into() }.category(),
            ErrorCategory::Export
        );
        assert_eq!(ApiError::InvalidInput("x".into()).category(), ErrorCategory::User);
    }

    #[test]
    fn test_only_unauthenticated_requires_reauth() {
        assert!(ApiError::Unauthenticated.requires_reauth());
        assert!(!ApiError::Server { status: 403, detail: "Forbidden".into() }.requires_reauth());
        assert!(!ApiError::Network("down".into()).requires_reauth());
    }

    #[test]
    fn test_retry_logic() {
        assert!(ApiError::Network("down".into()).is_retryable());
        assert!(ApiError::Server { status: 500, detail: "x".into() }.is_retryable());
        assert!(!ApiError::Unauthenticated.is_retryable());
        assert!(!ApiError::InvalidInput("x".into()).is_retryable());
    }

    #[test]
    fn test_conversions() {
        let net: ApiError = HttpError::Timeout("30s".to_string()).into();
        assert_eq!(net, ApiError::Network("Request timeout: 30s".to_string()));

        let save: ApiError = SaveError::WriteFailed {
            file_name: "cve_data.csv".to_string(),
            message: "read-only".to_string(),
        }
        .into();
        assert!(matches!(save, ApiError::ExportFailed { status: None, .. }));

        let session: ApiError = SessionError::WriteFailed("disk full".to_string()).into();
        assert!(matches!(session, ApiError::Session(_)));
    }
}
