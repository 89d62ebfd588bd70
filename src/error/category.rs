//! Error category classification.
//!
//! Categories decide how a failure is surfaced: whether the analyst can
//! simply retry, must sign in again, or must fix their input.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Transport failures (connection refused, DNS, timeout).
    Network,

    /// Missing, expired or rejected session token.
    /// Forces a logout and a return to the login surface.
    Auth,

    /// The backend answered with a non-2xx JSON response.
    Server,

    /// The CSV export endpoint failed or the file could not be saved.
    Export,

    /// The backend answered with a payload we could not interpret.
    Client,

    /// Invalid input on a login or signup form.
    User,
}

impl ErrorCategory {
    /// Returns true if re-issuing the triggering action may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCategory::Network | ErrorCategory::Server | ErrorCategory::Export
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Export => "export",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
        }
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your connection to the API and try again",
            ErrorCategory::Auth => "Please log in again",
            ErrorCategory::Server => {
                "The server may be experiencing issues. Change the filter or page to retry"
            }
            ErrorCategory::Export => "Try the export again",
            ErrorCategory::Client => "The server response was not understood",
            ErrorCategory::User => "Please check your input and try again",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
