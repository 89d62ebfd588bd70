//! Authentication for the dashboard.
//!
//! - [`SessionStore`] owns the current bearer token
//! - [`AuthClient`] talks to the login and registration endpoints
//! - [`token`] reads claims out of a JWT without verifying it

pub mod client;
pub mod session;
pub mod token;

pub use client::{AuthClient, LoginOutcome, TokenResponse};
pub use session::SessionStore;
pub use token::{decode_claims, TokenClaims};
