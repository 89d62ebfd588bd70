//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST)
//! - [`SessionStorage`] - Session-scoped token persistence
//! - [`FileSaver`] - Destination for exported files

pub mod file_saver;
pub mod http;
pub mod session;

pub use file_saver::{FileSaver, SaveError};
pub use http::{Headers, HttpClient, HttpError, Response};
pub use session::{SessionError, SessionStorage};
