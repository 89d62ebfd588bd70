//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`SessionFile`] - Token file in the per-login-session runtime directory
//! - [`DirectorySaver`] - Saves exported files into a directory
//!
//! The [`mock`] submodule provides test doubles for all of them.

pub mod dir_saver;
pub mod mock;
pub mod reqwest_http;
pub mod session_file;

pub use dir_saver::DirectorySaver;
pub use mock::{InMemorySession, MockHttpClient, RecordingSaver};
pub use reqwest_http::ReqwestHttpClient;
pub use session_file::SessionFile;
