//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - HTTP client with configurable (optionally delayed) responses
//! - [`InMemorySession`] - In-memory token storage
//! - [`RecordingSaver`] - File saver that keeps exports in memory

pub mod http;
pub mod saver;
pub mod session;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use saver::{RecordingSaver, SavedFile};
pub use session::InMemorySession;
