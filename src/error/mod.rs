//! Error handling for the dashboard core.
//!
//! | Error | Category | Effect |
//! |-------|----------|--------|
//! | `Unauthenticated` | Auth | forced logout, back to login |
//! | `Network` | Network | resource goes `failed`, retry by re-triggering |
//! | `Server` | Server | resource goes `failed`, retry by re-triggering |
//! | `ExportFailed` | Export | one-shot notice, list/stats untouched |
//!
//! No error is fatal; every failure is recovered by repeating the action
//! that triggered it.

mod api;
mod category;

pub use api::ApiError;
pub use category::ErrorCategory;

/// Result alias used across the crate.
pub type ApiResult<T> = Result<T, ApiError>;
