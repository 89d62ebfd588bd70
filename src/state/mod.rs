//! View state owned by the dashboard core.
//!
//! - [`QueryState`]: draft/applied filter and page cursor
//! - [`RequestStatus`]: `idle | loading | ready | failed` per resource

pub mod query;
pub mod status;

pub use query::{Filter, FilterPatch, QueryKey, QueryState};
pub use status::RequestStatus;
