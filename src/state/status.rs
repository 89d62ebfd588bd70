//! Per-resource request status.

use crate::error::ApiError;

/// Lifecycle of one asynchronous resource (`list`, `stats` or `export`).
///
/// While loading, the previously ready value stays visible through
/// [`RequestStatus::data`]. A failure discards it.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestStatus<T> {
    Idle,
    Loading { previous: Option<T> },
    Ready(T),
    Failed(ApiError),
}

impl<T> Default for RequestStatus<T> {
    fn default() -> Self {
        RequestStatus::Idle
    }
}

impl<T> RequestStatus<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, RequestStatus::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestStatus::Loading { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, RequestStatus::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RequestStatus::Failed(_))
    }

    /// The value to render: the ready value, or the one still shown while
    /// its replacement loads.
    pub fn data(&self) -> Option<&T> {
        match self {
            RequestStatus::Ready(value) => Some(value),
            RequestStatus::Loading { previous } => previous.as_ref(),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            RequestStatus::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Idle => "idle",
            RequestStatus::Loading { .. } => "loading",
            RequestStatus::Ready(_) => "ready",
            RequestStatus::Failed(_) => "failed",
        }
    }

    /// Enter `loading`, carrying over whatever is currently displayed.
    pub fn begin_loading(&mut self) {
        let previous = match std::mem::take(self) {
            RequestStatus::Ready(value) => Some(value),
            RequestStatus::Loading { previous } => previous,
            RequestStatus::Idle | RequestStatus::Failed(_) => None,
        };
        *self = RequestStatus::Loading { previous };
    }

    /// Settle with a result. Success replaces the value wholesale; failure
    /// drops it.
    pub fn resolve(&mut self, result: Result<T, ApiError>) {
        *self = match result {
            Ok(value) => RequestStatus::Ready(value),
            Err(err) => RequestStatus::Failed(err),
        };
    }

    pub fn reset(&mut self) {
        *self = RequestStatus::Idle;
    }
}
