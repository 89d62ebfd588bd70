//! Tagged server payloads.
//!
//! The backend sometimes delivers a FastAPI error body (`{"detail": ...}`)
//! where data was expected, even with a 2xx status. [`Payload`] forces
//! callers to handle both shapes before any data reaches the view.

use serde::{Deserialize, Serialize};

/// FastAPI-style error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: serde_json::Value,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: serde_json::Value::String(detail.into()),
        }
    }

    /// Human-readable text: plain strings as-is, validation error lists
    /// as their joined `msg` fields, anything else as compact JSON.
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(items) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if msgs.is_empty() {
                    self.detail.to_string()
                } else {
                    msgs.join("; ")
                }
            }
            other => other.to_string(),
        }
    }
}

/// Either the expected data or an error body.
///
/// The error shape is tried first: data types whose fields all have
/// defaults would otherwise accept an error body as empty data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Payload<T> {
    Error(ErrorDetail),
    Data(T),
}
