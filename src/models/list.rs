//! One page of the event list.

use serde::{Deserialize, Serialize};

use super::EventRecord;

/// A page of records plus the pagination totals for the active filter.
/// Replaced wholesale on every successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage {
    #[serde(rename = "cves")]
    pub records: Vec<EventRecord>,
    pub total_pages: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_records: Option<u64>,
}

impl ListPage {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
