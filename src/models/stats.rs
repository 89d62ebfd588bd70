//! Aggregate statistics over the whole catalog.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts over the entire dataset, independent of the list filter and page.
///
/// Both maps are ordered by key; date keys are ISO-formatted (`YYYY-MM`
/// buckets from the backend), so key order is chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(rename = "cves_per_event", default)]
    pub counts_by_event: BTreeMap<String, u64>,
    #[serde(rename = "cves_over_time", default)]
    pub counts_by_date: BTreeMap<String, u64>,
}

impl StatsSnapshot {
    pub fn total_events(&self) -> u64 {
        self.counts_by_event.values().sum()
    }
}
