//! A single change event from the vulnerability catalog.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::{deserialize_id, deserialize_nullable_string, deserialize_nullable_vec};

/// One entry of an event's change details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDetail {
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub action: String,
    #[serde(rename = "type", default, deserialize_with = "deserialize_nullable_string")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
}

impl ChangeDetail {
    /// The new value when present and non-empty, otherwise the old one.
    pub fn value(&self) -> &str {
        self.new_value
            .as_deref()
            .filter(|v| !v.is_empty())
            .or(self.old_value.as_deref())
            .unwrap_or("")
    }

    /// `"{action}: {type} -> {value}"`
    pub fn summary(&self) -> String {
        format!("{}: {} -> {}", self.action, self.kind, self.value())
    }
}

/// Server-sourced, read-only record of one CVE change event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub cve_id: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub event_name: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub source_identifier: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_nullable_vec")]
    pub details: Vec<ChangeDetail>,
}

impl EventRecord {
    /// One line per change detail, or `"No details found"`.
    pub fn details_summary(&self) -> String {
        if self.details.is_empty() {
            return "No details found".to_string();
        }
        self.details
            .iter()
            .map(ChangeDetail::summary)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn created_display(&self) -> String {
        self.created
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// ISO-8601 timestamps with or without an offset; offsets are normalized to UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(with_offset.naive_utc()));
    }
    raw.parse::<NaiveDateTime>()
        .map(Some)
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(details: serde_json::Value) -> EventRecord {
        serde_json::from_value(json!({
            "id": 7,
            "cve_id": "CVE-2024-0001",
            "event_name": "Initial Analysis",
            "source_identifier": "nvd@nist.gov",
            "created": "2024-01-15T10:20:30.123000",
            "details": details
        }))
        .unwrap()
    }

    #[test]
    fn test_parses_backend_record() {
        let rec = record(json!([
            {"action": "Added", "type": "CVSS V3.1", "newValue": "NIST AV:N"}
        ]));
        assert_eq!(rec.id, "7");
        assert_eq!(rec.cve_id, "CVE-2024-0001");
        assert_eq!(rec.created_display(), "2024-01-15 10:20:30");
        assert_eq!(rec.details.len(), 1);
        assert_eq!(rec.details[0].kind, "CVSS V3.1");
    }

    #[test]
    fn test_details_summary() {
        let rec = record(json!([
            {"action": "Added", "type": "CWE", "newValue": "CWE-79"},
            {"action": "Removed", "type": "Reference", "oldValue": "https://example.com"},
            {"action": "Changed", "type": "Status", "newValue": "", "oldValue": "Received"}
        ]));
        assert_eq!(
            rec.details_summary(),
            "Added: CWE -> CWE-79\nRemoved: Reference -> https://example.com\nChanged: Status -> Received"
        );
    }

    #[test]
    fn test_null_details_and_created() {
        let rec: EventRecord = serde_json::from_value(json!({
            "id": 1,
            "cve_id": "CVE-2023-9",
            "event_name": "CVE Received",
            "source_identifier": null,
            "created": null,
            "details": null
        }))
        .unwrap();
        assert_eq!(rec.details_summary(), "No details found");
        assert_eq!(rec.created_display(), "-");
        assert_eq!(rec.source_identifier, "");
    }

    #[test]
    fn test_created_with_offset_is_normalized() {
        let rec: EventRecord = serde_json::from_value(json!({
            "id": 2,
            "created": "2024-03-01T12:00:00+02:00"
        }))
        .unwrap();
        assert_eq!(rec.created_display(), "2024-03-01 10:00:00");
    }
}
