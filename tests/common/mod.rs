//! Common test utilities for integration tests.
//!
//! Every test talks to a `wiremock` server through the real
//! `ReqwestHttpClient`, with the session held in memory.

#![allow(dead_code)]

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::mpsc;
use wiremock::MockServer;

use cvedash::adapters::{InMemorySession, ReqwestHttpClient};
use cvedash::auth::SessionStore;
use cvedash::gateway::ApiGateway;
use cvedash::orchestrator::{DataMessage, DataOrchestrator};

/// A JWT carrying `claims`. The signature is not checked client-side.
pub fn jwt(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.test-signature", header, payload)
}

/// Token for `analyst@example.com` that expires far in the future.
pub fn test_token() -> String {
    jwt(json!({"sub": "analyst@example.com", "exp": 4_102_444_800i64}))
}

pub fn expired_token() -> String {
    jwt(json!({"sub": "analyst@example.com", "exp": 946_684_800i64}))
}

pub fn bearer() -> String {
    format!("Bearer {}", test_token())
}

pub fn event(id: u64, cve_id: &str, event_name: &str) -> Value {
    json!({
        "id": id,
        "cve_id": cve_id,
        "event_name": event_name,
        "source_identifier": "nvd@nist.gov",
        "created": "2024-01-15T10:00:00",
        "details": [{"action": "Added", "type": "CVSS V3.1", "newValue": "9.8"}]
    })
}

pub fn list_body(events: Vec<Value>, total_pages: u32) -> Value {
    json!({
        "page": 1,
        "page_size": 10,
        "total_records": events.len(),
        "total_pages": total_pages,
        "cves": events
    })
}

pub fn stats_body() -> Value {
    json!({
        "cves_per_event": {"Initial Analysis": 4, "CVE Modified": 9},
        "cves_over_time": {"2024-02": 6, "2024-01": 7}
    })
}

pub struct Stack {
    pub storage: InMemorySession,
    pub session: Arc<SessionStore>,
    pub gateway: Arc<ApiGateway<ReqwestHttpClient>>,
}

/// Session, gateway and HTTP client pointed at `server`.
pub fn stack(server: &MockServer, token: Option<&str>) -> Stack {
    let storage = match token {
        Some(token) => InMemorySession::with_token(token),
        None => InMemorySession::new(),
    };
    let session = Arc::new(SessionStore::initialize(storage.clone()));
    let gateway = Arc::new(ApiGateway::new(
        server.uri(),
        ReqwestHttpClient::new(),
        Arc::clone(&session),
    ));
    Stack {
        storage,
        session,
        gateway,
    }
}

pub fn orchestrator(
    stack: &Stack,
) -> (
    DataOrchestrator<ReqwestHttpClient>,
    mpsc::UnboundedReceiver<DataMessage>,
) {
    DataOrchestrator::new(Arc::clone(&stack.gateway))
}
