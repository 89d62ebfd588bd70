//! Gateway tests against a wiremock backend.
//!
//! Covers the filter encoding rule (empty fields are omitted, not sent
//! blank), bearer headers and the status-to-error mapping.

mod common;

use common::{bearer, event, list_body, stack, stats_body, test_token};
use cvedash::error::ApiError;
use cvedash::state::Filter;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn recorded_queries(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.query().unwrap_or("").to_string())
        .collect()
}

#[tokio::test]
async fn test_empty_filter_sends_only_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cves"))
        .and(query_param("page", "1"))
        .and(query_param_is_missing("cve_id"))
        .and(query_param_is_missing("event_name"))
        .and(header("Authorization", bearer().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![], 0)))
        .expect(2)
        .mount(&server)
        .await;

    let token = test_token();
    let stack = stack(&server, Some(&token));
    stack.gateway.list_events(1, &Filter::default()).await.unwrap();
    stack
        .gateway
        .list_events(1, &Filter::new("   ", "\t"))
        .await
        .unwrap();

    for query in recorded_queries(&server).await {
        assert_eq!(query, "page=1");
    }
}

#[tokio::test]
async fn test_cve_id_only_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cves"))
        .and(query_param("cve_id", "CVE-2024-1"))
        .and(query_param_is_missing("event_name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(
            vec![event(1, "CVE-2024-1", "Initial Analysis")],
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let token = test_token();
    let stack = stack(&server, Some(&token));
    let page = stack
        .gateway
        .list_events(1, &Filter::new(" CVE-2024-1 ", ""))
        .await
        .unwrap();

    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].cve_id, "CVE-2024-1");
    assert_eq!(page.records[0].id, "1");
    let queries = recorded_queries(&server).await;
    assert!(queries[0].contains("cve_id=CVE-2024-1"));
    assert!(!queries[0].contains("event_name"));
}

#[tokio::test]
async fn test_stats_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats"))
        .and(header("Authorization", bearer().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(stats_body()))
        .mount(&server)
        .await;

    let token = test_token();
    let stack = stack(&server, Some(&token));
    let snapshot = stack.gateway.fetch_stats().await.unwrap();

    assert_eq!(snapshot.counts_by_event.get("CVE Modified"), Some(&9));
    assert_eq!(snapshot.total_events(), 13);
    let months: Vec<_> = snapshot.counts_by_date.keys().cloned().collect();
    assert_eq!(months, vec!["2024-01", "2024-02"]);
}

#[tokio::test]
async fn test_401_maps_to_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cves"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"detail": "Could not validate credentials"})),
        )
        .mount(&server)
        .await;

    let token = test_token();
    let stack = stack(&server, Some(&token));
    let err = stack
        .gateway
        .list_events(1, &Filter::default())
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::Unauthenticated);
    assert!(err.requires_reauth());
}

#[tokio::test]
async fn test_500_maps_to_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({"detail": "boom"})),
        )
        .mount(&server)
        .await;

    let token = test_token();
    let stack = stack(&server, Some(&token));
    let err = stack.gateway.fetch_stats().await.unwrap_err();

    assert_eq!(
        err,
        ApiError::Server {
            status: 500,
            detail: "boom".to_string()
        }
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_no_token_sends_nothing() {
    let server = MockServer::start().await;

    let stack = stack(&server, None);
    let err = stack.gateway.fetch_stats().await.unwrap_err();

    assert_eq!(err, ApiError::Unauthenticated);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let token = test_token();
    let storage = cvedash::adapters::InMemorySession::with_token(&token);
    let session = std::sync::Arc::new(cvedash::auth::SessionStore::initialize(storage));
    // Nothing listens on this port.
    let gateway = cvedash::gateway::ApiGateway::new(
        "http://127.0.0.1:59999",
        cvedash::adapters::ReqwestHttpClient::new(),
        session,
    );

    let err = gateway.fetch_stats().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_export_encodes_filter_without_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/export"))
        .and(query_param("event_name", "CVE Modified"))
        .and(query_param_is_missing("page"))
        .and(query_param_is_missing("cve_id"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/csv")
                .set_body_string("ID,CVE ID\n1,CVE-2024-1\n"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let token = test_token();
    let stack = stack(&server, Some(&token));
    let bytes = stack
        .gateway
        .export_csv(&Filter::new("", "CVE Modified"))
        .await
        .unwrap();

    assert_eq!(&bytes[..], b"ID,CVE ID\n1,CVE-2024-1\n");
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "OK"})))
        .mount(&server)
        .await;

    let stack = stack(&server, None);
    assert_eq!(stack.gateway.health_check().await, Ok(true));
}
