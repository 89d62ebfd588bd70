//! Authenticated access to the event-catalog data endpoints.
//!
//! Every data call reads the bearer token from the shared
//! [`SessionStore`] at call time and fails with
//! [`ApiError::Unauthenticated`] when there is none.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

use crate::auth::SessionStore;
use crate::error::{ApiError, ApiResult};
use crate::models::{ErrorDetail, ListPage, Payload, StatsSnapshot};
use crate::state::Filter;
use crate::traits::{Headers, HttpClient, Response};

/// Percent-encode `key=value` pairs joined with `&`.
pub fn encode_pairs(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Query string for `GET /cves`.
pub fn list_query(page: u32, filter: &Filter) -> String {
    let page = page.to_string();
    let mut pairs = vec![("page", page.as_str())];
    pairs.extend(filter.query_pairs());
    encode_pairs(&pairs)
}

/// Query string for `GET /export`: the list encoding without a page.
pub fn export_query(filter: &Filter) -> String {
    encode_pairs(&filter.query_pairs())
}

/// Error text from a non-2xx body, or `fallback` when it has none.
pub(crate) fn error_detail(response: &Response, fallback: &str) -> String {
    response
        .json::<ErrorDetail>()
        .map(|body| body.message())
        .ok()
        .filter(|msg| !msg.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

pub struct ApiGateway<C> {
    base_url: String,
    http: C,
    session: Arc<SessionStore>,
}

impl<C: HttpClient> ApiGateway<C> {
    pub fn new(base_url: impl Into<String>, http: C, session: Arc<SessionStore>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn auth_headers(&self) -> ApiResult<Headers> {
        let token = self.session.token().ok_or(ApiError::Unauthenticated)?;
        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        headers.insert("Accept".to_string(), "application/json".to_string());
        Ok(headers)
    }

    fn url(&self, path: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        }
    }

    /// GET a JSON endpoint and decode it as a tagged [`Payload`].
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &str) -> ApiResult<T> {
        let headers = self.auth_headers()?;
        let url = self.url(path, query);
        debug!("GET {}", url);

        let response = self.http.get(&url, &headers).await?;
        if response.status == 401 {
            return Err(ApiError::Unauthenticated);
        }
        if !response.is_success() {
            return Err(ApiError::Server {
                status: response.status,
                detail: error_detail(&response, "Request failed"),
            });
        }

        match response.json::<Payload<T>>() {
            Ok(Payload::Data(data)) => Ok(data),
            Ok(Payload::Error(body)) => Err(ApiError::Server {
                status: response.status,
                detail: body.message(),
            }),
            Err(e) => Err(ApiError::InvalidResponse(e.to_string())),
        }
    }

    /// `GET /cves?page=..[&cve_id=..][&event_name=..]`
    pub async fn list_events(&self, page: u32, filter: &Filter) -> ApiResult<ListPage> {
        self.get_json("/cves", &list_query(page, filter)).await
    }

    /// `GET /stats`
    pub async fn fetch_stats(&self) -> ApiResult<StatsSnapshot> {
        self.get_json("/stats", "").await
    }

    /// `GET /export[?cve_id=..][&event_name=..]`, returned as raw bytes.
    ///
    /// Success is decided by the status code alone; the body is never
    /// parsed.
    pub async fn export_csv(&self, filter: &Filter) -> ApiResult<Bytes> {
        let mut headers = self.auth_headers()?;
        headers.insert("Accept".to_string(), "text/csv".to_string());
        let url = self.url("/export", &export_query(filter));
        debug!("GET {}", url);

        let response = self.http.get(&url, &headers).await?;
        if response.status == 401 {
            return Err(ApiError::Unauthenticated);
        }
        if !response.is_success() {
            return Err(ApiError::ExportFailed {
                status: Some(response.status),
                detail: error_detail(&response, "Failed to export CSV"),
            });
        }
        Ok(response.body)
    }

    /// Unauthenticated `GET /status`; true when the backend reports `OK`.
    pub async fn health_check(&self) -> ApiResult<bool> {
        let response = self.http.get(&self.url("/status", ""), &Headers::new()).await?;
        if !response.is_success() {
            return Ok(false);
        }
        let body: serde_json::Value = response
            .json()
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        Ok(body.get("status").and_then(|s| s.as_str()) == Some("OK"))
    }
}
