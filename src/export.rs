//! CSV export of the filtered catalog.
//!
//! Runs independently of the list and stats resources: it has its own
//! status and never touches orchestrator state. Failures leave a one-shot
//! notice for the host to display.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::gateway::ApiGateway;
use crate::state::{Filter, RequestStatus};
use crate::traits::{FileSaver, HttpClient};

/// Name every export is saved under.
pub const EXPORT_FILE_NAME: &str = "cve_data.csv";

pub struct ExportCoordinator<C, S> {
    gateway: Arc<ApiGateway<C>>,
    saver: S,
    in_flight: AtomicUsize,
    status: Mutex<RequestStatus<PathBuf>>,
    notice: Mutex<Option<String>>,
}

impl<C: HttpClient, S: FileSaver> ExportCoordinator<C, S> {
    pub fn new(gateway: Arc<ApiGateway<C>>, saver: S) -> Self {
        Self {
            gateway,
            saver,
            in_flight: AtomicUsize::new(0),
            status: Mutex::new(RequestStatus::Idle),
            notice: Mutex::new(None),
        }
    }

    /// Download the CSV for `filter` and save it as [`EXPORT_FILE_NAME`].
    ///
    /// Overlapping calls are allowed; each runs its own request. The status
    /// stays loading while any of them is running and the last one to
    /// finish decides the final status.
    pub async fn trigger_export(&self, filter: &Filter) -> ApiResult<PathBuf> {
        {
            let mut status = self.status();
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            status.begin_loading();
        }

        let result = self.download_and_save(filter).await;

        match &result {
            Ok(path) => info!("Exported CSV to {}", path.display()),
            Err(e) => {
                warn!("Export failed: {}", e);
                *self.notice.lock().unwrap_or_else(|p| p.into_inner()) = Some(e.user_message());
            }
        }
        {
            let mut status = self.status();
            let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            if remaining == 0 {
                status.resolve(result.clone());
            }
        }
        result
    }

    async fn download_and_save(&self, filter: &Filter) -> ApiResult<PathBuf> {
        let bytes = self.gateway.export_csv(filter).await.map_err(|e| match e {
            ApiError::Network(detail) => ApiError::ExportFailed {
                status: None,
                detail,
            },
            other => other,
        })?;
        Ok(self.saver.save(EXPORT_FILE_NAME, &bytes)?)
    }

    pub fn is_exporting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Status of the most recently finished (or running) export.
    pub fn last_status(&self) -> RequestStatus<PathBuf> {
        self.status().clone()
    }

    /// The pending failure notice, if any. Cleared once taken.
    pub fn take_notice(&self) -> Option<String> {
        self.notice.lock().unwrap_or_else(|e| e.into_inner()).take()
    }

    fn status(&self) -> std::sync::MutexGuard<'_, RequestStatus<PathBuf>> {
        self.status.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemorySession, MockHttpClient, MockResponse, RecordingSaver};
    use crate::auth::SessionStore;
    use crate::traits::{HttpError, Response};
    use bytes::Bytes;
    use std::time::Duration;

    const CSV: &str = "ID,CVE ID,Event Name\n1,CVE-2024-1,Modified\n";

    fn coordinator(
        token: Option<&str>,
    ) -> (ExportCoordinator<MockHttpClient, RecordingSaver>, MockHttpClient, RecordingSaver) {
        let storage = match token {
            Some(t) => InMemorySession::with_token(t),
            None => InMemorySession::new(),
        };
        let session = Arc::new(SessionStore::initialize(storage));
        let http = MockHttpClient::new();
        let saver = RecordingSaver::new();
        let gateway = Arc::new(ApiGateway::new("http://api.test", http.clone(), session));
        (ExportCoordinator::new(gateway, saver.clone()), http, saver)
    }

    #[tokio::test]
    async fn test_export_saves_fixed_file_name() {
        let (export, http, saver) = coordinator(Some("tok"));
        http.set_response(
            "http://api.test/export",
            MockResponse::Success(Response::new(200, Bytes::from(CSV))),
        );

        let path = export
            .trigger_export(&Filter::new("", "Modified"))
            .await
            .unwrap();

        assert_eq!(path, PathBuf::from("cve_data.csv"));
        let saved = saver.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].file_name, EXPORT_FILE_NAME);
        assert_eq!(saved[0].contents, CSV.as_bytes());
        assert_eq!(http.get_requests()[0].query(), "event_name=Modified");
        assert!(export.last_status().is_ready());
        assert_eq!(export.take_notice(), None);
    }

    #[tokio::test]
    async fn test_export_failure_leaves_one_shot_notice() {
        let (export, http, saver) = coordinator(Some("tok"));
        http.set_response(
            "http://api.test/export",
            MockResponse::Success(Response::new(502, Bytes::from("Bad Gateway"))),
        );

        let err = export.trigger_export(&Filter::default()).await.unwrap_err();

        assert!(matches!(err, ApiError::ExportFailed { status: Some(502), .. }));
        assert!(export.last_status().is_failed());
        assert!(saver.saved().is_empty());
        assert_eq!(
            export.take_notice().as_deref(),
            Some("Failed to export CSV. Please try again.")
        );
        assert_eq!(export.take_notice(), None);
    }

    #[tokio::test]
    async fn test_transport_failure_is_export_failed() {
        let (export, http, _saver) = coordinator(Some("tok"));
        http.set_default_response(MockResponse::Error(HttpError::Timeout("30s".to_string())));

        let err = export.trigger_export(&Filter::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::ExportFailed { status: None, .. }));
    }

    #[tokio::test]
    async fn test_save_failure_is_export_failed() {
        let (export, http, saver) = coordinator(Some("tok"));
        http.set_response(
            "http://api.test/export",
            MockResponse::Success(Response::new(200, Bytes::from(CSV))),
        );
        saver.set_should_fail(true);

        let err = export.trigger_export(&Filter::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::ExportFailed { status: None, .. }));
    }

    #[tokio::test]
    async fn test_export_without_session() {
        let (export, http, _saver) = coordinator(None);

        let err = export.trigger_export(&Filter::default()).await.unwrap_err();
        assert_eq!(err, ApiError::Unauthenticated);
        assert!(http.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_exports_stay_loading_until_last_finishes() {
        let (export, http, _saver) = coordinator(Some("tok"));
        http.set_response(
            "http://api.test/export?event_name=Slow",
            MockResponse::Delayed(
                Duration::from_millis(100),
                Box::new(MockResponse::Success(Response::new(200, Bytes::from(CSV)))),
            ),
        );
        http.set_response(
            "http://api.test/export?event_name=Fast",
            MockResponse::Success(Response::new(500, Bytes::from("boom"))),
        );
        let export = Arc::new(export);

        let slow = {
            let export = Arc::clone(&export);
            tokio::spawn(async move { export.trigger_export(&Filter::new("", "Slow")).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let fast = export.trigger_export(&Filter::new("", "Fast")).await;
        assert!(fast.is_err());
        assert!(export.is_exporting());
        assert!(export.last_status().is_loading());
        assert!(export.take_notice().is_some());

        slow.await.unwrap().unwrap();
        assert!(!export.is_exporting());
        assert!(export.last_status().is_ready());
    }

    #[tokio::test]
    async fn test_is_exporting_while_in_flight() {
        let (export, http, _saver) = coordinator(Some("tok"));
        http.set_response(
            "http://api.test/export",
            MockResponse::Delayed(
                Duration::from_millis(50),
                Box::new(MockResponse::Success(Response::new(200, Bytes::from(CSV)))),
            ),
        );
        let export = Arc::new(export);

        let task = {
            let export = Arc::clone(&export);
            tokio::spawn(async move { export.trigger_export(&Filter::default()).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(export.is_exporting());
        assert!(export.last_status().is_loading());

        task.await.unwrap().unwrap();
        assert!(!export.is_exporting());
    }
}
