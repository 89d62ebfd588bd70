//! Drives the `list` and `stats` resources from session and query state.
//!
//! Fetches run as spawned tokio tasks and report back over an unbounded
//! channel as [`DataMessage`]s. The owner feeds each message to
//! [`DataOrchestrator::handle_message`], so results are applied one at a
//! time, never concurrently with a state change.
//!
//! A list response is applied only when it answers the most recently
//! issued request AND its [`QueryKey`] still equals the current key.
//! Anything else is a stale response and is dropped.

mod messages;

pub use messages::DataMessage;

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::auth::SessionStore;
use crate::charts::{ChartProjector, Charts};
use crate::error::{ApiError, ApiResult};
use crate::gateway::ApiGateway;
use crate::models::{ListPage, StatsSnapshot};
use crate::state::{FilterPatch, QueryKey, QueryState, RequestStatus};
use crate::traits::HttpClient;

pub struct DataOrchestrator<C> {
    session: Arc<SessionStore>,
    gateway: Arc<ApiGateway<C>>,
    message_tx: mpsc::UnboundedSender<DataMessage>,

    query: QueryState,
    list: RequestStatus<ListPage>,
    stats: RequestStatus<StatsSnapshot>,

    /// Whether the last sync saw a token.
    signed_in: bool,
    /// Incremented each time a session begins.
    session_epoch: u64,
    list_seq: u64,
    /// Key of the latest list request, `None` when nothing is in effect.
    issued_key: Option<QueryKey>,
    stats_seq: u64,
    stats_enabled: bool,
    login_required: bool,
}

impl<C: HttpClient + 'static> DataOrchestrator<C> {
    /// Returns the orchestrator plus the receiving end of its result
    /// channel. Nothing is fetched until [`start`](Self::start).
    pub fn new(gateway: Arc<ApiGateway<C>>) -> (Self, mpsc::UnboundedReceiver<DataMessage>) {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let orchestrator = Self {
            session: Arc::clone(gateway.session()),
            gateway,
            message_tx,
            query: QueryState::new(),
            list: RequestStatus::Idle,
            stats: RequestStatus::Idle,
            signed_in: false,
            session_epoch: 0,
            list_seq: 0,
            issued_key: None,
            stats_seq: 0,
            stats_enabled: true,
            login_required: false,
        };
        (orchestrator, message_rx)
    }

    /// Evaluate the session and issue the initial fetches. Without a token
    /// this raises [`login_required`](Self::login_required) instead.
    pub fn start(&mut self) {
        self.sync(false);
    }

    // ---- accessors ----

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn list(&self) -> &RequestStatus<ListPage> {
        &self.list
    }

    pub fn stats(&self) -> &RequestStatus<StatsSnapshot> {
        &self.stats
    }

    /// Chart projection of the current snapshot. `None` unless stats are
    /// ready; a failed or loading snapshot is never projected.
    pub fn charts(&self) -> Option<Charts> {
        match &self.stats {
            RequestStatus::Ready(snapshot) => Some(ChartProjector::project(snapshot)),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.list.is_loading() || self.stats.is_loading()
    }

    /// Set when there is no session; the host should show the login surface.
    pub fn login_required(&self) -> bool {
        self.login_required
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Turn the `stats` resource on or off. While off it stays idle and
    /// no `/stats` request is made. Turning it back on during a session
    /// fetches a fresh snapshot.
    pub fn set_stats_enabled(&mut self, enabled: bool) {
        if self.stats_enabled == enabled {
            return;
        }
        self.stats_enabled = enabled;
        if !enabled {
            self.stats_seq += 1;
            self.stats.reset();
        } else if self.signed_in && self.session.has_token() {
            self.spawn_stats();
        }
    }

    // ---- query changes ----

    /// Edit the draft filter. Never fetches.
    pub fn set_draft_filter(&mut self, patch: FilterPatch) {
        self.query.set_draft_filter(patch);
    }

    /// Apply the draft, reset to page 1 and refetch the list. An explicit
    /// apply always refetches, even when the filter did not change.
    pub fn apply_filter(&mut self) {
        self.query.apply_filter();
        debug!("Applied filter {:?}", self.query.applied());
        self.sync(true);
    }

    /// Returns false when `n` is out of range; nothing changes then.
    pub fn set_page(&mut self, n: u32) -> bool {
        let moved = self.query.set_page(n);
        if moved {
            self.sync(false);
        }
        moved
    }

    pub fn next_page(&mut self) -> bool {
        let moved = self.query.next_page();
        if moved {
            self.sync(false);
        }
        moved
    }

    pub fn previous_page(&mut self) -> bool {
        let moved = self.query.previous_page();
        if moved {
            self.sync(false);
        }
        moved
    }

    // ---- session changes ----

    /// Clear the session and discard all fetched data.
    pub fn logout(&mut self) {
        info!("Logging out");
        self.session.clear();
        self.sync(false);
    }

    /// Re-evaluate after something outside the orchestrator (a login, for
    /// instance) changed the session.
    pub fn session_changed(&mut self) {
        self.sync(false);
    }

    // ---- retries ----

    /// Re-issue the list fetch for the current key.
    pub fn refresh_list(&mut self) {
        self.sync(true);
    }

    pub fn refresh_stats(&mut self) {
        if self.signed_in && self.session.has_token() {
            if self.stats_enabled {
                self.spawn_stats();
            }
        } else {
            self.sync(false);
        }
    }

    // ---- async results ----

    pub fn handle_message(&mut self, msg: DataMessage) {
        if self.signed_in && !self.session.has_token() {
            // Token expired or was cleared while the request was in flight.
            self.sync(false);
            return;
        }
        match msg {
            DataMessage::ListLoaded { seq, key, result } => {
                if seq != self.list_seq || self.current_key().as_ref() != Some(&key) {
                    debug!("Discarding stale list response (seq {}, latest {})", seq, self.list_seq);
                    return;
                }
                match result {
                    Ok(page) => {
                        debug!(
                            "List page {} ready: {} records of {} pages",
                            key.page,
                            page.records.len(),
                            page.total_pages
                        );
                        self.query.set_total_pages(page.total_pages);
                        self.list.resolve(Ok(page));
                    }
                    Err(err) => self.fail_list(err),
                }
            }
            DataMessage::StatsLoaded { seq, epoch, result } => {
                if seq != self.stats_seq || epoch != self.session_epoch || !self.signed_in {
                    debug!("Discarding stale stats response (epoch {})", epoch);
                    return;
                }
                match result {
                    Ok(snapshot) => {
                        debug!("Stats ready: {} events", snapshot.total_events());
                        self.stats.resolve(Ok(snapshot));
                    }
                    Err(err) => self.fail_stats(err),
                }
            }
        }
    }

    // ---- internals ----

    fn current_key(&self) -> Option<QueryKey> {
        if !self.signed_in || !self.session.has_token() {
            return None;
        }
        Some(self.query.key(true, self.session_epoch))
    }

    /// Bring the resources in line with the session and query state.
    /// `force_list` re-issues the list fetch even if the key is unchanged.
    fn sync(&mut self, force_list: bool) {
        if !self.session.has_token() {
            if self.signed_in || !self.list.is_idle() || !self.stats.is_idle() {
                info!("Session ended, discarding dashboard data");
            }
            self.reset_resources();
            self.login_required = true;
            return;
        }

        self.login_required = false;
        if !self.signed_in {
            self.signed_in = true;
            self.session_epoch += 1;
            debug!("Session {} started", self.session_epoch);
            if self.stats_enabled {
                self.spawn_stats();
            }
        }

        let key = self.query.key(true, self.session_epoch);
        if force_list || self.issued_key.as_ref() != Some(&key) {
            self.spawn_list(key);
        }
    }

    fn reset_resources(&mut self) {
        self.signed_in = false;
        self.issued_key = None;
        // Invalidates anything still in flight.
        self.list_seq += 1;
        self.stats_seq += 1;
        self.list.reset();
        self.stats.reset();
    }

    fn fail_list(&mut self, err: ApiError) {
        if err.requires_reauth() {
            self.force_logout();
            return;
        }
        warn!("List fetch failed: {}", err);
        self.list.resolve(Err(err));
    }

    fn fail_stats(&mut self, err: ApiError) {
        if err.requires_reauth() {
            self.force_logout();
            return;
        }
        warn!("Stats fetch failed: {}", err);
        self.stats.resolve(Err(err));
    }

    fn force_logout(&mut self) {
        warn!("Backend rejected the session token");
        self.session.clear();
        self.sync(false);
    }

    fn spawn_list(&mut self, key: QueryKey) {
        self.list_seq += 1;
        let seq = self.list_seq;
        self.issued_key = Some(key.clone());
        self.list.begin_loading();
        debug!("Fetching list page {} (seq {})", key.page, seq);

        let gateway = Arc::clone(&self.gateway);
        let message_tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result = gateway.list_events(key.page, &key.filter).await;
            let _ = message_tx.send(DataMessage::ListLoaded { seq, key, result });
        });
    }

    fn spawn_stats(&mut self) {
        self.stats_seq += 1;
        let seq = self.stats_seq;
        let epoch = self.session_epoch;
        self.stats.begin_loading();
        debug!("Fetching stats (session {})", epoch);

        let gateway = Arc::clone(&self.gateway);
        let message_tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result: ApiResult<StatsSnapshot> = gateway.fetch_stats().await;
            let _ = message_tx.send(DataMessage::StatsLoaded { seq, epoch, result });
        });
    }
}

/// Apply incoming results until neither resource is loading.
///
/// Stale responses are consumed and dropped along the way. Returns early
/// if the channel closes.
pub async fn settle<C: HttpClient + 'static>(
    orchestrator: &mut DataOrchestrator<C>,
    message_rx: &mut mpsc::UnboundedReceiver<DataMessage>,
) {
    while orchestrator.is_loading() {
        match message_rx.recv().await {
            Some(msg) => orchestrator.handle_message(msg),
            None => break,
        }
    }
}
