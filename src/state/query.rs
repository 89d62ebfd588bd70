//! Filter and pagination state.
//!
//! Only the *applied* filter and the page cursor ever reach the network.
//! Edits go to the draft filter and take effect on an explicit apply.

/// Free-text constraints on the event list. An empty (or all-whitespace)
/// field means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Filter {
    pub cve_id: String,
    pub event_name: String,
}

impl Filter {
    pub fn new(cve_id: impl Into<String>, event_name: impl Into<String>) -> Self {
        Self {
            cve_id: cve_id.into(),
            event_name: event_name.into(),
        }
    }

    /// The same filter with both fields trimmed.
    pub fn normalized(&self) -> Filter {
        Filter::new(self.cve_id.trim(), self.event_name.trim())
    }

    pub fn cve_id_constraint(&self) -> Option<&str> {
        non_empty(&self.cve_id)
    }

    pub fn event_name_constraint(&self) -> Option<&str> {
        non_empty(&self.event_name)
    }

    pub fn is_unconstrained(&self) -> bool {
        self.cve_id_constraint().is_none() && self.event_name_constraint().is_none()
    }

    /// Query parameters for this filter. Fields without a constraint are
    /// omitted entirely; the backend reads a missing parameter as "any".
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(cve_id) = self.cve_id_constraint() {
            pairs.push(("cve_id", cve_id));
        }
        if let Some(event_name) = self.event_name_constraint() {
            pairs.push(("event_name", event_name));
        }
        pairs
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// A partial update to the draft filter; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub cve_id: Option<String>,
    pub event_name: Option<String>,
}

impl FilterPatch {
    pub fn cve_id(value: impl Into<String>) -> Self {
        Self {
            cve_id: Some(value.into()),
            event_name: None,
        }
    }

    pub fn event_name(value: impl Into<String>) -> Self {
        Self {
            cve_id: None,
            event_name: Some(value.into()),
        }
    }

    pub fn with_event_name(mut self, value: impl Into<String>) -> Self {
        self.event_name = Some(value.into());
        self
    }
}

/// Identifies which list request a response belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub page: u32,
    /// Applied filter, trimmed.
    pub filter: Filter,
    pub authenticated: bool,
    /// Bumped every time a session starts, so a response from an earlier
    /// login never lands in a later one.
    pub session_epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    draft: Filter,
    applied: Filter,
    page: u32,
    total_pages: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryState {
    pub fn new() -> Self {
        Self {
            draft: Filter::default(),
            applied: Filter::default(),
            page: 1,
            total_pages: 1,
        }
    }

    pub fn draft(&self) -> &Filter {
        &self.draft
    }

    pub fn applied(&self) -> &Filter {
        &self.applied
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Edit the draft. Never affects what is fetched.
    pub fn set_draft_filter(&mut self, patch: FilterPatch) {
        if let Some(cve_id) = patch.cve_id {
            self.draft.cve_id = cve_id;
        }
        if let Some(event_name) = patch.event_name {
            self.draft.event_name = event_name;
        }
    }

    /// Copy the draft into the applied filter and go back to page 1.
    pub fn apply_filter(&mut self) {
        self.applied = self.draft.clone();
        self.page = 1;
    }

    /// Move to page `n`. Returns false (and changes nothing) unless
    /// `1 <= n <= total_pages`.
    pub fn set_page(&mut self, n: u32) -> bool {
        if n < 1 || n > self.total_pages {
            return false;
        }
        self.page = n;
        true
    }

    pub fn can_go_previous(&self) -> bool {
        self.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn previous_page(&mut self) -> bool {
        self.can_go_previous() && self.set_page(self.page - 1)
    }

    pub fn next_page(&mut self) -> bool {
        self.can_go_next() && self.set_page(self.page + 1)
    }

    /// Record the page count reported with the latest list response.
    pub fn set_total_pages(&mut self, total_pages: u32) {
        self.total_pages = total_pages;
    }

    pub fn key(&self, authenticated: bool, session_epoch: u64) -> QueryKey {
        QueryKey {
            page: self.page,
            filter: self.applied.normalized(),
            authenticated,
            session_epoch,
        }
    }
}
