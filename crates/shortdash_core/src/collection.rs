use std::collections::HashSet;

use crate::{RequestToken, ShortenedUrl, TransportError, UrlId};

/// A stats fetch to issue for a fresh selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsTicket {
    pub token: RequestToken,
    pub hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshOutcome {
    /// Records dropped because their id or hash repeated an earlier one.
    pub duplicates_dropped: usize,
    pub selection_cleared: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlCollection {
    records: Vec<ShortenedUrl>,
    loaded: bool,
    refreshing: bool,
    selected: Option<UrlId>,
    /// Advanced on every selection change; tags stats requests.
    stats_token: RequestToken,
    /// Advanced on every list request; tags `/urls` replies.
    list_token: RequestToken,
    error: Option<TransportError>,
}

impl UrlCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in backend order.
    pub fn records(&self) -> &[ShortenedUrl] {
        &self.records
    }

    /// `false` until the first successful refresh.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn error(&self) -> Option<&TransportError> {
        self.error.as_ref()
    }

    pub fn selected_id(&self) -> Option<UrlId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&ShortenedUrl> {
        let id = self.selected?;
        self.find(id)
    }

    pub fn token(&self) -> RequestToken {
        self.stats_token
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.stats_token == token
    }

    /// Token of the list request in flight, if any.
    pub fn pending_refresh(&self) -> Option<RequestToken> {
        self.refreshing.then_some(self.list_token)
    }

    /// Marks a list fetch as in flight and returns the token its reply must
    /// carry. Returns `None` if one already is in flight.
    pub fn begin_refresh(&mut self) -> Option<RequestToken> {
        if self.refreshing {
            return None;
        }
        self.refreshing = true;
        self.list_token = self.list_token.next();
        Some(self.list_token)
    }

    /// Applies the reply to the list request tagged `token`. Returns `None`
    /// and changes nothing when that request is no longer the pending one.
    pub fn apply_refresh(
        &mut self,
        token: RequestToken,
        result: Result<Vec<ShortenedUrl>, TransportError>,
    ) -> Option<Result<RefreshOutcome, TransportError>> {
        if self.pending_refresh() != Some(token) {
            return None;
        }
        self.refreshing = false;
        let incoming = match result {
            Ok(records) => records,
            Err(err) => {
                self.error = Some(err.clone());
                return Some(Err(err));
            }
        };

        let mut seen_ids = HashSet::new();
        let mut seen_hashes = HashSet::new();
        let before = incoming.len();
        self.records = incoming
            .into_iter()
            .filter(|record| {
                let fresh_id = seen_ids.insert(record.id);
                let fresh_hash = seen_hashes.insert(record.hash.clone());
                fresh_id && fresh_hash
            })
            .collect();
        self.loaded = true;
        self.error = None;

        let mut outcome = RefreshOutcome {
            duplicates_dropped: before - self.records.len(),
            selection_cleared: false,
        };
        if let Some(id) = self.selected {
            if self.find(id).is_none() {
                self.clear_selection();
                outcome.selection_cleared = true;
            }
        }
        Some(Ok(outcome))
    }

    /// Selects `id`, invalidating any stats request still in flight.
    /// Unknown ids clear the selection and yield no ticket.
    pub fn select(&mut self, id: UrlId) -> Option<StatsTicket> {
        self.stats_token = self.stats_token.next();
        let hash = self.find(id).map(|record| record.hash.clone());
        match hash {
            Some(hash) => {
                self.selected = Some(id);
                Some(StatsTicket {
                    token: self.stats_token,
                    hash,
                })
            }
            None => {
                self.selected = None;
                None
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.stats_token = self.stats_token.next();
        self.selected = None;
    }

    /// Forgets everything tied to the current session. Both tokens keep
    /// counting so late responses stay stale.
    pub fn reset(&mut self) {
        *self = Self {
            stats_token: self.stats_token.next(),
            list_token: self.list_token.next(),
            ..Self::default()
        };
    }

    fn find(&self, id: UrlId) -> Option<&ShortenedUrl> {
        self.records.iter().find(|record| record.id == id)
    }
}
