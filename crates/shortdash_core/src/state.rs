use crate::view_model::{AppViewModel, ShortenView, UrlRowView};
use crate::{AuthGate, ShortenSubmission, StatsState, UrlCollection};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) auth: AuthGate,
    pub(crate) urls: UrlCollection,
    pub(crate) stats: StatsState,
    pub(crate) shorten: ShortenSubmission,
    pub(crate) notice: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auth(&self) -> &AuthGate {
        &self.auth
    }

    pub fn urls(&self) -> &UrlCollection {
        &self.urls
    }

    pub fn stats(&self) -> &StatsState {
        &self.stats
    }

    pub fn shorten(&self) -> &ShortenSubmission {
        &self.shorten
    }

    pub fn view(&self) -> AppViewModel {
        let selected = self.urls.selected_id();
        AppViewModel {
            auth: self.auth.phase(),
            user: self.auth.user().cloned(),
            auth_error: self.auth.failure().map(ToString::to_string),
            notice: self.notice.clone(),
            urls: self
                .urls
                .records()
                .iter()
                .map(|record| UrlRowView {
                    id: record.id,
                    hash: record.hash.clone(),
                    original_url: record.original_url.clone(),
                    created_at: record.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    selected: selected == Some(record.id),
                })
                .collect(),
            urls_loaded: self.urls.is_loaded(),
            refreshing: self.urls.is_refreshing(),
            urls_error: self.urls.error().map(ToString::to_string),
            stats: self.stats.clone(),
            shorten: ShortenView {
                in_flight: self.shorten.in_flight(),
                short_url: self.shorten.short_url().map(ToOwned::to_owned),
                error: self.shorten.error().map(ToOwned::to_owned),
            },
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
