use crate::{AuthPhase, StatsState, UrlId, User};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub auth: AuthPhase,
    pub user: Option<User>,
    pub auth_error: Option<String>,
    pub notice: Option<String>,
    pub urls: Vec<UrlRowView>,
    pub urls_loaded: bool,
    pub refreshing: bool,
    pub urls_error: Option<String>,
    pub stats: StatsState,
    pub shorten: ShortenView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRowView {
    pub id: UrlId,
    pub hash: String,
    pub original_url: String,
    pub created_at: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShortenView {
    pub in_flight: bool,
    pub short_url: Option<String>,
    pub error: Option<String>,
}
