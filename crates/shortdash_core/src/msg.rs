use crate::{
    AuthVerdict, LoginSession, RequestToken, ShortenForm, ShortenedUrl, StatsPayload,
    TransportError, UrlId,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Session read from the store at startup.
    SessionRestored(Option<LoginSession>),
    /// User submitted the login form.
    LoginSubmitted { username: String, password: String },
    /// User asked to end the session.
    LogoutClicked,
    /// User asked to reload the URL list.
    RefreshClicked,
    /// User picked a URL from the list.
    UrlSelected { id: UrlId },
    /// User dismissed the stats panel.
    SelectionCleared,
    /// User submitted the shorten form.
    ShortenSubmitted(ShortenForm),
    /// Verifier answered (or the request failed).
    CredentialsVerified(Result<AuthVerdict, TransportError>),
    /// List endpoint answered the request tagged `token`.
    UrlsLoaded {
        token: RequestToken,
        result: Result<Vec<ShortenedUrl>, TransportError>,
    },
    /// Stats endpoint answered for the request tagged `token`.
    StatsLoaded {
        token: RequestToken,
        result: Result<StatsPayload, TransportError>,
    },
    /// Shorten endpoint answered the submission tagged `token`.
    ShortenCompleted {
        token: RequestToken,
        result: Result<String, TransportError>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
