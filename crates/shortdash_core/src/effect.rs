use crate::{LoginSession, RequestToken, ShortenTicket, StatsTicket, VerifyRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    PersistSession(LoginSession),
    ClearSession,
    VerifyCredentials(VerifyRequest),
    FetchUrls(RequestToken),
    FetchStats(StatsTicket),
    Shorten(ShortenTicket),
}
