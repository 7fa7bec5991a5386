use std::fmt;

use shortdash_core::{
    AuthVerdict, RequestToken, ShortenTicket, ShortenedUrl, StatsPayload, StatsTicket,
    VerifyRequest,
};
use thiserror::Error;

/// Work the background runtime can be asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    VerifyCredentials(VerifyRequest),
    ListUrls { token: RequestToken },
    Shorten(ShortenTicket),
    FetchStats(StatsTicket),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    CredentialsVerified(Result<AuthVerdict, ClientError>),
    UrlsListed {
        token: RequestToken,
        result: Result<Vec<ShortenedUrl>, ClientError>,
    },
    Shortened {
        token: RequestToken,
        result: Result<String, ClientError>,
    },
    StatsFetched {
        token: RequestToken,
        hash: String,
        result: Result<StatsPayload, ClientError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Decode, message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// 2xx response whose body did not match the contract.
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "unexpected response"),
        }
    }
}
