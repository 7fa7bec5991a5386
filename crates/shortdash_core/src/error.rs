use thiserror::Error;

/// Rejected before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("please fill in both username and password")]
    MissingCredentials,
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("not a valid http(s) url: {0}")]
    InvalidUrl(String),
}

/// Network failure or non-success status, already rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Why a credential submission ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("invalid username or password")]
    Rejected,
    #[error("could not reach the login service: {0}")]
    Transport(TransportError),
}
