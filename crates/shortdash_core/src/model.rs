use std::fmt;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

pub type UrlId = u64;

/// Owner identity returned by the credential verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// The only record that survives a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSession {
    pub user: User,
    pub authenticated: bool,
}

impl LoginSession {
    pub fn authenticated(user: User) -> Self {
        Self {
            user,
            authenticated: true,
        }
    }

    /// Returns the session only if it still grants access.
    pub fn into_valid(self) -> Option<Self> {
        self.authenticated.then_some(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenedUrl {
    pub id: UrlId,
    pub site_id: u64,
    pub original_url: String,
    pub hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEvent {
    pub accessed_at: DateTime<Utc>,
    pub request_ip: String,
}

/// Validated body for the shortening endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenRequest {
    pub url: String,
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// Lowercase hex SHA-256 of a password; the only form that leaves the core.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn of(password: &str) -> Self {
        Self(hex::encode(Sha256::digest(password.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}
