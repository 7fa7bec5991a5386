use thiserror::Error;

use crate::LoginSession;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("session store: {message}")]
pub struct SessionStoreError {
    pub message: String,
}

impl SessionStoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Durable home of the single login session.
///
/// Implementations must report a missing, unreadable or unauthenticated
/// record as `None` from [`SessionStore::load`], and `save` must replace the
/// previous record in one step.
pub trait SessionStore {
    fn load(&self) -> Option<LoginSession>;
    fn save(&mut self, session: &LoginSession) -> Result<(), SessionStoreError>;
    fn clear(&mut self) -> Result<(), SessionStoreError>;
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: Option<LoginSession>,
    writes: usize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the slot as if a previous run had left `session` behind,
    /// including records that `load` will refuse.
    pub fn with_raw(session: LoginSession) -> Self {
        Self {
            slot: Some(session),
            writes: 0,
        }
    }

    /// What is physically stored, bypassing the `load` filter.
    pub fn raw(&self) -> Option<&LoginSession> {
        self.slot.as_ref()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<LoginSession> {
        self.slot.clone().and_then(LoginSession::into_valid)
    }

    fn save(&mut self, session: &LoginSession) -> Result<(), SessionStoreError> {
        self.slot = Some(session.clone());
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionStoreError> {
        self.slot = None;
        self.writes += 1;
        Ok(())
    }
}
