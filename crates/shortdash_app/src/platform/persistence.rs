use std::fs;
use std::path::PathBuf;

use dash_logging::{dash_info, dash_warn};
use serde::{Deserialize, Serialize};
use shortdash_client::AtomicFileWriter;
use shortdash_core::{LoginSession, SessionStore, SessionStoreError, User};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedUser {
    name: String,
    email: String,
    contact: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSession {
    user: PersistedUser,
    authenticated: bool,
}

/// Session store backed by one RON file.
pub(crate) struct RonSessionStore {
    writer: AtomicFileWriter,
}

impl RonSessionStore {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(path),
        }
    }
}

impl SessionStore for RonSessionStore {
    fn load(&self) -> Option<LoginSession> {
        let path = self.writer.path();
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                dash_warn!("Failed to read session from {:?}: {}", path, err);
                return None;
            }
        };

        let persisted: PersistedSession = match ron::from_str(&content) {
            Ok(session) => session,
            Err(err) => {
                dash_warn!("Ignoring unparsable session file {:?}: {}", path, err);
                return None;
            }
        };

        if !persisted.authenticated {
            dash_warn!("Ignoring unauthenticated session in {:?}", path);
            return None;
        }

        dash_info!("Restored session from {:?}", path);
        Some(LoginSession {
            user: User {
                name: persisted.user.name,
                email: persisted.user.email,
                contact: persisted.user.contact,
            },
            authenticated: true,
        })
    }

    fn save(&mut self, session: &LoginSession) -> Result<(), SessionStoreError> {
        if !session.authenticated {
            return Err(SessionStoreError::new(
                "refusing to persist an unauthenticated session",
            ));
        }

        let persisted = PersistedSession {
            user: PersistedUser {
                name: session.user.name.clone(),
                email: session.user.email.clone(),
                contact: session.user.contact.clone(),
            },
            authenticated: true,
        };
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(&persisted, pretty)
            .map_err(|err| SessionStoreError::new(err.to_string()))?;

        self.writer
            .write(&content)
            .map_err(|err| SessionStoreError::new(err.to_string()))
    }

    fn clear(&mut self) -> Result<(), SessionStoreError> {
        self.writer
            .remove()
            .map_err(|err| SessionStoreError::new(err.to_string()))
    }
}
