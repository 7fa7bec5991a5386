use crate::{AuthFailure, LoginSession, PasswordDigest, User, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated,
    /// Transient: recorded in the transition log, never the resting phase.
    Failed,
}

/// Verifier's answer to a well-formed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthVerdict {
    Accepted(User),
    Rejected,
}

/// What `submit` hands to the transport. Carries the digest, never the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyRequest {
    pub username: String,
    pub digest: PasswordDigest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejected {
    /// A verification is already in flight.
    Busy,
    AlreadyAuthenticated,
    Invalid(ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResolution {
    /// Response arrived outside `Authenticating`; nothing changed.
    Ignored,
    Authenticated(LoginSession),
    Failed(AuthFailure),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthGate {
    phase: AuthPhase,
    user: Option<User>,
    failure: Option<AuthFailure>,
    transitions: Vec<AuthPhase>,
}

impl AuthGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::Authenticated
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn failure(&self) -> Option<&AuthFailure> {
        self.failure.as_ref()
    }

    /// Phases entered since the last submit, restore or logout.
    pub fn transitions(&self) -> &[AuthPhase] {
        &self.transitions
    }

    /// Adopts a persisted session at startup. Only an authenticated session
    /// found while unauthenticated is accepted.
    pub fn restore(&mut self, session: Option<LoginSession>) -> bool {
        if self.phase != AuthPhase::Unauthenticated {
            return false;
        }
        match session.and_then(LoginSession::into_valid) {
            Some(session) => {
                self.transitions.clear();
                self.user = Some(session.user);
                self.failure = None;
                self.enter(AuthPhase::Authenticated);
                true
            }
            None => false,
        }
    }

    pub fn submit(&mut self, username: &str, password: &str) -> Result<VerifyRequest, SubmitRejected> {
        match self.phase {
            AuthPhase::Authenticating => return Err(SubmitRejected::Busy),
            AuthPhase::Authenticated => return Err(SubmitRejected::AlreadyAuthenticated),
            AuthPhase::Unauthenticated | AuthPhase::Failed => {}
        }

        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            self.failure = None;
            return Err(SubmitRejected::Invalid(ValidationError::MissingCredentials));
        }

        self.transitions.clear();
        self.failure = None;
        self.enter(AuthPhase::Authenticating);
        Ok(VerifyRequest {
            username: username.to_string(),
            digest: PasswordDigest::of(password),
        })
    }

    pub fn complete(&mut self, outcome: Result<AuthVerdict, AuthFailure>) -> AuthResolution {
        if self.phase != AuthPhase::Authenticating {
            return AuthResolution::Ignored;
        }

        let failure = match outcome {
            Ok(AuthVerdict::Accepted(user)) => {
                let session = LoginSession::authenticated(user.clone());
                self.user = Some(user);
                self.enter(AuthPhase::Authenticated);
                return AuthResolution::Authenticated(session);
            }
            Ok(AuthVerdict::Rejected) => AuthFailure::Rejected,
            Err(failure) => failure,
        };

        self.enter(AuthPhase::Failed);
        self.failure = Some(failure.clone());
        self.user = None;
        self.enter(AuthPhase::Unauthenticated);
        AuthResolution::Failed(failure)
    }

    /// Returns `true` if a session was actually ended.
    pub fn logout(&mut self) -> bool {
        if self.phase != AuthPhase::Authenticated {
            return false;
        }
        self.transitions.clear();
        self.user = None;
        self.failure = None;
        self.enter(AuthPhase::Unauthenticated);
        true
    }

    fn enter(&mut self, phase: AuthPhase) {
        self.phase = phase;
        self.transitions.push(phase);
    }
}
