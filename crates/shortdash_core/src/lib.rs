//! Shortdash core: pure dashboard state machine and the components it drives.
mod auth;
mod collection;
mod effect;
mod error;
mod model;
mod msg;
mod session;
mod shorten;
mod state;
mod stats;
mod token;
mod update;
mod view_model;

pub use auth::{AuthGate, AuthPhase, AuthResolution, AuthVerdict, SubmitRejected, VerifyRequest};
pub use collection::{RefreshOutcome, StatsTicket, UrlCollection};
pub use effect::Effect;
pub use error::{AuthFailure, TransportError, ValidationError};
pub use model::{
    AccessEvent, LoginSession, PasswordDigest, ShortenRequest, ShortenedUrl, UrlId, User,
};
pub use msg::Msg;
pub use session::{MemorySessionStore, SessionStore, SessionStoreError};
pub use shorten::{ShortenForm, ShortenRejected, ShortenSubmission, ShortenTicket};
pub use state::AppState;
pub use stats::{IpShare, StatsPayload, StatsReport, StatsState, StatsSummary};
pub use token::RequestToken;
pub use update::update;
pub use view_model::{AppViewModel, ShortenView, UrlRowView};
