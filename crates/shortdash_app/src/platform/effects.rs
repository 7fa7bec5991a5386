use std::sync::mpsc;

use dash_logging::{dash_info, dash_warn, Redacted};
use shortdash_client::{ClientCommand, ClientError, ClientEvent, ClientHandle, EventSink, FailureKind};
use shortdash_core::{Effect, Msg, SessionStore, TransportError};

use super::app::AppEvent;

/// Where backend work is sent; the client runtime in production.
pub(crate) trait CommandTarget {
    fn submit(&self, command: ClientCommand);
}

impl CommandTarget for ClientHandle {
    fn submit(&self, command: ClientCommand) {
        ClientHandle::submit(self, command);
    }
}

pub(crate) struct EffectRunner {
    target: Box<dyn CommandTarget>,
    store: Box<dyn SessionStore>,
}

impl EffectRunner {
    pub(crate) fn new(target: Box<dyn CommandTarget>, store: Box<dyn SessionStore>) -> Self {
        Self { target, store }
    }

    pub(crate) fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::PersistSession(session) => {
                    if let Err(err) = self.store.save(&session) {
                        dash_warn!("Could not persist session: {}", err);
                    }
                }
                Effect::ClearSession => {
                    if let Err(err) = self.store.clear() {
                        dash_warn!("Could not clear session: {}", err);
                    }
                }
                Effect::VerifyCredentials(request) => {
                    dash_info!("VerifyCredentials user={}", Redacted(&request.username));
                    self.target.submit(ClientCommand::VerifyCredentials(request));
                }
                Effect::FetchUrls(token) => {
                    dash_info!("FetchUrls token={}", token.value());
                    self.target.submit(ClientCommand::ListUrls { token });
                }
                Effect::FetchStats(ticket) => {
                    dash_info!(
                        "FetchStats hash={} token={}",
                        ticket.hash,
                        ticket.token.value()
                    );
                    self.target.submit(ClientCommand::FetchStats(ticket));
                }
                Effect::Shorten(ticket) => {
                    dash_info!(
                        "Shorten url_len={} url={} token={}",
                        ticket.request.url.len(),
                        ticket.request.url,
                        ticket.token.value()
                    );
                    self.target.submit(ClientCommand::Shorten(ticket));
                }
            }
        }
    }
}

/// Turns client outcomes into messages for the dashboard loop.
pub(crate) struct MsgSink {
    tx: mpsc::Sender<AppEvent>,
}

impl MsgSink {
    pub(crate) fn new(tx: mpsc::Sender<AppEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for MsgSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(AppEvent::Msg(to_msg(event)));
    }
}

fn to_msg(event: ClientEvent) -> Msg {
    match event {
        ClientEvent::CredentialsVerified(result) => {
            Msg::CredentialsVerified(result.map_err(describe))
        }
        ClientEvent::UrlsListed { token, result } => Msg::UrlsLoaded {
            token,
            result: result.map_err(describe),
        },
        ClientEvent::Shortened { token, result } => Msg::ShortenCompleted {
            token,
            result: result.map_err(describe),
        },
        ClientEvent::StatsFetched {
            token,
            hash,
            result,
        } => {
            if let Err(err) = &result {
                dash_warn!("Stats for {} failed: {}", hash, err);
            }
            Msg::StatsLoaded {
                token,
                result: result.map_err(describe),
            }
        }
    }
}

fn describe(err: ClientError) -> TransportError {
    match err.kind {
        FailureKind::HttpStatus(_) => TransportError::new(err.kind.to_string()),
        _ => TransportError::new(err.to_string()),
    }
}
