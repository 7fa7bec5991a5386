use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use dash_logging::dash_debug;
use tokio::sync::mpsc as async_mpsc;

use crate::{Backend, ClientCommand, ClientEvent};

/// Receives request outcomes on the client thread.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<ClientEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}

/// Runs backend requests on a dedicated single-threaded runtime.
///
/// Each command becomes its own task, so replies may arrive in any order;
/// callers tag what they care about (see `RequestToken`). Dropping the handle
/// stops the runtime and abandons anything still in flight.
pub struct ClientHandle {
    cmd_tx: async_mpsc::UnboundedSender<ClientCommand>,
}

impl ClientHandle {
    pub fn spawn(backend: Arc<dyn Backend>, sink: Arc<dyn EventSink>) -> io::Result<Self> {
        let (cmd_tx, mut cmd_rx) = async_mpsc::unbounded_channel::<ClientCommand>();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("shortdash-client".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    while let Some(command) = cmd_rx.recv().await {
                        let backend = backend.clone();
                        let sink = sink.clone();
                        tokio::spawn(async move {
                            let event = handle_command(backend.as_ref(), command).await;
                            sink.emit(event);
                        });
                    }
                });
                dash_debug!("client command channel closed");
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn submit(&self, command: ClientCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

async fn handle_command(backend: &dyn Backend, command: ClientCommand) -> ClientEvent {
    match command {
        ClientCommand::VerifyCredentials(request) => ClientEvent::CredentialsVerified(
            backend
                .verify_credentials(&request.username, &request.digest)
                .await,
        ),
        ClientCommand::ListUrls { token } => ClientEvent::UrlsListed {
            token,
            result: backend.list_urls().await,
        },
        ClientCommand::Shorten(ticket) => ClientEvent::Shortened {
            token: ticket.token,
            result: backend.shorten(&ticket.request).await,
        },
        ClientCommand::FetchStats(ticket) => {
            let result = backend.fetch_stats(&ticket.hash).await;
            ClientEvent::StatsFetched {
                token: ticket.token,
                hash: ticket.hash,
                result,
            }
        }
    }
}
