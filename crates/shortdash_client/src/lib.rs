//! Shortdash client: backend transport and the runtime that executes effects.
mod backend;
mod engine;
mod persist;
mod types;
mod wire;

pub use backend::{Backend, ClientSettings, ReqwestBackend};
pub use engine::{ChannelEventSink, ClientHandle, EventSink};
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use types::{ClientCommand, ClientError, ClientEvent, FailureKind};
