use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use dash_logging::{dash_info, dash_warn};
use shortdash_client::{ClientHandle, ReqwestBackend};
use shortdash_core::{update, AppState, Msg, SessionStore};

use super::config::Config;
use super::effects::{EffectRunner, MsgSink};
use super::logging;
use super::persistence::RonSessionStore;
use super::ui::commands::{self, Command};
use super::ui::constants::PROMPT;
use super::ui::render::render;

/// Everything the dashboard loop reacts to.
pub(crate) enum AppEvent {
    /// Outcome reported by the client runtime.
    Msg(Msg),
    /// One line typed at the prompt.
    Input(String),
    /// Stdin reached end of file.
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run_app(config: Config) -> anyhow::Result<()> {
    logging::initialize(config.log, config.log_level);
    dash_info!(
        "shortdash starting backend={} session_file={:?}",
        config.backend_url,
        config.session_file
    );

    let backend =
        ReqwestBackend::new(config.client_settings()).context("invalid backend configuration")?;
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let client = ClientHandle::spawn(Arc::new(backend), Arc::new(MsgSink::new(event_tx.clone())))
        .context("could not start the client runtime")?;

    let store = RonSessionStore::new(config.session_file.clone());
    let restored = store.load();
    let runner = EffectRunner::new(Box::new(client), Box::new(store));

    spawn_input_reader(event_tx).context("could not start the input reader")?;

    let mut dashboard = Dashboard::new(runner, io::stdout().lock());
    if !dashboard.dispatch(Msg::SessionRestored(restored))? {
        dashboard.redraw()?;
    }
    dashboard.prompt()?;

    for event in event_rx {
        if dashboard.handle(event)? == Flow::Quit {
            break;
        }
    }

    dash_info!("shortdash exiting");
    Ok(())
}

fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("shortdash-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(AppEvent::Input(line)).is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        dash_warn!("stdin read failed: {}", err);
                        break;
                    }
                }
            }
            let _ = tx.send(AppEvent::InputClosed);
        })?;
    Ok(())
}

/// Owns the state and runs the update loop against one output stream.
struct Dashboard<W: Write> {
    state: AppState,
    runner: EffectRunner,
    out: W,
}

impl<W: Write> Dashboard<W> {
    fn new(runner: EffectRunner, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner,
            out,
        }
    }

    fn handle(&mut self, event: AppEvent) -> io::Result<Flow> {
        match event {
            AppEvent::Msg(msg) => {
                if self.dispatch(msg)? {
                    self.prompt()?;
                }
            }
            AppEvent::Input(line) => {
                match commands::parse(&line) {
                    Ok(Command::Msg(msg)) => {
                        self.dispatch(msg)?;
                    }
                    Ok(Command::Help) => writeln!(self.out, "{}", commands::HELP)?,
                    Ok(Command::Quit) => return Ok(Flow::Quit),
                    Ok(Command::Empty) => {}
                    Err(problem) => writeln!(self.out, "{problem}")?,
                }
                self.prompt()?;
            }
            AppEvent::InputClosed => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Applies `msg`, runs its effects and redraws if anything changed.
    fn dispatch(&mut self, msg: Msg) -> io::Result<bool> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.run(effects);
        let dirty = state.consume_dirty();
        self.state = state;
        if dirty {
            self.redraw()?;
        }
        Ok(dirty)
    }

    fn redraw(&mut self) -> io::Result<()> {
        write!(self.out, "\n{}", render(&self.state.view()))
    }

    fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "{PROMPT}")?;
        self.out.flush()
    }
}
