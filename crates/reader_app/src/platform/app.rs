use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use reader_core::{update, AppState, Msg, QueuedFile};
use reader_engine::{EngineHandle, ServiceSettings};
use reader_logging::{reader_debug, reader_error, reader_info};

use super::clipboard::Osc52Clipboard;
use super::effects::{spawn_event_forwarder, EffectRunner};
use super::input::{self, Command};
use super::ui::render::{RenderMode, TerminalRenderer};

const TICK_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct AppOptions {
    pub settings: ServiceSettings,
    pub files: Vec<PathBuf>,
    pub only_aztec: bool,
    pub auto_upload: bool,
    pub export_on_exit: Option<PathBuf>,
}

/// Everything the dispatch loop reacts to.
#[derive(Debug)]
pub(crate) enum AppEvent {
    Msg(Msg),
    Command(Command),
    InputClosed,
    Quit,
}

struct App {
    state: AppState,
    renderer: TerminalRenderer,
    effects: EffectRunner,
}

impl App {
    /// Single writer of `AppState`: update, render when dirty, then run effects.
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            if let Err(err) = self.renderer.render(&state.view()) {
                reader_error!("Render failed: {}", err);
            }
        }
        self.state = state;
        self.effects.run(effects);
    }
}

pub fn run_app(options: AppOptions) -> anyhow::Result<()> {
    reader_info!("Starting against {}", options.settings.base_url);
    let base_url = options.settings.base_url.clone();
    let (engine, events) = EngineHandle::new(options.settings)?;

    let (tx, rx) = mpsc::channel::<AppEvent>();
    spawn_event_forwarder(events, tx.clone());
    input::spawn_stdin_reader(tx.clone());

    let mode = if io::stdout().is_terminal() {
        RenderMode::Redraw
    } else {
        RenderMode::Append
    };
    let mut app = App {
        state: AppState::with_only_aztec(options.only_aztec),
        renderer: TerminalRenderer::new(base_url, mode),
        effects: EffectRunner::new(engine, Box::new(Osc52Clipboard::stdout()), tx),
    };

    app.dispatch(Msg::Started);
    if !options.files.is_empty() {
        let files = options
            .files
            .into_iter()
            .map(QueuedFile::from_path)
            .collect();
        app.dispatch(Msg::FilesQueued(files));
    }
    if options.auto_upload {
        app.dispatch(Msg::UploadClicked);
    }

    let mut input_closed = false;
    loop {
        if input_closed && app.state.is_idle() {
            reader_info!("Input closed and no work pending; exiting");
            break;
        }
        let event = match rx.recv_timeout(TICK_INTERVAL) {
            Ok(event) => event,
            Err(mpsc::RecvTimeoutError::Timeout) => AppEvent::Msg(Msg::Tick),
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };
        match event {
            AppEvent::Msg(msg) => app.dispatch(msg),
            AppEvent::Command(command) => {
                if let Some(msg) = command.into_msg(app.state.only_aztec()) {
                    app.dispatch(msg);
                }
            }
            AppEvent::InputClosed => {
                reader_debug!("Standard input closed");
                input_closed = true;
            }
            AppEvent::Quit => {
                reader_info!("Quit requested");
                break;
            }
        }
    }

    if let Some(path) = options.export_on_exit {
        app.dispatch(Msg::ExportRequested { path });
        // Export runs inline, so its outcome is already queued.
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::Msg(msg @ Msg::ExportFinished { .. }) = event {
                app.dispatch(msg);
            }
        }
    }
    Ok(())
}
