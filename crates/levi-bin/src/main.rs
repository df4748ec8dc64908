//! levi entrypoint.
use anyhow::Result;
use clap::Parser;
use core_actions::handle_key;
use core_actions::io_ops::{self, WriteSummary};
use core_config::{Config, ConfigContext, load_from};
use core_events::{EVENT_CHANNEL_CAP, Event, InputEvent, KeyEvent, TickEventSource};
use core_render::{RenderEngine, RenderOptions};
use core_state::{EditorOptions, EditorState};
use core_terminal::{CrosstermBackend, TerminalBackend, title_for};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

const STATUS_ROWS: u16 = 1;
const EPHEMERAL_TTL: Duration = Duration::from_secs(3);
const TICK_INTERVAL: Duration = Duration::from_millis(250);
const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "levi", version, about = "A small modal text editor")]
struct Args {
    /// File to edit. Created on first save if it does not exist.
    pub path: PathBuf,
    /// Configuration file path (overrides discovery of `levi.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

struct RuntimeContext<'a> {
    session: Session,
    terminal_guard: core_terminal::TerminalGuard<'a>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn run<'a>(&'a mut self, args: &Args) -> Result<RuntimeContext<'a>> {
        self.configure_logging();
        Self::install_panic_hook();
        info!(target: "runtime", "startup");

        // Load before touching the terminal so startup errors print normally.
        let mut session = Session::load(args)?;

        let mut guard = self.backend.enter_guard()?;
        let size = guard.backend().size().unwrap_or(FALLBACK_SIZE);
        session.resize(size.0, size.1);
        guard
            .backend()
            .set_title(&title_for(session.state.file_name.as_deref()))?;

        info!(
            target: "runtime.startup",
            path = %args.path.display(),
            lines = session.state.buffer.line_count(),
            config_override = args.config.is_some(),
            effective_margin = session.config.effective_vertical_margin,
            "bootstrap_complete"
        );

        Ok(RuntimeContext {
            session,
            terminal_guard: guard,
        })
    }

    fn configure_logging(&mut self) {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("levi.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "levi.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                core_terminal::restore_on_panic();
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

/// Editor state plus everything needed to turn events into redraws.
struct Session {
    state: EditorState,
    config: Config,
    engine: RenderEngine,
    size: (u16, u16),
}

impl Session {
    fn load(args: &Args) -> Result<Self> {
        let config = load_from(args.config.clone())?;
        let loaded = io_ops::open_file(&args.path)?;
        if loaded.mixed_line_endings {
            warn!(target: "io", path = %loaded.path.display(), "mixed_line_endings_detected_startup");
        }
        let mut state = loaded.into_state();
        state.options = EditorOptions {
            tab_width: config.tab_width(),
            expand_tabs: config.file.editor.expand_tabs,
        };
        Ok(Self::new(state, config))
    }

    fn new(state: EditorState, config: Config) -> Self {
        let engine = RenderEngine::new(RenderOptions {
            gutter_min_width: config.file.gutter.min_width,
            vertical_margin: config.effective_vertical_margin as usize,
        });
        Self {
            state,
            config,
            engine,
            size: FALLBACK_SIZE,
        }
    }

    fn handle_event(&mut self, event: &Event) -> LoopControl {
        match event {
            Event::Input(InputEvent::Key(key)) => self.handle_key(key),
            Event::Input(InputEvent::CtrlC) => LoopControl::Break {
                reason: ShutdownReason::CtrlC,
            },
            Event::Input(InputEvent::Resize(w, h)) => {
                self.resize(*w, *h);
                LoopControl::Continue { redraw: true }
            }
            Event::Tick => LoopControl::Continue {
                redraw: self.state.tick_ephemeral(Instant::now()),
            },
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> LoopControl {
        let result = handle_key(&mut self.state, key);
        if result.save {
            self.save();
        }
        if result.quit {
            return LoopControl::Break {
                reason: ShutdownReason::ActionQuit,
            };
        }
        LoopControl::Continue {
            redraw: result.redraw || result.save,
        }
    }

    fn save(&mut self) {
        match io_ops::write_file(&mut self.state, None) {
            Ok(summary) => {
                let msg = save_message(&summary);
                self.state.set_ephemeral(msg, EPHEMERAL_TTL);
            }
            Err(e) => {
                error!(target: "io", error = %e, "save_failed");
                self.state.set_ephemeral("save failed", EPHEMERAL_TTL);
            }
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.engine.invalidate();
        let ctx = ConfigContext::new(width, height, STATUS_ROWS);
        if let Some(margin) = self.config.recompute_with_context(ctx) {
            self.engine.set_vertical_margin(margin as usize);
        }
        trace!(target: "runtime", width, height, "resize");
    }

    fn render(&mut self) {
        let (w, h) = self.size;
        if let Err(e) = self.engine.render(&self.state, w, h) {
            error!(target: "render.engine", ?e, "render_error");
        }
    }
}

fn save_message(summary: &WriteSummary) -> String {
    let name = summary
        .path
        .file_name()
        .map_or_else(|| summary.path.display().to_string(), |n| n.to_string_lossy().into_owned());
    format!("\"{name}\" written, {} lines", summary.lines)
}

enum LoopControl {
    Continue { redraw: bool },
    Break { reason: ShutdownReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    CtrlC,
    ActionQuit,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CtrlC => "ctrl_c",
            ShutdownReason::ActionQuit => "action_quit",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

struct EditorRuntime<'a> {
    session: Session,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    tick_task: Option<tokio::task::JoinHandle<()>>,
    input_task: Option<tokio::task::JoinHandle<()>>,
    input_shutdown: Option<core_input::AsyncInputShutdown>,
    _terminal_guard: core_terminal::TerminalGuard<'a>,
}

impl<'a> EditorRuntime<'a> {
    fn new(
        context: RuntimeContext<'a>,
        tx: mpsc::Sender<Event>,
        rx: mpsc::Receiver<Event>,
        input_task: tokio::task::JoinHandle<()>,
        input_shutdown: core_input::AsyncInputShutdown,
        tick_task: tokio::task::JoinHandle<()>,
    ) -> Self {
        let RuntimeContext {
            session,
            terminal_guard,
        } = context;
        Self {
            session,
            rx,
            tx: Some(tx),
            tick_task: Some(tick_task),
            input_task: Some(input_task),
            input_shutdown: Some(input_shutdown),
            _terminal_guard: terminal_guard,
        }
    }

    async fn run(&mut self) -> Result<()> {
        self.session.render();

        let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter_loop = loop_span.enter();

        let mut shutdown_reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            match self.session.handle_event(&event) {
                LoopControl::Break { reason } => {
                    shutdown_reason = reason;
                    break;
                }
                LoopControl::Continue { redraw: true } => self.session.render(),
                LoopControl::Continue { redraw: false } => {}
            }
        }

        self.rx.close();
        self.finalize_shutdown(shutdown_reason).await;
        Ok(())
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");
        drop(self.tx.take());

        if let Some(handle) = self.tick_task.take() {
            handle.abort();
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Err(err)) if !err.is_cancelled() => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "tick_task_error"
                ),
                Ok(_) => trace!(target: "runtime.shutdown", reason = reason.as_str(), "tick_task_stopped"),
                Err(_) => warn!(target: "runtime.shutdown", reason = reason.as_str(), "tick_task_timeout"),
            }
        }

        if let Some(shutdown) = self.input_shutdown.take() {
            shutdown.signal();
        }
        if let Some(handle) = self.input_task.take() {
            match handle.await {
                Ok(_) => trace!(target: "runtime.shutdown", reason = reason.as_str(), "input_task_joined"),
                Err(err) if err.is_cancelled() => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_cancelled"
                ),
                Err(err) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "input_task_join_failed"
                ),
            }
        }

        log_shutdown_stage(reason, "complete");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    let context = startup.run(&args)?;
    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx.clone());
    let tick_task = TickEventSource::new(TICK_INTERVAL).spawn(tx.clone());

    let mut runtime = EditorRuntime::new(context, tx, rx, input_task, input_shutdown, tick_task);
    runtime.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::KeyCode;

    fn session(lines: &[&str]) -> Session {
        Session::new(
            EditorState::from_lines(lines.iter().copied()),
            Config::default(),
        )
    }

    fn key(c: char) -> Event {
        Event::Input(InputEvent::Key(KeyEvent::plain(KeyCode::Char(c))))
    }

    fn is_break(control: &LoopControl, expected: ShutdownReason) -> bool {
        matches!(control, LoopControl::Break { reason } if *reason == expected)
    }

    #[test]
    fn shutdown_reason_labels_are_stable() {
        assert_eq!(ShutdownReason::CtrlC.as_str(), "ctrl_c");
        assert_eq!(ShutdownReason::ActionQuit.as_str(), "action_quit");
        assert_eq!(ShutdownReason::ChannelClosed.to_string(), "channel_closed");
    }

    #[test]
    fn q_and_ctrl_c_quit() {
        let mut s = session(&["abc"]);
        assert!(is_break(&s.handle_event(&key('q')), ShutdownReason::ActionQuit));
        let mut s = session(&["abc"]);
        let ctrl_c = Event::Input(InputEvent::CtrlC);
        assert!(is_break(&s.handle_event(&ctrl_c), ShutdownReason::CtrlC));
    }

    #[test]
    fn motion_requests_redraw_only_when_cursor_moves() {
        let mut s = session(&["abc"]);
        assert!(matches!(s.handle_event(&key('l')), LoopControl::Continue { redraw: true }));
        assert!(matches!(s.handle_event(&key('$')), LoopControl::Continue { redraw: true }));
        assert!(matches!(s.handle_event(&key('l')), LoopControl::Continue { redraw: false }));
    }

    #[test]
    fn save_writes_file_and_sets_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut s = session(&["one", "two"]);
        s.state.file_name = Some(path.clone());
        s.state.had_trailing_newline = true;
        s.state.dirty = true;

        let ctrl_s = Event::Input(InputEvent::Key(KeyEvent::ctrl('s')));
        assert!(matches!(s.handle_event(&ctrl_s), LoopControl::Continue { redraw: true }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
        assert!(!s.state.dirty);
        let msg = s.state.ephemeral_status.as_ref().map(|m| m.text.clone());
        assert_eq!(msg.as_deref(), Some("\"out.txt\" written, 2 lines"));
    }

    #[test]
    fn failed_save_keeps_dirty_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&["x"]);
        s.state.file_name = Some(dir.path().join("missing").join("out.txt"));
        s.state.dirty = true;
        s.handle_event(&key('s'));
        assert!(s.state.dirty);
        let msg = s.state.ephemeral_status.as_ref().map(|m| m.text.clone());
        assert_eq!(msg.as_deref(), Some("save failed"));
    }

    #[test]
    fn tick_expires_message() {
        let mut s = session(&["x"]);
        s.state.set_ephemeral("hello", Duration::ZERO);
        assert!(matches!(s.handle_event(&Event::Tick), LoopControl::Continue { redraw: true }));
        assert!(s.state.ephemeral_status.is_none());
        assert!(matches!(s.handle_event(&Event::Tick), LoopControl::Continue { redraw: false }));
    }

    #[test]
    fn resize_recomputes_margin_and_size() {
        let mut config = Config::default();
        config.file.scroll.margin.vertical = 10;
        let mut s = Session::new(EditorState::from_lines(["x"]), config);
        s.handle_event(&Event::Input(InputEvent::Resize(80, 13)));
        assert_eq!(s.size, (80, 13));
        // 12 text rows: margin capped at (12 - 2) / 2.
        assert_eq!(s.config.effective_vertical_margin, 5);
        assert_eq!(s.engine.options().vertical_margin, 5);
    }

    #[test]
    fn load_applies_config_and_opens_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("levi.toml");
        std::fs::write(&cfg, "[editor]\ntab_width = 2\n").unwrap();
        let args = Args {
            path: dir.path().join("new.txt"),
            config: Some(cfg),
        };
        let s = Session::load(&args).unwrap();
        assert_eq!(s.state.options.tab_width, 2);
        assert_eq!(s.state.buffer.line_count(), 1);
        assert!(!s.state.dirty);
        assert_eq!(s.state.file_name.as_deref(), Some(args.path.as_path()));
    }
}
