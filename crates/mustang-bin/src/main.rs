//! mustang entrypoint.
use anyhow::{Context, Result};
use core_actions::{Dispatcher, EditFile, keymap_spec, open_for_edit};
use core_config::{Config, LogConfig};
use core_keymap::Keymap;
use core_state::{EditorState, ViewState};
use core_terminal::{CrosstermBackend, TerminalBackend};
use core_text::LineStore;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Once;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod cli;
mod runtime;

use runtime::{EditorRuntime, ShutdownReason};

struct AppStartup {
    config: Config,
    log_guard: Option<WorkerGuard>,
}

/// File opened and read before any terminal setup.
struct EditorBootstrap {
    file: EditFile,
    content: Vec<u8>,
}

impl AppStartup {
    fn new(config: Config) -> Self {
        Self {
            config,
            log_guard: None,
        }
    }

    /// Install the file subscriber when `[log] file` is configured.
    fn configure_logging(&mut self) -> Result<()> {
        let log = &self.config.file.log;
        let Some(path) = log.file.as_deref() else {
            return Ok(());
        };
        let (dir, name) = split_log_path(path);
        let file_appender = tracing_appender::rolling::never(dir, name);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(env_filter(log))
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global subscriber already installed; drop guard so writer shuts down.
            }
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                core_terminal::emergency_restore();
                default_panic(info);
            }));
        });
    }

    fn load_file(path: &Path) -> Result<EditorBootstrap> {
        let mut file = open_for_edit(path)?;
        let content = file.read_all()?;
        Ok(EditorBootstrap { file, content })
    }

    fn keymap(&self) -> (Keymap, Option<String>) {
        match Keymap::build(&keymap_spec(&self.config.file.keys)) {
            Ok(map) => (map, None),
            Err(e) => {
                warn!(target: "config", error = %e, "keymap_fallback_default");
                (Keymap::default(), Some(format!("Config error: {e}")))
            }
        }
    }
}

fn env_filter(log: &LogConfig) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_new(&log.level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

fn split_log_path(path: &Path) -> (PathBuf, PathBuf) {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let name = path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("mustang.log"));
    (dir, name)
}

/// Text rows and columns for a terminal of `rows` x `cols`; the last row is the status line.
pub(crate) fn text_area(rows: u16, cols: u16) -> (usize, usize) {
    ((rows as usize).saturating_sub(1).max(1), cols as usize)
}

/// Startup problems joined into one status message, in the order they occurred.
pub(crate) fn startup_notice(config_error: Option<&str>, keymap_error: Option<&str>, dropped: usize) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(err) = config_error {
        parts.push(format!("Config error: {err}"));
    }
    if let Some(msg) = keymap_error {
        parts.push(msg.to_string());
    }
    if dropped > 0 {
        parts.push(format!("{dropped} bytes after the last newline were not loaded"));
    }
    (!parts.is_empty()).then(|| parts.join("; "))
}

fn run(args: cli::Args) -> Result<ShutdownReason> {
    let config = core_config::load()?;
    let mut startup = AppStartup::new(config);
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", path = %args.path.display(), "startup");
    // Logged while the appender guard is still alive.
    let result = session(&startup, &args);
    match &result {
        Ok(reason) => info!(target: "runtime", reason = reason.as_str(), "exit"),
        Err(e) => error!(target: "runtime", error = %e, "fatal"),
    }
    result
}

fn session(startup: &AppStartup, args: &cli::Args) -> Result<ShutdownReason> {
    if let Some(err) = startup.config.parse_error.as_deref() {
        let source = startup.config.source.as_ref().map(|p| p.display().to_string());
        warn!(target: "config", path = source.as_deref(), error = err, "config_parse_error");
    }

    let EditorBootstrap { mut file, content } = AppStartup::load_file(&args.path)?;
    let store = LineStore::load(&content);
    let access = file.access();
    let (keymap, keymap_error) = startup.keymap();

    let mut backend = CrosstermBackend::new();
    backend.set_title(&format!("mustang - {}", args.path.display()))?;
    let mut guard = backend.enter_guard()?;
    let (rows, cols) = guard.dimensions().context("terminal size")?;
    let (height, width) = text_area(rows, cols);

    let mut state = EditorState::new(store, args.path.clone(), access, ViewState::new(height, width));
    let dropped = state.store.dropped_tail();
    if dropped > 0 {
        warn!(target: "runtime.startup", bytes = dropped, "trailing_partial_line_dropped");
    }
    if let Some(msg) = startup_notice(startup.config.parse_error.as_deref(), keymap_error.as_deref(), dropped) {
        state.set_error(msg);
    }
    info!(
        target: "runtime.startup",
        lines = state.store.line_count(),
        bytes = content.len(),
        ?access,
        rows,
        cols,
        "bootstrap_complete"
    );

    let mut runtime = EditorRuntime::new(&mut *guard, &mut file, state, Dispatcher::new(keymap));
    let reason = runtime.run()?;
    drop(runtime);
    guard.release()?;
    Ok(reason)
}

fn main() -> ExitCode {
    let args = match cli::parse(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(1);
        }
    };
    match run(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("mustang: {e:#}");
            ExitCode::from(1)
        }
    }
}
