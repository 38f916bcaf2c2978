//! Focus Flow: terminal task and project tracker.
//!
//! Launches the TUI against the in-memory backend. Configuration via CLI
//! flags, environment variables, or config file
//! (`~/.config/focusflow/config.toml`).
//!
//! ```bash
//! # Demo data, default settings
//! cargo run --bin focusflow
//!
//! # Empty store, open on the task page, no simulated latency
//! cargo run --bin focusflow -- --no-seed --start-page tasks --latency-ms 0
//!
//! # Only allow changes to your own tasks and projects
//! cargo run --bin focusflow -- --actor "Mike Chen" --enforce-ownership
//! ```

use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use focusflow::app::App;
use focusflow::config::{AppConfig, CliArgs, ConfigError};
use focusflow::dispatch::{self, Command, Services};
use focusflow::notify::Notification;
use focusflow::service::{
    Guarded, MemoryProjectStore, MemoryTaskStore, MemoryUserDirectory, OwnershipPolicy,
};
use focusflow::ui;

type TaskStore = Guarded<MemoryTaskStore, Option<OwnershipPolicy>>;
type ProjectStore = Guarded<MemoryProjectStore, Option<OwnershipPolicy>>;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match AppConfig::load(&cli) {
        Ok(c) => c,
        Err(e @ ConfigError::MissingActor) => {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e));
        }
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            AppConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(
        seed = config.seed_demo_data,
        latency_ms = u64::try_from(config.latency.as_millis()).unwrap_or(u64::MAX),
        actor = config.actor.as_deref().unwrap_or("-"),
        enforce_ownership = config.enforce_ownership,
        "focusflow starting"
    );

    let services = Arc::new(build_services(&config));

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, services, &config);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("focusflow exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the terminal).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("focusflow.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// In-memory stores behind the (optional) ownership check.
fn build_services(config: &AppConfig) -> Services<TaskStore, ProjectStore, MemoryUserDirectory> {
    let latency = config.latency;
    let (tasks, projects) = if config.seed_demo_data {
        (
            MemoryTaskStore::seeded(latency),
            MemoryProjectStore::seeded(latency),
        )
    } else {
        (MemoryTaskStore::new(latency), MemoryProjectStore::new(latency))
    };
    Services {
        tasks: Guarded::new(tasks, config.ownership_policy()),
        projects: Guarded::new(projects, config.ownership_policy()),
        users: MemoryUserDirectory::seeded(latency),
    }
}

/// Main application loop.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    services: Arc<Services<TaskStore, ProjectStore, MemoryUserDirectory>>,
    config: &AppConfig,
) -> io::Result<()> {
    let mut app = App::new(config);
    let (cmd_tx, mut evt_rx) = dispatch::spawn_dispatcher(services, config.channel_capacity);
    let startup = app.start();
    send_all(&mut app, &cmd_tx, startup);

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Drain all pending service results (non-blocking).
        while let Ok(event) = evt_rx.try_recv() {
            let follow_up = app.apply_event(event);
            send_all(&mut app, &cmd_tx, follow_up);
        }

        // Step 3: Drop expired notifications.
        app.notifications.expire(Instant::now());

        // Step 4: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let commands = app.handle_key_event(key);
            send_all(&mut app, &cmd_tx, commands);
        }

        if app.should_quit {
            let _ = cmd_tx.try_send(Command::Shutdown);
            return Ok(());
        }
    }
}

/// Queues commands for the dispatcher, telling the user if it is saturated.
///
/// A command that cannot be queued is settled as failed, along with any
/// follow-ups that produces.
fn send_all(app: &mut App, tx: &mpsc::Sender<Command>, commands: Vec<Command>) {
    let mut queue = VecDeque::from(commands);
    while let Some(cmd) = queue.pop_front() {
        match tx.try_send(cmd) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(cmd)) => {
                queue.extend(app.command_dropped(cmd, "command channel full"));
                app.notifications
                    .push(Notification::error("Too many requests in flight, try again"));
            }
            Err(mpsc::error::TrySendError::Closed(cmd)) => {
                tracing::error!("dispatcher stopped");
                // Nothing can be sent any more, so follow-ups are dropped.
                app.command_dropped(cmd, "dispatcher stopped");
                app.notifications
                    .push(Notification::error("Background worker stopped"));
            }
        }
    }
}
