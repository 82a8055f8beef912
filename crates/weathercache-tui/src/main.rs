//! weathercache - a terminal forecast viewer that keeps working offline.
//!
//! The app asks a forecast service for the next three days of weather and
//! remembers the last successful answer, so it can fall back to it when the
//! service is unreachable or when offline mode is selected.

mod app;
mod ui;
mod utils;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use weathercache_core::{CacheStore, Config, FileCacheStore, MemoryCacheStore, RequestMode};

use app::{App, AppState};
use ui::{handle_input, render, render_plain};

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written inside the cache directory during interactive runs
const LOG_FILE: &str = "weathercache.log";

const USAGE: &str = "\
Usage: weathercache [--once [--offline] [CITY]]

  (no arguments)       Start the interactive forecast viewer
  --once [CITY]        Print the forecast for CITY and exit
  --offline            With --once, read only the local cache
  -h, --help           Show this help

Environment:
  WEATHERCACHE_API_URL    Forecast service base URL
  WEATHERCACHE_CACHE_DIR  Directory for the cache and log file
  RUST_LOG                Log filter (default: warn)";

// ============================================================================
// Command Line
// ============================================================================

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Interactive,
    Once { city: Option<String>, offline: bool },
    Help,
}

fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut once = false;
    let mut offline = false;
    let mut words: Vec<String> = Vec::new();

    for arg in args {
        if !arg.starts_with('-') {
            words.push(arg);
            continue;
        }
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--once" => once = true,
            "--offline" => offline = true,
            flag => bail!("Unknown option: {}", flag),
        }
    }

    if !once {
        if offline || !words.is_empty() {
            bail!("--offline and CITY are only accepted with --once");
        }
        return Ok(Command::Interactive);
    }

    // Multi-word cities work with or without quotes
    let city = Some(words.join(" ")).filter(|c| !c.trim().is_empty());
    Ok(Command::Once { city, offline })
}

// ============================================================================
// Logging
// ============================================================================

/// Initialize the tracing subscriber.
///
/// Interactive runs own the terminal, so they log to a file in `log_dir`.
/// The returned guard must live until exit or buffered lines are lost.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_dir.filter(|dir| std::fs::create_dir_all(dir).is_ok()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

// ============================================================================
// Cache Store
// ============================================================================

/// Open the forecast cache in `cache_dir`.
///
/// An unusable directory degrades to an in-memory slot for this run instead
/// of stopping the app.
fn build_store(cache_dir: PathBuf) -> Arc<dyn CacheStore> {
    match FileCacheStore::new(cache_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "Cache directory unavailable, caching in memory only");
            Arc::new(MemoryCacheStore::new())
        }
    }
}

// ============================================================================
// Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    let (config, config_error) = match Config::load() {
        Ok(config) => (config.with_env_overrides(), None),
        Err(e) => (Config::default().with_env_overrides(), Some(e)),
    };
    let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));

    let _guard = match command {
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Command::Interactive => init_tracing(Some(cache_dir.as_path())),
        Command::Once { .. } => init_tracing(None),
    };

    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }
    info!(base_url = %config.base_url, cache_dir = %cache_dir.display(), "weathercache starting");

    let mut app = App::new(config, build_store(cache_dir))?;

    match command {
        Command::Once { city, offline } => run_once(&mut app, city, offline).await,
        _ => run_interactive(&mut app).await,
    }
}

/// Retrieve one forecast, print it, and exit.
async fn run_once(app: &mut App, city: Option<String>, offline: bool) -> Result<()> {
    if let Some(city) = city {
        app.city_input = city;
    }
    app.controller.set_mode(RequestMode::from_offline_flag(offline));

    app.request_forecast();
    if let Some(msg) = app.status_message.take() {
        bail!(msg);
    }
    app.wait_for_retrievals().await;

    print!("{}", render_plain(&app.controller));

    match app.controller.last_error() {
        Some(e) if e.is_fatal() => bail!("{}", e),
        _ => Ok(()),
    }
}

async fn run_interactive(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.save_config();

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("weathercache shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        // Apply completed retrievals
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
