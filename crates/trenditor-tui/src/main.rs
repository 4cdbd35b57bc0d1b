//! Trenditor - a terminal client for Mastodon trend and sentiment analysis.
//!
//! This application provides a fast, keyboard-driven interface for keyword
//! search, trend analysis and managing your own toots.

mod app;
mod forms;
mod ui;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trenditor_core::auth::open_token_store;
use trenditor_core::models::LoginForm;
use trenditor_core::{ApiClient, AuthState, CacheManager, Config, SessionManager};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file prefix inside `<cache_dir>/logs`
const LOG_FILE_NAME: &str = "trenditor.log";

const USAGE: &str = "\
Usage: trenditor [COMMAND]

Commands:
  --login     Sign in from the command line
  --logout    Remove the stored session
  --whoami    Verify the stored session and print the signed-in user
  --help      Show this message

Without a command the interactive terminal UI starts.";

/// Initialize the tracing subscriber for logging.
///
/// The TUI owns the terminal, so logs go to a daily rolling file. Use the
/// RUST_LOG env var to control the level (e.g., RUST_LOG=debug).
fn init_tracing(cache_dir: &std::path::Path) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let appender = tracing_appender::rolling::daily(cache_dir.join("logs"), LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    guard
}

/// Services shared by the TUI and the CLI commands
struct Services {
    config: Config,
    api: ApiClient,
    session: SessionManager,
    cache: CacheManager,
}

fn build_services(config: Config, cache_dir: PathBuf) -> Result<Services> {
    let api = ApiClient::with_timeout(
        config.api_url(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    info!(api_url = %api.base_url(), storage = ?config.token_storage, "Services configured");

    let store = open_token_store(config.token_storage, &cache_dir);
    let session = SessionManager::new(
        store,
        Arc::new(api.clone()),
        Duration::from_secs(config.request_timeout_secs),
    );
    let cache = CacheManager::new(cache_dir)?;

    Ok(Services {
        config,
        api,
        session,
        cache,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config, using defaults: {:#}", e);
            Config::default()
        }
    };
    let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
    let _log_guard = init_tracing(&cache_dir);

    let services = build_services(config, cache_dir)?;

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--login") => return login_command(services).await,
        Some("--logout") => return logout_command(services).await,
        Some("--whoami") => return whoami_command(services).await,
        Some("--help") | Some("-h") => {
            println!("{}", USAGE);
            return Ok(());
        }
        Some(other) => {
            eprintln!("Unknown argument: {}\n\n{}", other, USAGE);
            std::process::exit(2);
        }
        None => {}
    }

    info!("Trenditor starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let Services {
        config,
        api,
        session,
        cache,
    } = services;
    let mut app = App::new(config, session, api, cache);

    // Settle the stored session in the background; protected pages wait on it
    app.start();

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Trenditor shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Pick up session changes before drawing so the guard sees them
        app.sync_session();

        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

// ============================================================================
// CLI Commands
// ============================================================================

fn prompt_email(last_email: Option<&str>) -> Result<String> {
    match last_email {
        Some(last) => print!("Email [{}]: ", last),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input).context("Failed to read email")?;
    let input = input.trim();
    if input.is_empty() {
        Ok(last_email.unwrap_or_default().to_string())
    } else {
        Ok(input.to_string())
    }
}

async fn login_command(services: Services) -> Result<()> {
    let Services {
        mut config,
        session,
        cache,
        ..
    } = services;

    println!("\n=== Trenditor Login ===\n");
    let email = prompt_email(config.last_email.as_deref())?;
    let password = rpassword::prompt_password("Password: ")?;
    let form = LoginForm { email, password };
    if let Err(message) = form.validate() {
        anyhow::bail!(message);
    }

    let settled = session
        .log_in(&form)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    match settled.state {
        AuthState::Authenticated(user) => {
            // A different account must not see the previous account's cache
            if config.last_email.as_deref() != Some(user.email.as_str()) {
                if let Err(e) = cache.clear_all() {
                    warn!(error = %e, "Failed to clear cache");
                }
            }
            config.last_email = Some(user.email.clone());
            if let Err(e) = config.save() {
                warn!(error = %e, "Failed to save config");
            }
            println!("Signed in as {} <{}>", user.name, user.email);
            Ok(())
        }
        _ => {
            let reason = settled
                .last_error
                .unwrap_or_else(|| "Sign in could not be completed".to_string());
            anyhow::bail!(reason)
        }
    }
}

async fn logout_command(services: Services) -> Result<()> {
    let settled = services.session.verify().await;
    if let Some(user) = settled.user() {
        if let Err(e) = services.cache.clear_user(&user.id) {
            warn!(error = %e, "Failed to clear user cache");
        }
    }

    let after = services.session.log_out().await;
    if after.is_logged_in() {
        anyhow::bail!("The stored session could not be removed");
    }
    println!("Signed out.");
    Ok(())
}

async fn whoami_command(services: Services) -> Result<()> {
    let settled = services.session.verify().await;
    match settled.user() {
        Some(user) => {
            println!("{} <{}> (id {})", user.name, user.email, user.id);
            println!("Server: {}", services.api.base_url());
            Ok(())
        }
        None => {
            match settled.last_error {
                Some(error) => println!("Not signed in: {}", error),
                None => println!("Not signed in. Run `trenditor --login`."),
            }
            Ok(())
        }
    }
}
