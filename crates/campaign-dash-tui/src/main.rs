//! campaign-dash - a terminal dashboard for Zoho-synced Frappe campaigns.
//!
//! Opens a campaign, shows its analytics as metric tiles, drills into the
//! recipients behind each metric and triggers a sync from Zoho Campaigns.

mod app;
mod logging;
mod ui;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use campaign_dash_core::api::FrappeClient;
use campaign_dash_core::auth::{ApiCredentials, CredentialStore};
use campaign_dash_core::config::Config;
use campaign_dash_core::dashboard::{render_dashboard, Dashboard};
use campaign_dash_core::i18n;

use app::{App, AppState};
use ui::input::{handle_input, handle_mouse};
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const USAGE: &str = "\
Usage: campaign-dash [CAMPAIGN]
       campaign-dash --login
       campaign-dash --dump-dashboard CAMPAIGN

Options:
  --login                    Store the site URL and API key/secret
  --dump-dashboard CAMPAIGN  Print the dashboard tiles of a campaign as JSON
  -h, --help                 Show this help";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load()?;
    i18n::init(config.language.as_deref());

    // Check for CLI commands
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("-h") | Some("--help") => {
            println!("{}", USAGE);
            return Ok(());
        }
        Some("--login") => {
            logging::init_stderr();
            return login(config).await;
        }
        Some("--dump-dashboard") => {
            logging::init_stderr();
            let name = args
                .get(1)
                .context("--dump-dashboard needs a campaign name")?;
            return dump_dashboard(&config, name).await;
        }
        Some(flag) if flag.starts_with('-') => {
            bail!("Unknown option {}\n\n{}", flag, USAGE);
        }
        _ => {}
    }

    let campaign = args.first().cloned().or_else(|| config.last_campaign.clone());

    // Initialize logging; the guard flushes the file on exit
    let _log_guard = match config.log_dir().and_then(|dir| logging::init_file(&dir)) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {:#}", e);
            None
        }
    };
    info!("campaign-dash starting");

    // Create app before touching the terminal so setup errors print normally
    let mut app = App::new(config)?;
    match campaign {
        Some(name) => app.open_campaign(&name),
        None => app.load_campaigns(),
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

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

    info!("campaign-dash shutting down");
    Ok(())
}

/// Read one line from stdin, keeping `current` when the answer is blank
fn prompt(label: &str, current: Option<&str>) -> Result<String> {
    match current {
        Some(value) => eprint!("{} [{}]: ", label, value),
        None => eprint!("{}: ", label),
    }
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let answer = line.trim();

    if !answer.is_empty() {
        Ok(answer.to_string())
    } else if let Some(value) = current {
        Ok(value.to_string())
    } else {
        bail!("{} is required", label)
    }
}

/// Ask for site and API credentials, verify them, then save
async fn login(mut config: Config) -> Result<()> {
    let site_url = prompt("Site URL", config.site_url.as_deref())?;
    let api_key = prompt("API key", config.api_key.as_deref())?;
    let api_secret = rpassword::prompt_password("API secret: ")?;
    if api_secret.trim().is_empty() {
        bail!("API secret is required");
    }

    let client = FrappeClient::new(&site_url)?
        .with_credentials(ApiCredentials::new(&api_key, &api_secret));
    let user = client
        .fetch_logged_user()
        .await
        .context("Could not verify the API key")?;

    CredentialStore::store(api_key.trim(), api_secret.trim())?;
    config.site_url = Some(site_url);
    config.api_key = Some(api_key.trim().to_string());
    config.save()?;

    info!(user = %user, site = %client.site_url(), "Credentials saved");
    eprintln!("Logged in to {} as {}", client.site_url(), user);
    Ok(())
}

/// Print the tiles a campaign would show, as JSON (`null` when none match)
async fn dump_dashboard(config: &Config, name: &str) -> Result<()> {
    let client =
        FrappeClient::new(config.require_site_url()?)?.with_credentials(config.credentials()?);

    let record = client.fetch_campaign(name).await?;
    let dashboard = render_dashboard(&record.campaign_analytics);
    if !has_tiles(dashboard.as_ref()) {
        warn!(campaign = %name, "Campaign has no dashboard tiles");
    }

    println!("{}", serde_json::to_string_pretty(&dashboard)?);
    Ok(())
}

/// Whether a rendered dashboard shows at least one tile
fn has_tiles(dashboard: Option<&Dashboard>) -> bool {
    dashboard.map_or(false, |d| !d.is_empty())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI, remembering the area for mouse hit-testing
        terminal.draw(|f| {
            app.viewport = f.area();
            render(f, app);
        })?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    // Ctrl+C to quit
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        return Ok(());
                    }

                    if handle_input(app, key) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                _ => {}
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();
        app.expire_notifications();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
