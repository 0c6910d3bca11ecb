//! libmanager binary entry point.
//!
//! Parses the command line, sets up file logging, performs the one-time
//! page data fetch, then runs the TUI in raw mode and restores the terminal
//! on exit.
//!
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result, anyhow};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use libmanager::api::{ApiConfig, DEFAULT_BASE_URL, HttpApi, LibraryApi};
use libmanager::app::keymap::Keymap;
use libmanager::app::{self, AppState, Page, PageData, Theme};
use libmanager::error::DynError;

#[derive(Debug, Parser)]
#[command(name = "libmanager", version, about = "Browse books and record rentals against a library backend")]
struct Cli {
    /// Base URL of the library REST backend.
    #[arg(long, env = "LIBMANAGER_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Request timeout in seconds.
    #[arg(long, env = "LIBMANAGER_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    /// Directory holding theme.conf and keybinds.conf.
    #[arg(long, env = "LIBMANAGER_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Log file; defaults to libmanager.log in the config directory.
    #[arg(long, env = "LIBMANAGER_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Page shown first: rent, books or create-user.
    #[arg(long, default_value = "rent", value_parser = parse_page)]
    page: Page,
}

fn parse_page(s: &str) -> std::result::Result<Page, String> {
    Page::parse(s).ok_or_else(|| format!("unknown page '{s}' (expected rent, books or create-user)"))
}

/// Send `tracing` output to a file; stdout belongs to the TUI.
fn init_logging(path: &std::path::Path) -> Result<WorkerGuard> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(std::path::Path::new("."));
    let file = path
        .file_name()
        .ok_or_else(|| anyhow!("log file path has no file name: {}", path.display()))?;
    std::fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))?;
    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();
    Ok(guard)
}

fn boxed(err: DynError) -> anyhow::Error {
    anyhow!(err)
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = cli.config_dir.clone().unwrap_or_else(app::default_config_dir);
    let log_file = cli.log_file.clone().unwrap_or_else(|| config_dir.join("libmanager.log"));
    let _log_guard = init_logging(&log_file)?;
    info!(api = %cli.api_url, config = %config_dir.display(), "starting libmanager");

    let theme_path = app::config_file_path(&config_dir, "theme.conf").map_err(boxed)?;
    let keys_path = app::config_file_path(&config_dir, "keybinds.conf").map_err(boxed)?;
    let theme = Theme::load_or_init(&theme_path);
    let keymap = Keymap::load_or_init(&keys_path);

    let config = ApiConfig::new(cli.api_url.clone()).with_timeout(Duration::from_secs(cli.timeout_secs));
    let api: Arc<dyn LibraryApi> = Arc::new(HttpApi::new(config).context("build HTTP client")?);

    // Page data is fetched before the first frame, like a statically generated page.
    let data = PageData::load(api.as_ref())
        .map_err(boxed)
        .with_context(|| format!("fetch page data from {}", cli.api_url))?;

    let mut state = AppState::new(api, data, theme, keymap)
        .with_page(cli.page)
        .with_api_label(cli.api_url.clone());

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &mut state);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = &res {
        error!(error = %err, "application error");
    }
    res
}
