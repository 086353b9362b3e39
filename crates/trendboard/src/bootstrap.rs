use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trendboard_core::settings::Settings;
use trendboard_data::export::ExportOptions;
use trendboard_data::reader::DataSource;

/// Name of the per-user application directory under `$HOME`.
const APP_DIR: &str = ".trendboard";

/// File name looked for by [`discover_data_path`].
const DATA_FILE: &str = "layoffs.csv";

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.trendboard/` and `~/.trendboard/logs/` exist.
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    ensure_directories_in(&home_dir())
}

/// Create the application directories under `home` and return the
/// application directory.
pub fn ensure_directories_in(home: &Path) -> anyhow::Result<PathBuf> {
    let app_dir = home.join(APP_DIR);
    std::fs::create_dir_all(app_dir.join("logs"))?;
    Ok(app_dir)
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a CLI level name onto an [`EnvFilter`] directive.
///
/// Unknown names are passed through lowercased so that full directives such
/// as `trendboard_data=trace` keep working.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to stderr, or is appended to `log_file` (without ANSI colours)
/// when one is given. Falls back to `info` for an unparsable level.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }

    Ok(())
}

// ── Source discovery ───────────────────────────────────────────────────────────

/// Look for a layoff CSV in the usual places.
///
/// Checks, in order, and returns the first that exists:
/// 1. `./data/layoffs.csv`
/// 2. `./public/data/layoffs.csv`
/// 3. `~/.trendboard/layoffs.csv`
pub fn discover_data_path() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    discover_data_path_in(&cwd, &home_dir())
}

pub fn discover_data_path_in(cwd: &Path, home: &Path) -> Option<PathBuf> {
    let candidates = [
        cwd.join("data").join(DATA_FILE),
        cwd.join("public").join("data").join(DATA_FILE),
        home.join(APP_DIR).join(DATA_FILE),
    ];
    candidates.into_iter().find(|p| p.is_file())
}

/// Pick the data source: the CLI value, then the configured one, then a
/// discovered file.
pub fn resolve_source(
    cli: Option<&str>,
    configured: Option<&str>,
    discovered: Option<PathBuf>,
) -> Option<DataSource> {
    let non_blank = |s: &&str| !s.trim().is_empty();
    cli.filter(non_blank)
        .or(configured.filter(non_blank))
        .map(DataSource::parse)
        .or_else(|| discovered.map(DataSource::File))
}

/// Export options from the CLI, checked before any work starts.
pub fn export_options(settings: &Settings) -> anyhow::Result<ExportOptions> {
    let delimiter = settings.delimiter_byte().context("invalid --delimiter")?;
    Ok(ExportOptions { delimiter })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
