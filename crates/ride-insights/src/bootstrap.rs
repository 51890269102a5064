use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Conventional dataset file name looked up when `--data` is not given.
pub const DEFAULT_DATA_FILE: &str = "ola_rides.csv";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the standard `~/.ride-insights/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.ride-insights/`
/// - `~/.ride-insights/logs/`
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let insights_dir = home.join(".ride-insights");
    std::fs::create_dir_all(&insights_dir)?;
    std::fs::create_dir_all(insights_dir.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// Falls back to `"info"` if the level string is not recognised.
///
/// The `log_file` parameter is accepted for forward-compatibility but file
/// logging is not yet wired – all output currently goes to stderr.
pub fn setup_logging(log_level: &str, _log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let normalised = match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        other => other.to_lowercase(),
    };

    let filter = EnvFilter::try_new(&normalised).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Locate the trip-log CSV.
///
/// Checks the following in order and returns the first that exists:
/// 1. The explicit `--data` path (returned even when absent, so the caller
///    surfaces a precise file error instead of silently falling back).
/// 2. `./ola_rides.csv` in the working directory.
/// 3. `~/.ride-insights/ola_rides.csv`.
///
/// Returns `None` when no explicit path was given and neither conventional
/// location exists; ingestion is then deferred until a file is supplied.
pub fn discover_data_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from(DEFAULT_DATA_FILE);
    if local.exists() {
        return Some(local);
    }

    let home = dirs::home_dir()?;
    let stashed = home.join(".ride-insights").join(DEFAULT_DATA_FILE);
    if stashed.exists() {
        return Some(stashed);
    }

    None
}

// ── Tests ──────────────────────────────────────────────────────────────────────
