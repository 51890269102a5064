use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::dates::parse_date_lenient;
use crate::error::{InsightsError, Result};
use crate::models::{DateRange, FilterCriteria};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Interactive analytics over a ride-hailing trip log
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ride-insights",
    about = "Interactive analytics over a ride-hailing trip log",
    version
)]
pub struct Settings {
    /// Path to the trip-log CSV (falls back to ./ola_rides.csv, then
    /// ~/.ride-insights/ola_rides.csv)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// View mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "report", "summary"])]
    pub view: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "auto"])]
    pub theme: String,

    /// Inclusive start of the date filter (e.g. 2024-07-01)
    #[arg(long)]
    pub from: Option<String>,

    /// Inclusive end of the date filter (e.g. 2024-07-31)
    #[arg(long)]
    pub to: Option<String>,

    /// Restrict to one vehicle type ("All" means no constraint)
    #[arg(long, default_value = "All")]
    pub vehicle_type: String,

    /// Restrict to one booking status ("All" means no constraint)
    #[arg(long, default_value = "All")]
    pub booking_status: String,

    /// Restrict to one payment method ("All" means no constraint)
    #[arg(long, default_value = "All")]
    pub payment_method: String,

    /// Number of rows shown in the filtered-data preview table
    #[arg(long, default_value = "50", value_parser = clap::value_parser!(u16).range(1..=500))]
    pub preview_rows: u16,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.ride-insights/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_rows: Option<u16>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    /// Uses `~/.ride-insights/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".ride-insights").join("last_used.json")
    }

    /// Load persisted params from the default path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load persisted params from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to the default path, creating parent
    /// directories if needed.
    pub fn save(&self) -> std::result::Result<(), std::io::Error> {
        self.save_to(&Self::config_path())
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());

        // Parse into the typed struct using the same args.
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return settings;
        }

        let last = LastUsedParams::load_from(config_path);

        // Merge last-used values for fields that were NOT explicitly set on
        // the command line (CLI always wins). Filter flags are never merged:
        // stale filters silently narrowing the dataset would be surprising.
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "data") {
            if let Some(v) = last.data {
                settings.data = Some(v);
            }
        }
        if !is_arg_explicitly_set(&matches, "preview_rows") {
            if let Some(v) = last.preview_rows {
                settings.preview_rows = v;
            }
        }

        let to_persist = LastUsedParams {
            theme: Some(settings.theme.clone()),
            view: Some(settings.view.clone()),
            data: settings.data.clone(),
            preview_rows: Some(settings.preview_rows),
        };
        if let Err(e) = to_persist.save_to(config_path) {
            tracing::warn!("Failed to persist last-used params: {e}");
        }

        settings
    }

    /// Build [`FilterCriteria`] from the CLI filter flags.
    ///
    /// The `"All"` flag value maps to an unconstrained dimension. Fails with
    /// [`InsightsError::Config`] when a `--from`/`--to` string cannot be
    /// parsed, and with [`InsightsError::Validation`] when only one bound is
    /// given or the range is inverted.
    pub fn criteria(&self) -> Result<FilterCriteria> {
        let date_range = match (&self.from, &self.to) {
            (None, None) => None,
            (Some(_), None) | (None, Some(_)) => {
                return Err(InsightsError::Validation(
                    "--from and --to must be given together".to_string(),
                ));
            }
            (Some(from), Some(to)) => {
                let start = parse_date_lenient(from).ok_or_else(|| {
                    InsightsError::Config(format!("unparsable --from date: {from}"))
                })?;
                let end = parse_date_lenient(to).ok_or_else(|| {
                    InsightsError::Config(format!("unparsable --to date: {to}"))
                })?;
                Some(DateRange::new(start, end))
            }
        };

        let criteria = FilterCriteria {
            date_range,
            vehicle_type: flag_to_constraint(&self.vehicle_type),
            booking_status: flag_to_constraint(&self.booking_status),
            payment_method: flag_to_constraint(&self.payment_method),
        };
        criteria.validate()?;
        Ok(criteria)
    }
}

/// Map the CLI-facing `"All"` sentinel to an unconstrained dimension.
fn flag_to_constraint(value: &str) -> Option<String> {
    if value == "All" {
        None
    } else {
        Some(value.to_string())
    }
}

/// Whether `id` was explicitly provided on the command line (as opposed to
/// coming from a default value).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
