mod bootstrap;
mod report;

use anyhow::Result;
use insights_core::error::InsightsError;
use insights_core::models::Dataset;
use insights_core::settings::Settings;
use insights_data::analysis::analyze;
use insights_data::reader::load_dataset;
use insights_ui::app::App;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Ride Insights v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("View: {}, Theme: {}", settings.view, settings.theme);

    let data_path = bootstrap::discover_data_path(settings.data.as_deref());

    match settings.view.as_str() {
        "dashboard" => {
            // With no data file anywhere, the dashboard still opens and shows
            // the load-a-file screen; ingestion is deferred, never implicit.
            let dataset = match &data_path {
                Some(path) => load_dataset(path)?,
                None => {
                    tracing::warn!(
                        "No {} found; starting dashboard without data",
                        bootstrap::DEFAULT_DATA_FILE
                    );
                    Dataset::default()
                }
            };

            let app = App::new(&settings.theme, dataset, settings.preview_rows as usize);
            app.run()?;
        }

        "report" => {
            let path = data_path.ok_or_else(|| {
                InsightsError::DataFileNotFound(bootstrap::DEFAULT_DATA_FILE.into())
            })?;
            let dataset = load_dataset(&path)?;

            let stdout = std::io::stdout();
            report::write_report(&mut stdout.lock(), &dataset)?;
        }

        "summary" => {
            let path = data_path.ok_or_else(|| {
                InsightsError::DataFileNotFound(bootstrap::DEFAULT_DATA_FILE.into())
            })?;
            let dataset = load_dataset(&path)?;

            let criteria = settings.criteria()?;
            let analysis = analyze(&dataset, &criteria)?;

            let stdout = std::io::stdout();
            report::write_summary(&mut stdout.lock(), &analysis)?;
        }

        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(())
}
