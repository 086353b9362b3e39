mod bootstrap;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use trendboard_core::config::DataConfig;
use trendboard_core::settings::Settings;
use trendboard_data::analysis::ViewLimits;
use trendboard_data::export::write_export;
use trendboard_data::reader::{DataSource, ParseOptions};
use trendboard_runtime::orchestrator::DashboardOrchestrator;

use crate::render::{PageRequest, View};

/// Used when no source is given, configured or discovered.
const FALLBACK_SOURCE: &str = "data/layoffs.csv";

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Trendboard v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = settings.config.clone().unwrap_or_else(DataConfig::config_path);
    let config = DataConfig::load_from(&config_path);
    if settings.config.is_none() && !config_path.exists() {
        // Leave an editable copy of the defaults behind.
        if let Err(e) = config.save_to(&config_path) {
            tracing::warn!(error = %e, "could not write default data config");
        }
    }
    let options = ParseOptions::from_config(&config)
        .with_context(|| format!("invalid data config {}", config_path.display()))?;
    let export_options = bootstrap::export_options(&settings)?;

    let source = bootstrap::resolve_source(
        settings.source.as_deref(),
        config.source.as_deref(),
        bootstrap::discover_data_path(),
    )
    .unwrap_or_else(|| {
        tracing::warn!("no data source configured; trying {}", FALLBACK_SOURCE);
        DataSource::File(PathBuf::from(FALLBACK_SOURCE))
    });

    tracing::info!(
        "Source: {}, View: {}, Format: {}",
        source,
        settings.view,
        settings.format
    );

    let limits = match settings.top {
        Some(n) => ViewLimits {
            companies: usize::from(n),
            regions: usize::from(n),
            ..ViewLimits::default()
        },
        None => ViewLimits::default(),
    };

    let orchestrator = DashboardOrchestrator::new(source, options)
        .with_filter(settings.filter())
        .with_limits(limits);
    let (mut rx, handle) = orchestrator.start();

    let snapshot = tokio::select! {
        snapshot = rx.recv() => snapshot,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down dashboard task");
            handle.abort();
            return Ok(());
        }
    };
    let Some(data) = snapshot else {
        handle.abort();
        anyhow::bail!("dashboard task exited before producing data");
    };

    let view = View::from_name(&settings.view);
    let page = PageRequest {
        page: settings.page as usize,
        per_page: settings.rows_per_page as usize,
    };
    let output = match settings.format.as_str() {
        "json" => render::render_json(&data, view, page)?,
        _ => render::render_text(&data, view, page),
    };
    println!("{}", output.trim_end());

    if let Some(path) = &settings.export {
        let written = write_export(&data.views.records, path, &export_options)
            .with_context(|| format!("failed to export to {}", path.display()))?;
        if written {
            eprintln!(
                "Exported {} records to {}",
                data.views.records.len(),
                path.display()
            );
        } else {
            eprintln!("Nothing to export for this selection");
        }
    }

    handle.abort();
    Ok(())
}
