//! PowerScan server: FLIR thermal extraction and inspection PDF reports over HTTP.

pub mod config;

pub use config::{load_config, ServerArgs};
pub use powerscan_api::{build_app, serve, start_server, AppState};
pub use powerscan_models::Config;

use powerscan_metrics::MetricsService;
use powerscan_report::{CommandPdfRenderer, ReportService};
use std::sync::Arc;

/// Wires the report service (external PDF converter) and metrics into the API state.
pub fn build_state(config: Config) -> anyhow::Result<AppState> {
    let pdf = Arc::new(CommandPdfRenderer::from_config(&config.report));
    let reports = ReportService::new(config.report.clone(), config.map.clone(), pdf)?;
    let metrics = MetricsService::new()?;
    Ok(AppState::new(config, Arc::new(reports), Arc::new(metrics)))
}
