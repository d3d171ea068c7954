use powerscan_flir::FlirExtractor;
use powerscan_metrics::MetricsService;
use powerscan_models::Config;
use powerscan_report::ReportService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub extractor: FlirExtractor,
    pub reports: Arc<ReportService>,
    pub metrics: Arc<MetricsService>,
}

impl AppState {
    pub fn new(config: Config, reports: Arc<ReportService>, metrics: Arc<MetricsService>) -> Self {
        Self {
            config,
            extractor: FlirExtractor::new(),
            reports,
            metrics,
        }
    }
}
