use powerscan_models::{PowerScanError, ThermalMode};
use prometheus::{
    Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use tracing::{debug, instrument};

/// Millisecond buckets; extraction is tens of ms, reports can take seconds.
const DURATION_BUCKETS_MS: &[f64] = &[
    5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0,
];

fn internal(e: prometheus::Error) -> PowerScanError {
    PowerScanError::InternalError {
        reason: e.to_string(),
    }
}

pub struct MetricsService {
    registry: Registry,
    thermal_extractions_total: CounterVec,
    thermal_extraction_errors_total: CounterVec,
    reports_generated_total: CounterVec,
    report_errors_total: Counter,
    thermal_extraction_duration_ms: Histogram,
    report_duration_ms: Histogram,
}

impl MetricsService {
    pub fn new() -> Result<Self, PowerScanError> {
        let registry = Registry::new();

        let thermal_extractions_total = CounterVec::new(
            Opts::new(
                "thermal_extractions_total",
                "Total number of successful thermal extractions",
            ),
            &["mode"],
        )
        .map_err(internal)?;

        let thermal_extraction_errors_total = CounterVec::new(
            Opts::new(
                "thermal_extraction_errors_total",
                "Total number of failed thermal extractions",
            ),
            &["error_type"],
        )
        .map_err(internal)?;

        let reports_generated_total = CounterVec::new(
            Opts::new("reports_generated_total", "Total number of generated reports"),
            &["format"],
        )
        .map_err(internal)?;

        let report_errors_total =
            Counter::new("report_errors_total", "Total number of failed reports").map_err(internal)?;

        let thermal_extraction_duration_ms = Histogram::with_opts(
            HistogramOpts::new(
                "thermal_extraction_duration_ms",
                "Thermal extraction duration in milliseconds",
            )
            .buckets(DURATION_BUCKETS_MS.to_vec()),
        )
        .map_err(internal)?;

        let report_duration_ms = Histogram::with_opts(
            HistogramOpts::new("report_duration_ms", "Report generation duration in milliseconds")
                .buckets(DURATION_BUCKETS_MS.to_vec()),
        )
        .map_err(internal)?;

        registry
            .register(Box::new(thermal_extractions_total.clone()))
            .map_err(internal)?;
        registry
            .register(Box::new(thermal_extraction_errors_total.clone()))
            .map_err(internal)?;
        registry
            .register(Box::new(reports_generated_total.clone()))
            .map_err(internal)?;
        registry
            .register(Box::new(report_errors_total.clone()))
            .map_err(internal)?;
        registry
            .register(Box::new(thermal_extraction_duration_ms.clone()))
            .map_err(internal)?;
        registry
            .register(Box::new(report_duration_ms.clone()))
            .map_err(internal)?;

        Ok(Self {
            registry,
            thermal_extractions_total,
            thermal_extraction_errors_total,
            reports_generated_total,
            report_errors_total,
            thermal_extraction_duration_ms,
            report_duration_ms,
        })
    }

    #[instrument(skip(self))]
    pub fn record_extraction(&self, mode: ThermalMode, duration_ms: f64) {
        let label = match mode {
            ThermalMode::FlirSdk => "flir_sdk",
            ThermalMode::Estimated => "estimated",
        };
        self.thermal_extractions_total.with_label_values(&[label]).inc();
        self.thermal_extraction_duration_ms.observe(duration_ms);
        debug!("Recorded {} extraction in {}ms", label, duration_ms);
    }

    #[instrument(skip(self))]
    pub fn record_extraction_error(&self, error_type: &str) {
        self.thermal_extraction_errors_total
            .with_label_values(&[error_type])
            .inc();
    }

    /// `format` is `pdf` or `html`.
    #[instrument(skip(self))]
    pub fn record_report(&self, format: &str, duration_ms: f64) {
        self.reports_generated_total.with_label_values(&[format]).inc();
        self.report_duration_ms.observe(duration_ms);
        debug!("Recorded {} report in {}ms", format, duration_ms);
    }

    #[instrument(skip(self))]
    pub fn record_report_error(&self) {
        self.report_errors_total.inc();
    }

    pub fn get_prometheus_metrics(&self) -> Result<String, PowerScanError> {
        let metric_families = self.registry.gather();
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();

        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(internal)?;

        String::from_utf8(buffer).map_err(|e| PowerScanError::InternalError {
            reason: e.to_string(),
        })
    }
}
