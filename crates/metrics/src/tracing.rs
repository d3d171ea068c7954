use powerscan_models::{LogFormat, LoggingConfig, PowerScanError, ThermalMode};
use ::tracing::{error, info};
use tracing_subscriber::{fmt::time::UtcTime, EnvFilter};

pub struct TracingService;

impl TracingService {
    /// Installs the global subscriber. `RUST_LOG` overrides the configured level.
    pub fn init(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))?;

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_timer(UtcTime::rfc_3339());

        match config.format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Pretty => builder.pretty().try_init(),
        }
    }

    pub fn log_extraction_completed(
        filename: &str,
        mode: ThermalMode,
        width: u32,
        height: u32,
        duration_ms: u64,
    ) {
        info!(
            filename = %filename,
            mode = ?mode,
            width = width,
            height = height,
            duration_ms = duration_ms,
            "Thermal extraction completed"
        );
    }

    pub fn log_report_completed(measure_id: &str, format: &str, bytes: usize, duration_ms: u64) {
        info!(
            measure_id = %measure_id,
            format = %format,
            bytes = bytes,
            duration_ms = duration_ms,
            "Report generated"
        );
    }

    pub fn log_error(operation: &str, error: &PowerScanError) {
        error!(
            operation = %operation,
            error_type = %error.error_type(),
            error_message = %error,
            "Request failed"
        );
    }
}
