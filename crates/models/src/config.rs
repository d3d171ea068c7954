use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub thermal: ThermalConfig,
    pub report: ReportConfig,
    pub map: MapConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub max_request_body_size_mb: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ThermalConfig {
    /// Lower bound of the scale used when estimating from brightness.
    pub estimate_min_temp: f64,
    /// Upper bound of the scale used when estimating from brightness.
    pub estimate_max_temp: f64,
    pub demo_width: u32,
    pub demo_height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    pub default_language: String,
    pub download_timeout_secs: u64,
    pub pdf_command: String,
    pub pdf_args: Vec<String>,
    /// QR codes point here when a measure has no coordinates.
    pub app_measure_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MapConfig {
    pub enabled: bool,
    /// `{z}`, `{x}` and `{y}` are substituted per tile.
    pub tile_url_template: String,
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
    pub tile_timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 10000,
                max_request_body_size_mb: 50, // 50MB default limit
            },
            thermal: ThermalConfig {
                estimate_min_temp: 20.0,
                estimate_max_temp: 45.0,
                demo_width: 320,
                demo_height: 240,
            },
            report: ReportConfig {
                default_language: "pt".to_string(),
                download_timeout_secs: 30,
                pdf_command: "wkhtmltopdf".to_string(),
                pdf_args: vec![
                    "--quiet".to_string(),
                    "--encoding".to_string(),
                    "utf-8".to_string(),
                    "--page-size".to_string(),
                    "A4".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                ],
                app_measure_url: "https://powerscan.app/measure".to_string(),
            },
            map: MapConfig {
                enabled: true,
                tile_url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
                zoom: 17,
                width: 400,
                height: 400,
                tile_timeout_secs: 15,
                user_agent: "PowerScan/1.0 (PDF Report Generator)".to_string(),
            },
            logging: LoggingConfig {
                format: LogFormat::Json,
                level: "info".to_string(),
            },
        }
    }
}
