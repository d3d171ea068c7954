use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorShape {
    pub detail: String,
    pub error_type: String,
}

#[derive(Error, Debug)]
pub enum PowerScanError {
    #[error("Only JPG/JPEG supported")]
    UnsupportedFileType { filename: String },

    #[error("Empty file")]
    EmptyFile,

    #[error("No thermal data found (NOT a radiometric FLIR image)")]
    NotRadiometric,

    #[error("Thermal data extraction failed: {reason}")]
    ExtractionFailed { reason: String },

    #[error("Invalid image: {reason}")]
    InvalidImage { reason: String },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("PDF generation failed: {reason}")]
    ReportFailed { reason: String },

    #[error("Internal server error: {reason}")]
    InternalError { reason: String },

    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },
}

impl PowerScanError {
    pub fn to_error_shape(&self) -> ErrorShape {
        ErrorShape {
            detail: self.to_string(),
            error_type: self.error_type().to_string(),
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            PowerScanError::UnsupportedFileType { .. } => "UnsupportedFileType",
            PowerScanError::EmptyFile => "EmptyFile",
            PowerScanError::NotRadiometric => "NotRadiometric",
            PowerScanError::ExtractionFailed { .. } => "ExtractionFailed",
            PowerScanError::InvalidImage { .. } => "InvalidImage",
            PowerScanError::InvalidRequest { .. } => "InvalidRequest",
            PowerScanError::ReportFailed { .. } => "ReportFailed",
            PowerScanError::InternalError { .. } => "InternalError",
            PowerScanError::ConfigError { .. } => "ConfigError",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            PowerScanError::UnsupportedFileType { .. } => 400,
            PowerScanError::EmptyFile => 400,
            PowerScanError::NotRadiometric => 400,
            PowerScanError::ExtractionFailed { .. } => 400,
            PowerScanError::InvalidImage { .. } => 400,
            PowerScanError::InvalidRequest { .. } => 400,
            PowerScanError::ReportFailed { .. } => 500,
            PowerScanError::InternalError { .. } => 500,
            PowerScanError::ConfigError { .. } => 500,
        }
    }
}
