//! Temperature extraction from FLIR radiometric JPEGs.
//!
//! A radiometric FLIR JPEG carries an FFF container split across APP1
//! segments. The container holds the raw sensor frame and the calibration
//! needed to turn sensor counts into degrees Celsius.

pub mod camera;
pub mod estimate;
pub mod fff;
pub mod jpeg;
pub mod planck;
pub mod raw;
mod reader;

pub use camera::CameraInfo;
pub use estimate::{estimate_from_brightness, ESTIMATE_WARNING};
pub use fff::{FffFile, FffRecord, RECORD_CAMERA_INFO, RECORD_RAW_DATA};
pub use jpeg::read_flir_segments;
pub use planck::{raw_to_celsius, PlanckModel};
pub use raw::RawThermalImage;
pub use reader::ByteOrder;

use powerscan_models::{
    round2, PowerScanError, TemperatureClamp, ThermalMode, ThermalResponse, ThermalSummary,
};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Error, Debug)]
pub enum FlirError {
    #[error("not a JPEG file")]
    NotJpeg,

    #[error("no FLIR segments found")]
    NotRadiometric,

    #[error("truncated {what}")]
    Truncated { what: &'static str },

    #[error("bad FFF magic")]
    BadMagic,

    #[error("unsupported FFF version {version}")]
    UnsupportedVersion { version: u32 },

    #[error("missing {record} record")]
    MissingRecord { record: &'static str },

    #[error("raw thermal image: {reason}")]
    RawImage { reason: String },

    #[error("raw image is {actual:?}, header says {expected:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("{reason}")]
    InvalidImage { reason: String },
}

impl From<FlirError> for PowerScanError {
    fn from(err: FlirError) -> Self {
        match err {
            FlirError::NotRadiometric => PowerScanError::NotRadiometric,
            FlirError::InvalidImage { reason } => PowerScanError::InvalidImage { reason },
            other => PowerScanError::ExtractionFailed {
                reason: other.to_string(),
            },
        }
    }
}

/// A temperature map in degrees Celsius, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalImage {
    pub width: u32,
    pub height: u32,
    pub celsius: Vec<f64>,
    /// Present when the temperatures come from radiometric data.
    pub camera: Option<CameraInfo>,
}

impl ThermalImage {
    pub fn min(&self) -> f64 {
        self.celsius.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.celsius.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn clamp(&mut self, clamp: TemperatureClamp) {
        if clamp.is_empty() {
            return;
        }
        for t in &mut self.celsius {
            *t = clamp.apply(*t);
        }
    }

    pub fn summary(&self) -> ThermalSummary {
        ThermalSummary {
            width: self.width,
            height: self.height,
            min_temp: self.min(),
            max_temp: self.max(),
        }
    }

    pub fn into_response(self, mode: ThermalMode, warning: Option<String>) -> ThermalResponse {
        ThermalResponse {
            mode,
            warning,
            width: self.width,
            height: self.height,
            min_temp: round2(self.min()),
            max_temp: round2(self.max()),
            temperatures: self.celsius,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlirExtractor;

impl FlirExtractor {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(self, jpeg), fields(bytes = jpeg.len()))]
    pub fn extract(&self, jpeg: &[u8]) -> Result<ThermalImage, FlirError> {
        let blob = read_flir_segments(jpeg)?;
        let fff = FffFile::parse(&blob)?;

        let raw_record = fff
            .record(RECORD_RAW_DATA)
            .ok_or(FlirError::MissingRecord { record: "RawData" })?;
        let camera_record = fff
            .record(RECORD_CAMERA_INFO)
            .ok_or(FlirError::MissingRecord { record: "CameraInfo" })?;

        let raw = RawThermalImage::parse(fff.record_data(raw_record)?)?;
        let camera = CameraInfo::parse(fff.record_data(camera_record)?)?;

        let model = PlanckModel::new(&camera);
        let celsius = raw
            .pixels
            .iter()
            .map(|v| model.to_celsius(f64::from(*v)))
            .collect();

        debug!(
            width = raw.width,
            height = raw.height,
            camera_model = %camera.camera_model,
            emissivity = camera.emissivity,
            "Extracted radiometric frame"
        );

        Ok(ThermalImage {
            width: raw.width,
            height: raw.height,
            celsius,
            camera: Some(camera),
        })
    }
}
