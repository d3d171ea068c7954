use serde::{Deserialize, Serialize};

/// How the temperatures in a response were obtained.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ThermalMode {
    FlirSdk,
    Estimated,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThermalResponse {
    pub mode: ThermalMode,
    pub warning: Option<String>,
    pub width: u32,
    pub height: u32,
    pub min_temp: f64,
    pub max_temp: f64,
    pub temperatures: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThermalSummary {
    pub width: u32,
    pub height: u32,
    pub min_temp: f64,
    pub max_temp: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct TemperatureClamp {
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
}

impl TemperatureClamp {
    pub fn apply(&self, value: f64) -> f64 {
        let mut v = value;
        if let Some(min) = self.min_temp {
            v = v.max(min);
        }
        if let Some(max) = self.max_temp {
            v = v.min(max);
        }
        v
    }

    pub fn is_empty(&self) -> bool {
        self.min_temp.is_none() && self.max_temp.is_none()
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
