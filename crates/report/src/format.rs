use chrono::{Duration, NaiveDate, NaiveDateTime};
use powerscan_models::{non_zero, MeasureData};

pub const DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
const MISSING: &str = "-";

/// Converts an Excel serial date (days since 1899-12-30, fraction = time of day).
pub fn excel_date_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if serial == 0.0 || !serial.is_finite() {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let micros = (serial * 86_400_000_000.0).round() as i64;
    base.checked_add_signed(Duration::microseconds(micros))
}

/// Shortest float form, always with a decimal part ("3.0", "-23.5505").
pub fn display_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Display strings for the info rows of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureFields {
    pub date_time: String,
    pub coordinates: String,
    pub temperature: String,
    pub humidity: String,
    pub wind: String,
    pub load: String,
}

impl MeasureFields {
    pub fn from_measure(measure: &MeasureData) -> Self {
        let date_time = non_zero(measure.data_criacao)
            .and_then(excel_date_to_datetime)
            .map(|dt| dt.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| MISSING.to_string());

        let coordinates = measure
            .coordinates()
            .map(|(lat, lon)| format!("{}, {}", display_float(lat), display_float(lon)))
            .unwrap_or_else(|| MISSING.to_string());

        let temperature = non_zero(measure.temp1_c)
            .map(|t| format!("{t:.1}°C"))
            .unwrap_or_else(|| MISSING.to_string());

        let humidity = non_zero(measure.umidade_relativa)
            .map(|h| format!("{h:.2}%"))
            .unwrap_or_else(|| MISSING.to_string());

        let wind = non_zero(measure.vel_do_ar_na_inspecao_ms)
            .map(|w| format!("{}m/s", display_float(w)))
            .unwrap_or_else(|| MISSING.to_string());

        let load = non_zero(measure.carregamento)
            .map(|l| format!("{l:.0}%"))
            .unwrap_or_else(|| "100%".to_string());

        Self {
            date_time,
            coordinates,
            temperature,
            humidity,
            wind,
            load,
        }
    }
}
