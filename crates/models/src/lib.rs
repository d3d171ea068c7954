pub mod config;
pub mod error;
pub mod report;
pub mod thermal;

pub use config::*;
pub use error::*;
pub use report::*;
pub use thermal::*;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json;

    #[test]
    fn test_thermal_response_uses_camel_case() {
        let response = ThermalResponse {
            mode: ThermalMode::FlirSdk,
            warning: None,
            width: 2,
            height: 1,
            min_temp: 21.5,
            max_temp: 30.25,
            temperatures: vec![21.5, 30.25],
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["mode"], "flir_sdk");
        assert_eq!(value["minTemp"], 21.5);
        assert_eq!(value["maxTemp"], 30.25);
        assert!(value["warning"].is_null());
        assert_eq!(value["temperatures"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_estimated_mode_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ThermalMode::Estimated).unwrap(),
            "\"estimated\""
        );
    }

    #[test]
    fn test_pdf_request_defaults() {
        let json = r#"{"measure_data": {"id_unico": "M-1"}}"#;
        let request: PdfRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.measure_data.id_unico, "M-1");
        assert_eq!(request.language.as_deref(), Some("pt"));
        assert_eq!(request.elements, Some(Vec::new()));
        assert!(request.thermal_image_url.is_none());
    }

    #[test]
    fn test_pdf_request_requires_id_unico() {
        let json = r#"{"measure_data": {"latitude": -23.5}}"#;
        let result: Result<PdfRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_coordinates_ignore_zero() {
        let mut measure = MeasureData {
            id_unico: "M-1".into(),
            latitude: Some(-23.55),
            longitude: Some(-46.63),
            ..Default::default()
        };
        assert_eq!(measure.coordinates(), Some((-23.55, -46.63)));

        measure.longitude = Some(0.0);
        assert_eq!(measure.coordinates(), None);
    }

    #[test]
    fn test_clamp_is_independent_per_bound() {
        let clamp = TemperatureClamp { min_temp: Some(25.0), max_temp: None };
        assert_eq!(clamp.apply(20.0), 25.0);
        assert_eq!(clamp.apply(90.0), 90.0);

        let clamp = TemperatureClamp { min_temp: None, max_temp: Some(40.0) };
        assert_eq!(clamp.apply(20.0), 20.0);
        assert_eq!(clamp.apply(90.0), 40.0);
        assert!(TemperatureClamp::default().is_empty());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(21.456), 21.46);
        assert_eq!(round2(-3.014), -3.01);
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(PowerScanError::EmptyFile.http_status(), 400);
        assert_eq!(PowerScanError::NotRadiometric.http_status(), 400);
        assert_eq!(
            PowerScanError::ReportFailed { reason: "x".into() }.http_status(),
            500
        );

        let shape = PowerScanError::UnsupportedFileType { filename: "a.png".into() }.to_error_shape();
        assert_eq!(shape.detail, "Only JPG/JPEG supported");
        assert_eq!(shape.error_type, "UnsupportedFileType");
    }

    #[test]
    fn test_default_config_matches_container_contract() {
        let config = Config::default();
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.port, 10000);
        assert_eq!(config.thermal.estimate_min_temp, 20.0);
        assert_eq!(config.thermal.estimate_max_temp, 45.0);
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let json = r#"{"bind": "0.0.0.0", "port": 1, "max_request_body_size_mb": 1, "extra": true}"#;
        let result: Result<ServerConfig, _> = serde_json::from_str(json);
        assert!(result.unwrap_err().to_string().contains("unknown field"));
    }
}
