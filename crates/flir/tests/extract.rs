use powerscan_flir::{
    estimate_from_brightness, ByteOrder, CameraInfo, FlirError, FlirExtractor, ESTIMATE_WARNING,
};
use powerscan_models::{PowerScanError, TemperatureClamp, ThermalMode};
use powerscan_testsupport::{gradient, plain_jpeg, RadiometricJpegBuilder};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.05,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn extracts_png_frame() {
    let jpeg = RadiometricJpegBuilder::new(32, 24).build().unwrap();
    let image = FlirExtractor::new().extract(&jpeg).unwrap();

    assert_eq!((image.width, image.height), (32, 24));
    assert_eq!(image.celsius.len(), 32 * 24);
    assert_close(image.min(), 20.0);
    assert_close(image.max(), 40.0);
    // row-major: second row starts cold again
    assert_close(image.celsius[32], 20.0);

    let camera = image.camera.as_ref().unwrap();
    assert_eq!(camera.camera_model, "FLIR E8");
    assert_close(camera.relative_humidity, 50.0);
}

#[test]
fn extracts_packed_big_endian_frame() {
    let jpeg = RadiometricJpegBuilder::new(10, 4)
        .temperatures(gradient(10, 4, -10.0, 120.0))
        .byte_order(ByteOrder::Big)
        .packed()
        .build()
        .unwrap();
    let image = FlirExtractor::new().extract(&jpeg).unwrap();
    assert_close(image.min(), -10.0);
    assert_close(image.max(), 120.0);
}

#[test]
fn reassembles_many_segments() {
    let jpeg = RadiometricJpegBuilder::new(40, 30)
        .segment_size(512)
        .build()
        .unwrap();
    let image = FlirExtractor::new().extract(&jpeg).unwrap();
    assert_eq!(image.celsius.len(), 1200);
    assert_close(image.max(), 40.0);
}

#[test]
fn honours_capture_parameters() {
    let camera = CameraInfo {
        emissivity: 0.95,
        object_distance: 5.0,
        reflected_temp_c: 25.0,
        atmospheric_temp_c: 30.0,
        relative_humidity: 70.0,
        ..CameraInfo::default()
    };
    let jpeg = RadiometricJpegBuilder::new(8, 8)
        .temperatures(vec![65.0; 64])
        .camera(camera)
        .build()
        .unwrap();
    let image = FlirExtractor::new().extract(&jpeg).unwrap();
    assert_close(image.min(), 65.0);
    assert_close(image.max(), 65.0);
}

#[test]
fn clamps_after_conversion() {
    let jpeg = RadiometricJpegBuilder::new(16, 2).build().unwrap();
    let mut image = FlirExtractor::new().extract(&jpeg).unwrap();
    image.clamp(TemperatureClamp {
        min_temp: Some(25.0),
        max_temp: Some(30.0),
    });

    let response = image.into_response(ThermalMode::FlirSdk, None);
    assert_eq!(response.min_temp, 25.0);
    assert_eq!(response.max_temp, 30.0);
    assert!(response.temperatures.iter().all(|t| (25.0..=30.0).contains(t)));
}

#[test]
fn plain_jpeg_is_not_radiometric() {
    let err = FlirExtractor::new().extract(&plain_jpeg(16, 16).unwrap()).unwrap_err();
    assert!(matches!(err, FlirError::NotRadiometric));

    let api: PowerScanError = err.into();
    assert_eq!(api.http_status(), 400);
    assert_eq!(
        api.to_string(),
        "No thermal data found (NOT a radiometric FLIR image)"
    );
}

#[test]
fn short_frame_is_rejected() {
    let jpeg = RadiometricJpegBuilder::new(10, 10)
        .temperatures(vec![30.0; 50])
        .packed()
        .build()
        .unwrap();
    assert!(FlirExtractor::new().extract(&jpeg).is_err());
}

#[test]
fn estimates_from_brightness() {
    let jpeg = RadiometricJpegBuilder::new(64, 8).build().unwrap();
    let image = estimate_from_brightness(&jpeg, 20.0, 45.0).unwrap();
    // the visible layer is what gets estimated
    assert_eq!((image.width, image.height), (64, 8));
    assert_close(image.min(), 20.0);
    assert!((image.max() - 45.0).abs() < 0.01);
    assert!(image.camera.is_none());

    let response = image.into_response(ThermalMode::Estimated, Some(ESTIMATE_WARNING.into()));
    assert_eq!(response.warning.as_deref(), Some("Temperatures are relative, not absolute"));
}

#[test]
fn empty_frame_is_extraction_failure() {
    let jpeg = RadiometricJpegBuilder::new(0, 0)
        .temperatures(vec![])
        .packed()
        .build()
        .unwrap();
    let err = FlirExtractor::new().extract(&jpeg).unwrap_err();
    assert!(matches!(err, FlirError::RawImage { .. }));
    assert_eq!(PowerScanError::from(err).error_type(), "ExtractionFailed");
}
