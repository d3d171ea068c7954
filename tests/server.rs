use powerscan::build_state;
use powerscan_models::{MeasureData, PdfRequest, TemperatureClamp, ThermalMode};
use powerscan_testsupport::*;

fn report_request(id: &str) -> PdfRequest {
    PdfRequest {
        measure_data: MeasureData {
            id_unico: id.to_string(),
            temp1_c: Some(58.3),
            nome_inspecao: Some("Rota Norte".into()),
            ..Default::default()
        },
        thermal_image_url: None,
        optical_image_url: None,
        client_company_logo_url: None,
        language: Some("en".into()),
        elements: None,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn smoke_test() -> anyhow::Result<()> {
    let server = spawn_server(test_config()).await?;
    let client = PowerScanClient::new(&server.base_url);

    assert_eq!(client.get_json("/").await?["status"], "running");
    assert_eq!(client.get_json("/health").await?["status"], "healthy");

    let metrics = client.metrics().await?;
    assert!(metrics.contains("report_errors_total 0"));

    server.stop().await
}

#[tokio::test(flavor = "multi_thread")]
async fn thermal_round_trip_over_http() -> anyhow::Result<()> {
    let server = spawn_server(test_config()).await?;
    let client = PowerScanClient::new(&server.base_url);

    let jpeg = RadiometricJpegBuilder::new(32, 24).build()?;

    let summary = client.thermal_summary("IR_0001.jpg", jpeg.clone()).await?;
    assert_eq!((summary.width, summary.height), (32, 24));
    assert!((summary.min_temp - 20.0).abs() < 0.1, "min {}", summary.min_temp);
    assert!((summary.max_temp - 40.0).abs() < 0.1, "max {}", summary.max_temp);

    let clamp = TemperatureClamp {
        min_temp: Some(25.0),
        max_temp: Some(35.0),
    };
    let full = client.upload("IR_0001.JPG", jpeg, clamp).await?;
    assert_eq!(full.mode, ThermalMode::FlirSdk);
    assert_eq!(full.temperatures.len(), 32 * 24);
    assert!(full.temperatures.iter().all(|t| (25.0..=35.0).contains(t)));
    assert_eq!(full.min_temp, 25.0);
    assert_eq!(full.max_temp, 35.0);

    let response = client.post_file("/upload", "photo.png", plain_jpeg(8, 8)?).await?;
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["detail"], "Only JPG/JPEG supported");

    let metrics = client.metrics().await?;
    assert!(metrics.contains(r#"thermal_extractions_total{mode="flir_sdk"} 2"#));

    server.stop().await
}

#[tokio::test(flavor = "multi_thread")]
async fn estimate_and_demo_over_http() -> anyhow::Result<()> {
    let server = spawn_server(test_config()).await?;
    let client = PowerScanClient::new(&server.base_url);

    let estimated = client.estimate("visible.jpg", plain_jpeg(16, 4)?).await?;
    assert_eq!(estimated.mode, ThermalMode::Estimated);
    assert!(estimated.warning.is_some());
    assert!(estimated.min_temp >= 20.0 && estimated.max_temp <= 45.0);

    let demo = client.demo().await?;
    assert_eq!((demo.width, demo.height), (320, 240));
    assert!(demo.min_temp >= 20.0 && demo.max_temp < 45.0);

    server.stop().await
}

#[tokio::test(flavor = "multi_thread")]
async fn report_download_uses_configured_renderer() -> anyhow::Result<()> {
    let server = spawn_server(test_config()).await?;
    let client = PowerScanClient::new(&server.base_url);

    let download = client.report_pdf(&report_request("INS-2024-77")).await?;
    assert_eq!(download.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(
        download.content_disposition.as_deref(),
        Some("attachment; filename=\"report_INS-2024-77.pdf\"")
    );
    assert_eq!(download.bytes, FAKE_PDF);

    let rendered = server.pdf.rendered();
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].contains("INS-2024-77"));
    assert!(rendered[0].contains("Rota Norte"));

    let preview = client.report_html(&report_request("INS-2024-78")).await?;
    assert!(preview.contains("Thermographic Inspection Report"));
    assert_eq!(server.pdf.rendered().len(), 1);

    server.stop().await
}

#[test]
fn production_state_builds_from_defaults() {
    let state = build_state(test_config()).unwrap();
    assert_eq!(state.config.report.pdf_command, "wkhtmltopdf");
}
