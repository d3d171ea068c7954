use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};
use powerscan_models::{Config, ElementData, MapConfig, MeasureData, PdfRequest};
use powerscan_report::{PdfRenderer, ReportError, ReportService};
use std::io::Cursor;
use std::sync::Arc;
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct EchoRenderer;

#[async_trait]
impl PdfRenderer for EchoRenderer {
    async fn render(&self, html: &str) -> Result<Vec<u8>, ReportError> {
        Ok(html.as_bytes().to_vec())
    }
}

fn tile_png() -> Vec<u8> {
    let tile = RgbaImage::from_pixel(256, 256, Rgba([10, 120, 10, 255]));
    let mut out = Cursor::new(Vec::new());
    tile.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn service(server: &MockServer, map_enabled: bool) -> ReportService {
    let config = Config::default();
    let map = MapConfig {
        enabled: map_enabled,
        tile_url_template: format!("{}/tiles/{{z}}/{{x}}/{{y}}.png", server.uri()),
        tile_timeout_secs: 5,
        ..config.map
    };
    let mut report = config.report;
    report.download_timeout_secs = 5;
    ReportService::new(report, map, Arc::new(EchoRenderer)).unwrap()
}

fn request(server: &MockServer) -> PdfRequest {
    PdfRequest {
        measure_data: MeasureData {
            id_unico: "SP-0042".into(),
            latitude: Some(-23.5505),
            longitude: Some(-46.6333),
            temp1_c: Some(71.5),
            alimentador: Some("ALM-12".into()),
            ..Default::default()
        },
        thermal_image_url: Some(format!("{}/thermal.jpg", server.uri())),
        optical_image_url: Some(format!("{}/missing.jpg", server.uri())),
        client_company_logo_url: Some(format!("{}/logo.png", server.uri())),
        language: Some("en".into()),
        elements: Some(vec![ElementData {
            numero_operativo: Some("OP-7".into()),
            elemento: Some("Connector".into()),
            temperatura: Some("71.5".into()),
            metodo: Some("Delta T".into()),
            calculada: Some("50.2".into()),
            acao: Some("Replace".into()),
        }]),
    }
}

#[tokio::test]
async fn report_inlines_remote_images_and_skips_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/thermal.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"thermal-bytes".to_vec(), "image/jpeg"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"logo-bytes".to_vec(), "image/png"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let html = service(&server, false).render_html(&request(&server)).await.unwrap();

    assert!(html.contains("data:image/jpeg;base64,dGhlcm1hbC1ieXRlcw=="));
    assert!(html.contains(r#"<img src="data:image/png;base64,bG9nby1ieXRlcw==" class="logo-img-left" />"#));
    assert!(html.contains("placeholder optical"));
    assert!(html.contains("Map unavailable"));
    assert!(html.contains("<td>OP-7</td>"));
    assert!(html.contains(r#"<td class="action-green">Replace</td>"#));
    assert!(html.contains("SP-0042"));
    assert!(html.contains("-23.5505, -46.6333"));
}

#[tokio::test]
async fn report_draws_map_from_tiles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/tiles/17/\d+/\d+\.png$"))
        .and(header("user-agent", "PowerScan/1.0 (PDF Report Generator)"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(tile_png(), "image/png"),
        )
        .expect(9)
        .mount(&server)
        .await;

    let mut req = request(&server);
    req.thermal_image_url = None;
    req.optical_image_url = None;
    req.client_company_logo_url = None;

    let html = service(&server, true).render_html(&req).await.unwrap();
    assert!(!html.contains("Map unavailable"));
    assert!(html.contains(r#"<td class="map-cell"><img src="data:image/png;base64,"#));
}

#[tokio::test]
async fn generate_pdf_returns_renderer_output() {
    let server = MockServer::start().await;
    let mut req = request(&server);
    req.thermal_image_url = None;
    req.optical_image_url = None;
    req.client_company_logo_url = None;
    req.elements = Some(vec![]);
    req.language = Some("es".into());

    let pdf = service(&server, false).generate_pdf(&req).await.unwrap();
    let html = String::from_utf8(pdf).unwrap();
    assert!(html.contains("Informe de Inspección Termográfica"));
    assert!(html.contains("Sin datos de elementos"));
}
