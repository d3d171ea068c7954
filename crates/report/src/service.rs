use crate::assets::logo_data_uri;
use crate::fetch::ImageFetcher;
use crate::html::{render_report_html, ReportContext};
use crate::i18n::Language;
use crate::map::{StaticMapRenderer, PIN_COLD, PIN_HOT};
use crate::pdf::PdfRenderer;
use crate::qr::{qr_code_data_uri, qr_target};
use crate::ReportError;
use powerscan_models::{non_zero, MapConfig, PdfRequest, ReportConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Builds inspection reports: gathers images, renders HTML and converts it to PDF.
#[derive(Clone)]
pub struct ReportService {
    config: ReportConfig,
    fetcher: ImageFetcher,
    maps: StaticMapRenderer,
    pdf: Arc<dyn PdfRenderer>,
}

impl ReportService {
    pub fn new(
        config: ReportConfig,
        map: MapConfig,
        pdf: Arc<dyn PdfRenderer>,
    ) -> Result<Self, ReportError> {
        let fetcher = ImageFetcher::new(Duration::from_secs(config.download_timeout_secs))?;
        let maps = StaticMapRenderer::new(map)?;
        Ok(Self {
            config,
            fetcher,
            maps,
            pdf,
        })
    }

    fn language(&self, request: &PdfRequest) -> Language {
        let code = request
            .language
            .as_deref()
            .unwrap_or(&self.config.default_language);
        Language::from_code(Some(code))
    }

    async fn optional_image(&self, url: Option<&str>) -> Option<String> {
        match url.filter(|u| !u.trim().is_empty()) {
            Some(u) => self.fetcher.fetch_data_uri(u).await,
            None => None,
        }
    }

    /// Renders the report HTML with every image inlined.
    #[instrument(skip(self, request), fields(measure = %request.measure_data.id_unico))]
    pub async fn render_html(&self, request: &PdfRequest) -> Result<String, ReportError> {
        let measure = &request.measure_data;
        let language = self.language(request);

        let pin = if non_zero(measure.temp1_c).is_some() {
            PIN_HOT
        } else {
            PIN_COLD
        };
        let map = async {
            match measure.coordinates() {
                Some((lat, lon)) => self.maps.render_data_uri(lat, lon, pin).await,
                None => None,
            }
        };

        let (thermal_image, optical_image, client_logo, map_image) = tokio::join!(
            self.optional_image(request.thermal_image_url.as_deref()),
            self.optional_image(request.optical_image_url.as_deref()),
            self.optional_image(request.client_company_logo_url.as_deref()),
            map,
        );

        let qr_code = match qr_code_data_uri(&qr_target(measure, &self.config.app_measure_url)) {
            Ok(uri) => Some(uri),
            Err(e) => {
                warn!("Error generating QR code: {}", e);
                None
            }
        };

        let elements = request.elements.as_deref().unwrap_or_default();
        let ctx = ReportContext {
            elements,
            language,
            thermal_image,
            optical_image,
            map_image,
            qr_code,
            client_logo,
            powerscan_logo: logo_data_uri(),
            ..ReportContext::new(measure)
        };
        Ok(render_report_html(&ctx))
    }

    #[instrument(skip(self, request), fields(measure = %request.measure_data.id_unico))]
    pub async fn generate_pdf(&self, request: &PdfRequest) -> Result<Vec<u8>, ReportError> {
        let html = self.render_html(request).await?;
        let pdf = self.pdf.render(&html).await?;
        info!(pdf_bytes = pdf.len(), "Generated inspection report");
        Ok(pdf)
    }
}
