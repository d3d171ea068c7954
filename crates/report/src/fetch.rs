use crate::ReportError;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes))
}

/// Downloads remote images and inlines them into the report.
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ReportError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(10))
            .build()
            .map_err(|e| ReportError::Http { reason: e.to_string() })?;
        Ok(Self { client })
    }

    /// Missing images are not fatal for a report, so failures are logged
    /// and turned into `None`.
    #[instrument(skip(self))]
    pub async fn fetch_data_uri(&self, url: &str) -> Option<String> {
        match self.fetch(url).await {
            Ok(uri) => Some(uri),
            Err(e) => {
                warn!("Error downloading image {}: {}", url, e);
                None
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<String, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_IMAGE_TYPE)
            .to_string();
        let bytes = response.bytes().await?;
        debug!(bytes = bytes.len(), content_type = %content_type, "Downloaded image");
        Ok(data_uri(&content_type, &bytes))
    }
}
