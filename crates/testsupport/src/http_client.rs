use anyhow::Result;
use powerscan_models::{PdfRequest, TemperatureClamp, ThermalResponse, ThermalSummary};
use reqwest::{multipart, Client, Response};
use serde_json::Value;

pub struct PowerScanClient {
    client: Client,
    base_url: String,
}

/// Body and headers of a downloaded report.
pub struct ReportDownload {
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub bytes: Vec<u8>,
}

fn file_form(filename: &str, bytes: Vec<u8>) -> multipart::Form {
    let part = multipart::Part::bytes(bytes).file_name(filename.to_string());
    multipart::Form::new().part("file", part)
}

async fn ensure_success(response: Response, what: &str) -> Result<Response> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await?;
        anyhow::bail!("{} failed ({}): {}", what, status, error_text);
    }
    Ok(response)
}

impl PowerScanClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_json(&self, path: &str) -> Result<Value> {
        let response = self.client.get(self.url(path)).send().await?;
        Ok(ensure_success(response, path).await?.json().await?)
    }

    /// Posts a file and returns the raw response, for error assertions.
    pub async fn post_file(&self, path: &str, filename: &str, bytes: Vec<u8>) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .multipart(file_form(filename, bytes))
            .send()
            .await?)
    }

    pub async fn thermal_summary(&self, filename: &str, bytes: Vec<u8>) -> Result<ThermalSummary> {
        let response = self.post_file("/api/thermal", filename, bytes).await?;
        Ok(ensure_success(response, "thermal summary").await?.json().await?)
    }

    pub async fn upload(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        clamp: TemperatureClamp,
    ) -> Result<ThermalResponse> {
        let response = self
            .client
            .post(self.url("/upload"))
            .query(&clamp)
            .multipart(file_form(filename, bytes))
            .send()
            .await?;
        Ok(ensure_success(response, "upload").await?.json().await?)
    }

    pub async fn estimate(&self, filename: &str, bytes: Vec<u8>) -> Result<ThermalResponse> {
        let response = self.post_file("/api/thermal/estimate", filename, bytes).await?;
        Ok(ensure_success(response, "estimate").await?.json().await?)
    }

    pub async fn demo(&self) -> Result<ThermalSummary> {
        let response = self.client.get(self.url("/api/demo")).send().await?;
        Ok(ensure_success(response, "demo").await?.json().await?)
    }

    pub async fn report_pdf(&self, request: &PdfRequest) -> Result<ReportDownload> {
        let response = self
            .client
            .post(self.url("/api/report/pdf"))
            .json(request)
            .send()
            .await?;
        let response = ensure_success(response, "report").await?;
        let header = |name: reqwest::header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(reqwest::header::CONTENT_TYPE);
        let content_disposition = header(reqwest::header::CONTENT_DISPOSITION);
        Ok(ReportDownload {
            content_type,
            content_disposition,
            bytes: response.bytes().await?.to_vec(),
        })
    }

    pub async fn report_html(&self, request: &PdfRequest) -> Result<String> {
        let response = self
            .client
            .post(self.url("/api/report/html"))
            .json(request)
            .send()
            .await?;
        Ok(ensure_success(response, "report preview").await?.text().await?)
    }

    pub async fn metrics(&self) -> Result<String> {
        let response = self.client.get(self.url("/metrics")).send().await?;
        Ok(ensure_success(response, "metrics").await?.text().await?)
    }
}
