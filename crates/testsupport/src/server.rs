use anyhow::Result;
use async_trait::async_trait;
use powerscan_api::AppState;
use powerscan_metrics::MetricsService;
use powerscan_models::Config;
use powerscan_report::{PdfRenderer, ReportError, ReportService};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Bytes returned by [`RecordingPdfRenderer`].
pub const FAKE_PDF: &[u8] = b"%PDF-1.4\n% powerscan test document\n%%EOF\n";

/// Keeps every HTML document it is asked to convert and answers with [`FAKE_PDF`].
#[derive(Debug, Default)]
pub struct RecordingPdfRenderer {
    rendered: Mutex<Vec<String>>,
}

impl RecordingPdfRenderer {
    pub fn rendered(&self) -> Vec<String> {
        self.rendered
            .lock()
            .map(|docs| docs.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PdfRenderer for RecordingPdfRenderer {
    async fn render(&self, html: &str) -> Result<Vec<u8>, ReportError> {
        if let Ok(mut docs) = self.rendered.lock() {
            docs.push(html.to_string());
        }
        Ok(FAKE_PDF.to_vec())
    }
}

/// Defaults with outbound map tiles disabled.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.server.bind = "127.0.0.1".to_string();
    config.server.port = 0;
    config.map.enabled = false;
    config.report.download_timeout_secs = 5;
    config
}

pub fn test_state(config: Config, pdf: Arc<dyn PdfRenderer>) -> Result<AppState> {
    let reports = ReportService::new(config.report.clone(), config.map.clone(), pdf)?;
    let metrics = MetricsService::new()?;
    Ok(AppState::new(config, Arc::new(reports), Arc::new(metrics)))
}

/// An in-process server on an ephemeral port, stopped on drop.
pub struct TestServer {
    pub base_url: String,
    pub pdf: Arc<RecordingPdfRenderer>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub async fn stop(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        (&mut self.handle).await??;
        Ok(())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn spawn_server(config: Config) -> Result<TestServer> {
    let pdf = Arc::new(RecordingPdfRenderer::default());
    let state = test_state(config.clone(), pdf.clone())?;

    let listener = TcpListener::bind(format!("{}:{}", config.server.bind, config.server.port)).await?;
    let base_url = format!("http://{}", listener.local_addr()?);

    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(powerscan_api::serve(listener, state, async move {
        let _ = rx.await;
    }));

    Ok(TestServer {
        base_url,
        pdf,
        shutdown: Some(tx),
        handle,
    })
}
