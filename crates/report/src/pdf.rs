use crate::ReportError;
use async_trait::async_trait;
use powerscan_models::ReportConfig;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Turns a rendered HTML report into PDF bytes.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> Result<Vec<u8>, ReportError>;
}

/// Pipes HTML through an external converter (`wkhtmltopdf - -` by default)
/// and reads the PDF from its stdout.
#[derive(Debug, Clone)]
pub struct CommandPdfRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandPdfRenderer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.pdf_command.clone(), config.pdf_args.clone())
    }
}

#[async_trait]
impl PdfRenderer for CommandPdfRenderer {
    #[instrument(skip(self, html), fields(program = %self.program, html_bytes = html.len()))]
    async fn render(&self, html: &str) -> Result<Vec<u8>, ReportError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ReportError::Pdf {
                reason: format!("failed to start {}: {}", self.program, e),
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| ReportError::Pdf {
            reason: "converter stdin unavailable".to_string(),
        })?;
        // write concurrently with reading stdout so large documents cannot deadlock
        let input = html.as_bytes().to_vec();
        let writer = tokio::spawn(async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        });

        let output = child.wait_with_output().await.map_err(|e| ReportError::Pdf {
            reason: e.to_string(),
        })?;
        let written = writer.await.map_err(|e| ReportError::Pdf {
            reason: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReportError::Pdf {
                reason: format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
            });
        }
        written.map_err(|e| ReportError::Pdf {
            reason: format!("failed to write HTML: {e}"),
        })?;
        if output.stdout.is_empty() {
            return Err(ReportError::Pdf {
                reason: format!("{} produced no output", self.program),
            });
        }

        debug!(pdf_bytes = output.stdout.len(), "Converted HTML to PDF");
        Ok(output.stdout)
    }
}
