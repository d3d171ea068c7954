//! Two-page PowerScan inspection reports rendered to HTML and PDF.

pub mod assets;
pub mod draw;
pub mod fetch;
pub mod format;
pub mod html;
pub mod i18n;
pub mod map;
pub mod pdf;
pub mod qr;
pub mod service;

pub use html::{render_report_html, ReportContext};
pub use i18n::Language;
pub use map::{StaticMapRenderer, PIN_COLD, PIN_HOT};
pub use pdf::{CommandPdfRenderer, PdfRenderer};
pub use service::ReportService;

use powerscan_models::PowerScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("PDF conversion failed: {reason}")]
    Pdf { reason: String },

    #[error("HTTP error: {reason}")]
    Http { reason: String },

    #[error("image error: {reason}")]
    Image { reason: String },

    #[error("QR code error: {reason}")]
    QrCode { reason: String },
}

impl From<ReportError> for PowerScanError {
    fn from(err: ReportError) -> Self {
        PowerScanError::ReportFailed {
            reason: err.to_string(),
        }
    }
}
