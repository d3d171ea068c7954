pub mod fixtures;
pub mod http_client;
pub mod server;

pub use fixtures::{gradient, plain_jpeg, RadiometricJpegBuilder};
pub use http_client::{PowerScanClient, ReportDownload};
pub use server::{spawn_server, test_config, test_state, RecordingPdfRenderer, TestServer, FAKE_PDF};
