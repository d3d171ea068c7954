use crate::{handlers::*, AppState};
use axum::{
    routing::{get, post},
    Router,
};

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        // Thermal extraction
        .route("/api/thermal", post(extract_thermal))
        .route("/upload", post(upload_thermal))
        .route("/api/thermal/estimate", post(estimate_thermal))
        .route("/api/demo", get(demo))
        // Reports
        .route("/api/report/pdf", post(report_pdf))
        .route("/api/report/html", post(report_html))
        .route("/metrics", get(metrics))
}

pub fn build_router(state: AppState) -> Router {
    create_router().with_state(state)
}
