use crate::AppState;
use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
        Multipart, Query, State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, Json},
};
use powerscan_flir::{estimate_from_brightness, ThermalImage, ESTIMATE_WARNING};
use powerscan_metrics::TracingService;
use powerscan_models::{
    ErrorShape, PdfRequest, PowerScanError, TemperatureClamp, ThermalMode, ThermalResponse,
    ThermalSummary,
};
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{error, info, instrument};

type ApiError = (StatusCode, Json<ErrorShape>);

fn api_error(e: &PowerScanError) -> ApiError {
    (
        StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(e.to_error_shape()),
    )
}

fn invalid_request(rejection: impl std::fmt::Display) -> PowerScanError {
    PowerScanError::InvalidRequest {
        reason: rejection.to_string(),
    }
}

/// Estimation range; unset bounds come from `thermal.estimate_*_temp`.
#[derive(Debug, Default, Deserialize)]
pub struct EstimateQuery {
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
}

struct Upload {
    filename: String,
    data: Bytes,
}

fn is_jpeg_name(filename: &str) -> bool {
    let lower = filename.to_ascii_lowercase();
    lower.ends_with(".jpg") || lower.ends_with(".jpeg")
}

/// Reads the `file` field of a multipart form.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Upload, PowerScanError> {
    let mut multipart = multipart.map_err(invalid_request)?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PowerScanError::InvalidRequest { reason: e.to_string() })?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| PowerScanError::InvalidRequest { reason: e.to_string() })?;
        if data.is_empty() {
            return Err(PowerScanError::EmptyFile);
        }
        return Ok(Upload { filename, data });
    }
    Err(PowerScanError::InvalidRequest {
        reason: "missing multipart field 'file'".to_string(),
    })
}

async fn read_jpeg_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Upload, PowerScanError> {
    let upload = read_upload(multipart).await?;
    if !is_jpeg_name(&upload.filename) {
        return Err(PowerScanError::UnsupportedFileType {
            filename: upload.filename,
        });
    }
    Ok(upload)
}

/// Runs radiometric extraction off the async workers.
async fn extract_blocking(state: &AppState, data: Bytes) -> Result<ThermalImage, PowerScanError> {
    let extractor = state.extractor;
    tokio::task::spawn_blocking(move || extractor.extract(&data))
        .await
        .map_err(|e| PowerScanError::InternalError { reason: e.to_string() })?
        .map_err(PowerScanError::from)
}

fn extraction_failed(state: &AppState, operation: &str, e: PowerScanError) -> ApiError {
    TracingService::log_error(operation, &e);
    state.metrics.record_extraction_error(e.error_type());
    api_error(&e)
}

#[instrument(skip(_state))]
pub async fn root(State(_state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "running" }))
}

#[instrument(skip(_state))]
pub async fn health_check(State(_state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

#[instrument(skip(state, multipart))]
pub async fn extract_thermal(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ThermalSummary>, ApiError> {
    let started = Instant::now();
    let upload = read_jpeg_upload(multipart)
        .await
        .map_err(|e| extraction_failed(&state, "extract_thermal", e))?;
    info!("Extracting thermal summary from {}", upload.filename);

    let image = extract_blocking(&state, upload.data)
        .await
        .map_err(|e| extraction_failed(&state, "extract_thermal", e))?;

    let elapsed = started.elapsed();
    state
        .metrics
        .record_extraction(ThermalMode::FlirSdk, elapsed.as_secs_f64() * 1000.0);
    TracingService::log_extraction_completed(
        &upload.filename,
        ThermalMode::FlirSdk,
        image.width,
        image.height,
        elapsed.as_millis() as u64,
    );
    Ok(Json(image.summary()))
}

#[instrument(skip(state, multipart))]
pub async fn upload_thermal(
    State(state): State<AppState>,
    clamp: Result<Query<TemperatureClamp>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ThermalResponse>, ApiError> {
    let started = Instant::now();
    let Query(clamp) = clamp
        .map_err(|e| extraction_failed(&state, "upload", invalid_request(e)))?;
    let upload = read_jpeg_upload(multipart)
        .await
        .map_err(|e| extraction_failed(&state, "upload", e))?;
    info!("Extracting thermal data from {}", upload.filename);

    let mut image = extract_blocking(&state, upload.data)
        .await
        .map_err(|e| extraction_failed(&state, "upload", e))?;
    image.clamp(clamp);

    let elapsed = started.elapsed();
    state
        .metrics
        .record_extraction(ThermalMode::FlirSdk, elapsed.as_secs_f64() * 1000.0);
    TracingService::log_extraction_completed(
        &upload.filename,
        ThermalMode::FlirSdk,
        image.width,
        image.height,
        elapsed.as_millis() as u64,
    );
    Ok(Json(image.into_response(ThermalMode::FlirSdk, None)))
}

#[instrument(skip(state, multipart))]
pub async fn estimate_thermal(
    State(state): State<AppState>,
    range: Result<Query<EstimateQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ThermalResponse>, ApiError> {
    let started = Instant::now();
    let Query(range) = range
        .map_err(|e| extraction_failed(&state, "estimate", invalid_request(e)))?;
    let upload = read_upload(multipart)
        .await
        .map_err(|e| extraction_failed(&state, "estimate", e))?;

    let min_temp = range.min_temp.unwrap_or(state.config.thermal.estimate_min_temp);
    let max_temp = range.max_temp.unwrap_or(state.config.thermal.estimate_max_temp);
    let data = upload.data;
    let image = tokio::task::spawn_blocking(move || estimate_from_brightness(&data, min_temp, max_temp))
        .await
        .map_err(|e| PowerScanError::InternalError { reason: e.to_string() })
        .and_then(|r| r.map_err(PowerScanError::from))
        .map_err(|e| extraction_failed(&state, "estimate", e))?;

    let elapsed = started.elapsed();
    state
        .metrics
        .record_extraction(ThermalMode::Estimated, elapsed.as_secs_f64() * 1000.0);
    TracingService::log_extraction_completed(
        &upload.filename,
        ThermalMode::Estimated,
        image.width,
        image.height,
        elapsed.as_millis() as u64,
    );
    Ok(Json(image.into_response(
        ThermalMode::Estimated,
        Some(ESTIMATE_WARNING.to_string()),
    )))
}

#[instrument(skip(state))]
pub async fn demo(State(state): State<AppState>) -> Json<ThermalSummary> {
    let (width, height) = (state.config.thermal.demo_width, state.config.thermal.demo_height);
    let mut rng = rand::thread_rng();
    let (mut min_temp, mut max_temp) = (f64::INFINITY, f64::NEG_INFINITY);
    for _ in 0..u64::from(width) * u64::from(height) {
        let t: f64 = rng.gen_range(20.0..45.0);
        min_temp = min_temp.min(t);
        max_temp = max_temp.max(t);
    }
    Json(ThermalSummary {
        width,
        height,
        min_temp,
        max_temp,
    })
}

fn report_failed(state: &AppState, operation: &str, e: PowerScanError) -> ApiError {
    TracingService::log_error(operation, &e);
    state.metrics.record_report_error();
    api_error(&e)
}

/// Quotes and backslashes are dropped so the quoted filename stays well formed.
fn content_disposition(id_unico: &str) -> HeaderValue {
    let name: String = id_unico.chars().filter(|c| !matches!(c, '"' | '\\')).collect();
    HeaderValue::from_str(&format!("attachment; filename=\"report_{name}.pdf\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"report.pdf\""))
}

#[instrument(skip(state, request))]
pub async fn report_pdf(
    State(state): State<AppState>,
    request: Result<Json<PdfRequest>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Bytes), ApiError> {
    let started = Instant::now();
    let Json(request) =
        request.map_err(|e| report_failed(&state, "report_pdf", invalid_request(e)))?;
    let id = request.measure_data.id_unico.clone();
    info!("Generating PDF report for measure {}", id);

    let pdf = state
        .reports
        .generate_pdf(&request)
        .await
        .map_err(|e| report_failed(&state, "report_pdf", e.into()))?;

    let elapsed = started.elapsed();
    state.metrics.record_report("pdf", elapsed.as_secs_f64() * 1000.0);
    TracingService::log_report_completed(&id, "pdf", pdf.len(), elapsed.as_millis() as u64);

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    headers.insert(header::CONTENT_DISPOSITION, content_disposition(&id));
    Ok((StatusCode::OK, headers, Bytes::from(pdf)))
}

#[instrument(skip(state, request))]
pub async fn report_html(
    State(state): State<AppState>,
    request: Result<Json<PdfRequest>, JsonRejection>,
) -> Result<Html<String>, ApiError> {
    let started = Instant::now();
    let Json(request) =
        request.map_err(|e| report_failed(&state, "report_html", invalid_request(e)))?;
    let html = state
        .reports
        .render_html(&request)
        .await
        .map_err(|e| report_failed(&state, "report_html", e.into()))?;

    let elapsed = started.elapsed();
    state.metrics.record_report("html", elapsed.as_secs_f64() * 1000.0);
    TracingService::log_report_completed(
        &request.measure_data.id_unico,
        "html",
        html.len(),
        elapsed.as_millis() as u64,
    );
    Ok(Html(html))
}

#[instrument(skip(state))]
pub async fn metrics(State(state): State<AppState>) -> Result<String, StatusCode> {
    match state.metrics.get_prometheus_metrics() {
        Ok(metrics) => Ok(metrics),
        Err(e) => {
            error!("Failed to get metrics: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
