use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use std::sync::Arc;
use tracing::debug;

use crate::convert::validate_filename;
use crate::error::ValidationError;
use crate::output::{ConversionResult, ProcessMode, UploadRequest};
use crate::server::error::ApiError;
use crate::server::models::{HealthResponse, ProcessResponse, RawResponse};
use crate::server::state::AppState;
use crate::server::upload;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// `POST /process-pdf`: raw Markdown plus the reorganised tables.
pub async fn process_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let result = run(&state, multipart, ProcessMode::Full).await?;
    Ok(Json(result.into()))
}

/// `POST /process-pdf/raw`: raw Markdown only; the reorganizer is never called.
pub async fn process_pdf_raw(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<RawResponse>, ApiError> {
    let result = run(&state, multipart, ProcessMode::RawOnly).await?;
    Ok(Json(result.into()))
}

async fn run(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
    mode: ProcessMode,
) -> Result<ConversionResult, ApiError> {
    // A body that is not multipart at all carries no file part.
    let multipart = multipart.map_err(|rejection| {
        debug!("Not a multipart body: {}", rejection.body_text());
        ValidationError::NoFileProvided
    })?;

    let fields = upload::parse_multipart(multipart).await?;
    validate_filename(fields.file.as_ref().map(|f| f.filename.as_str()))?;
    let Some(file) = fields.file else {
        return Err(ValidationError::NoFileProvided.into());
    };

    let upload = UploadRequest::new(file.data, file.filename, fields.password);
    Ok(state.pipeline.process(upload, mode).await?)
}
