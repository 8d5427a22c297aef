//! HTTP surface: three routes over a shared [`Pipeline`](crate::Pipeline).
//!
//! | Route | Method | Body |
//! |-------|--------|------|
//! | `/health` | GET | `{"status":"healthy","service":"pdf-to-markdown"}` |
//! | `/process-pdf` | POST | multipart `file` + optional `password` |
//! | `/process-pdf/raw` | POST | same form, reorganizer skipped |

pub mod error;
pub mod handlers;
pub mod models;
pub mod state;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

/// Build the application router around `state`.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/health", get(handlers::health))
        .route("/process-pdf", post(handlers::process_pdf))
        .route("/process-pdf/raw", post(handlers::process_pdf_raw))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
