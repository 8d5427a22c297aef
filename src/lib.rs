//! # pdf2md-service
//!
//! An HTTP service that turns uploaded PDF documents into Markdown and,
//! optionally, asks a language model to reorganise the tables inside.
//!
//! ## Pipeline Overview
//!
//! ```text
//! multipart upload
//!  │
//!  ├─ 1. Validate   file part present, non-empty name, `.pdf` extension
//!  ├─ 2. Normalize  decrypt with the password, rebuild pages (lopdf)
//!  ├─ 3. Convert    text layer → Markdown (pdf-extract, spawn_blocking)
//!  ├─ 4. Clean      line endings, invisible chars, blank-line runs
//!  ├─ 5. Reorganize tables via Claude (full route only, never fatal)
//!  └─ 6. Respond    JSON; every temp file already deleted
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2md_service::{router, AppState, ServiceConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::builder()
//!         .anthropic_api_key(std::env::var("ANTHROPIC_API_KEY").ok())
//!         .build()?;
//!     let addr = config.bind_addr()?;
//!     let app = router(Arc::new(AppState::from_config(config)));
//!     let listener = tokio::net::TcpListener::bind(addr).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! Using the pipeline without HTTP:
//!
//! ```rust,no_run
//! use pdf2md_service::{Pipeline, ProcessMode, ServiceConfig, UploadRequest};
//!
//! # async fn run() -> Result<(), pdf2md_service::Pdf2MdError> {
//! let config = ServiceConfig::default();
//! let pipeline = Pipeline::from_config(&config);
//! let bytes = std::fs::read("report.pdf").unwrap_or_default();
//! let result = pipeline
//!     .process(UploadRequest::new(bytes, "report.pdf", None), ProcessMode::RawOnly)
//!     .await?;
//! println!("{}", result.raw_markdown);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2md-server` binary (clap + anyhow + dotenvy + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use convert::{validate_filename, Pipeline};
pub use error::{Pdf2MdError, ReorganizeError, ValidationError};
pub use output::{ConversionResult, ProcessMode, ReorganizeOutcome, UploadRequest};
pub use pipeline::markdown::{MarkdownConverter, PdfTextConverter};
pub use pipeline::reorganize::{LlmReorganizer, Reorganizer, TableReorganizer};
pub use pipeline::transient::TransientStore;
pub use server::{router, ApiError, AppState};
