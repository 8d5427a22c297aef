//! Markdown conversion: normalised PDF path → plain Markdown text.
//!
//! The converter is an external capability behind [`MarkdownConverter`]; the
//! orchestrator only relies on `convert(path) -> text`. The default
//! [`PdfTextConverter`] extracts the text layer with `pdf-extract` and runs the
//! [`postprocess`](crate::pipeline::postprocess) cleanup rules over it.

use crate::error::Pdf2MdError;
use crate::pipeline::postprocess;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Converts a PDF on disk to Markdown text.
///
/// Implementations are called on the blocking thread pool and may do
/// CPU-heavy work. Every failure must be reported as
/// [`Pdf2MdError::ConversionFailed`].
pub trait MarkdownConverter: Send + Sync {
    fn convert(&self, path: &Path) -> Result<String, Pdf2MdError>;
}

/// Text-layer converter backed by `pdf-extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextConverter;

impl MarkdownConverter for PdfTextConverter {
    fn convert(&self, path: &Path) -> Result<String, Pdf2MdError> {
        let text = pdf_extract::extract_text(path).map_err(|e| Pdf2MdError::ConversionFailed {
            detail: e.to_string(),
        })?;
        debug!("Extracted {} chars from {}", text.len(), path.display());
        Ok(postprocess::clean_markdown(&text))
    }
}

/// Run `converter` against `path` on the blocking thread pool.
///
/// A panic inside the converter (some extractors panic on malformed fonts)
/// ends the blocking task, not the process, and is reported as
/// [`Pdf2MdError::ConversionFailed`].
pub async fn convert_path(
    converter: Arc<dyn MarkdownConverter>,
    path: &Path,
) -> Result<String, Pdf2MdError> {
    let path: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || converter.convert(&path))
        .await
        .map_err(|e| Pdf2MdError::ConversionFailed {
            detail: format!("converter task failed: {}", e),
        })?
}
