use serde::Serialize;

use crate::output::ConversionResult;

// ── Response JSON (field names are the public HTTP contract) ─────────────

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy",
            service: "pdf-to-markdown",
        }
    }
}

/// Body of a successful `POST /process-pdf`.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub raw_markdown: String,
    pub organized_markdown: String,
    pub filename: String,
}

impl From<ConversionResult> for ProcessResponse {
    fn from(r: ConversionResult) -> Self {
        Self {
            success: true,
            raw_markdown: r.raw_markdown,
            organized_markdown: r.organized_markdown.unwrap_or_default(),
            filename: r.filename,
        }
    }
}

/// Body of a successful `POST /process-pdf/raw`.
#[derive(Debug, Clone, Serialize)]
pub struct RawResponse {
    pub success: bool,
    pub raw_markdown: String,
    pub filename: String,
}

impl From<ConversionResult> for RawResponse {
    fn from(r: ConversionResult) -> Self {
        Self {
            success: true,
            raw_markdown: r.raw_markdown,
            filename: r.filename,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
