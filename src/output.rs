//! Request and result types that flow through the pipeline.

use serde::Serialize;

/// Prefix placed before a reorganizer failure in `organized_markdown`.
pub const REORGANIZE_FAILED_PREFIX: &str = "Claude API processing failed: ";

/// Sentinel returned in `organized_markdown` when no credential is configured.
pub const API_KEY_MISSING: &str = "Anthropic API key not configured";

/// One uploaded PDF, as received from the client.
#[derive(Clone)]
pub struct UploadRequest {
    /// Raw file bytes.
    pub bytes: Vec<u8>,
    /// Original filename supplied by the client.
    pub filename: String,
    /// Optional user password. Empty strings are normalised to `None`.
    pub password: Option<String>,
}

impl UploadRequest {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>, password: Option<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
            password: password.filter(|p| !p.is_empty()),
        }
    }
}

impl std::fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadRequest")
            .field("bytes", &self.bytes.len())
            .field("filename", &self.filename)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Which stages the orchestrator runs after conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessMode {
    /// Normalise, convert, then attempt table reorganisation.
    Full,
    /// Normalise and convert only; the reorganizer is never touched.
    RawOnly,
}

/// How the optional reorganisation stage resolved.
///
/// None of these variants fails the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorganizeOutcome {
    /// The model returned reorganised Markdown.
    Success(String),
    /// The stage was skipped (no credential, provider not built).
    Unavailable(String),
    /// The remote call failed; carries the cause.
    Failed(String),
}

impl ReorganizeOutcome {
    /// Text embedded in the `organized_markdown` response field.
    pub fn into_text(self) -> String {
        match self {
            ReorganizeOutcome::Success(text) => text,
            ReorganizeOutcome::Unavailable(reason) => reason,
            ReorganizeOutcome::Failed(cause) => format!("{REORGANIZE_FAILED_PREFIX}{cause}"),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ReorganizeOutcome::Success(_))
    }
}

/// Output of one processed upload. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    pub raw_markdown: String,
    /// `None` in [`ProcessMode::RawOnly`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organized_markdown: Option<String>,
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_is_none() {
        let req = UploadRequest::new(vec![], "a.pdf", Some(String::new()));
        assert!(req.password.is_none());
    }

    #[test]
    fn debug_hides_password() {
        let req = UploadRequest::new(vec![1, 2, 3], "a.pdf", Some("hunter2".into()));
        let dbg = format!("{req:?}");
        assert!(!dbg.contains("hunter2"));
    }

    #[test]
    fn failed_outcome_gets_prefix() {
        let text = ReorganizeOutcome::Failed("overloaded".into()).into_text();
        assert_eq!(text, "Claude API processing failed: overloaded");
    }

    #[test]
    fn unavailable_outcome_is_verbatim() {
        let text = ReorganizeOutcome::Unavailable(API_KEY_MISSING.into()).into_text();
        assert_eq!(text, "Anthropic API key not configured");
    }

    #[test]
    fn raw_only_result_omits_organized_field() {
        let r = ConversionResult {
            raw_markdown: "x\n".into(),
            organized_markdown: None,
            filename: "a.pdf".into(),
        };
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("organized_markdown").is_none());
    }
}
