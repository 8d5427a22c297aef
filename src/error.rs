//! Error types for the pdf2md service.
//!
//! Three error types map onto the three ways a request can go wrong:
//!
//! * [`ValidationError`] — the upload itself is unusable (no file, empty
//!   filename, wrong extension, malformed form). Reported as HTTP 400 before
//!   any file touches the disk.
//!
//! * [`Pdf2MdError`] — **Fatal**: the PDF could not be normalised or
//!   converted (not a PDF, corrupt, wrong password, extractor failure).
//!   Reported as HTTP 500 with the `PDF processing failed:` prefix.
//!
//! * [`ReorganizeError`] — **Non-fatal**: the optional table reorganisation
//!   call failed. Never surfaced as a request failure; it is folded into
//!   [`crate::output::ReorganizeOutcome::Failed`] and embedded in the
//!   response body as text.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons an upload is rejected before processing starts.
///
/// The `Display` strings are part of the HTTP contract; clients match on them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No `file` part in the multipart form.
    #[error("No file provided")]
    NoFileProvided,

    /// The `file` part was present but its filename was empty.
    #[error("No file selected")]
    NoFileSelected,

    /// The filename does not end in `.pdf` (case-insensitive).
    #[error("File must be a PDF")]
    NotPdfFilename,

    /// The multipart body could not be read.
    #[error("Invalid form data: {0}")]
    InvalidForm(String),
}

/// All fatal errors raised while normalising or converting a PDF.
#[derive(Debug, Error)]
pub enum Pdf2MdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The uploaded bytes do not start with the `%PDF` magic.
    #[error("File is not a valid PDF (first bytes: {magic:?})")]
    NotAPdf { magic: Vec<u8> },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF is corrupt: {detail}")]
    CorruptPdf { detail: String },

    // ── Decryption errors ─────────────────────────────────────────────────
    /// A password was provided but it does not open the document.
    #[error("Failed to decrypt PDF: incorrect password")]
    WrongPassword,

    /// Decryption failed for a reason other than a wrong password
    /// (unsupported security handler, damaged encryption dictionary, …).
    #[error("Failed to decrypt PDF: {detail}")]
    DecryptionFailed { detail: String },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// The Markdown converter rejected the (normalised) document.
    #[error("Markdown conversion failed: {detail}")]
    ConversionFailed { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create, write or read a transient file.
    #[error("Temporary file error at '{}': {source}", path.display())]
    TransientFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error from the table reorganisation stage.
#[derive(Debug, Clone, Error)]
pub enum ReorganizeError {
    /// The remote API returned an error.
    #[error("{message}")]
    Api { message: String },

    /// The remote call exceeded the configured timeout.
    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The model answered with no text.
    #[error("model returned an empty response")]
    EmptyResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_exact() {
        assert_eq!(ValidationError::NoFileProvided.to_string(), "No file provided");
        assert_eq!(ValidationError::NoFileSelected.to_string(), "No file selected");
        assert_eq!(ValidationError::NotPdfFilename.to_string(), "File must be a PDF");
    }

    #[test]
    fn wrong_password_mentions_decryption() {
        let e = Pdf2MdError::WrongPassword;
        assert!(e.to_string().contains("decrypt"), "got: {e}");
    }

    #[test]
    fn conversion_failure_carries_detail() {
        let e = Pdf2MdError::ConversionFailed {
            detail: "bad xref".into(),
        };
        assert!(e.to_string().contains("bad xref"));
    }

    #[test]
    fn timeout_display() {
        let e = ReorganizeError::Timeout { secs: 90 };
        assert!(e.to_string().contains("90s"));
    }

    #[test]
    fn transient_file_display_includes_path() {
        let e = Pdf2MdError::TransientFile {
            path: PathBuf::from("/tmp/pdf2md-x.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/tmp/pdf2md-x.pdf"), "got: {msg}");
        assert!(msg.contains("disk full"), "got: {msg}");
    }
}
