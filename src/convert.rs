//! Request orchestration: validate, normalise, convert, optionally reorganise.
//!
//! ```text
//! Validating ──▶ Normalizing ──▶ Converting ──┬──▶ Responding          (raw)
//!                                             └──▶ Reorganizing ──▶ Responding (full)
//! ```
//!
//! Validation failures short-circuit before any file is written. Normalizing
//! and Converting failures abort the request. Reorganizing never does: its
//! outcome is folded into the result as text. Every transient file is released
//! before [`Pipeline::process`] returns.

use crate::config::ServiceConfig;
use crate::error::{Pdf2MdError, ValidationError};
use crate::output::{ConversionResult, ProcessMode, ReorganizeOutcome, UploadRequest};
use crate::pipeline::markdown::{self, MarkdownConverter, PdfTextConverter};
use crate::pipeline::normalize;
use crate::pipeline::reorganize::Reorganizer;
use crate::pipeline::transient::TransientStore;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Check the upload's filename, in contract order.
///
/// `None` means the form had no file part at all.
pub fn validate_filename(filename: Option<&str>) -> Result<(), ValidationError> {
    let filename = filename.ok_or(ValidationError::NoFileProvided)?;
    if filename.is_empty() {
        return Err(ValidationError::NoFileSelected);
    }
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(ValidationError::NotPdfFilename);
    }
    Ok(())
}

/// The conversion pipeline with its process-wide collaborators.
///
/// Built once at startup and shared read-only between requests.
#[derive(Clone)]
pub struct Pipeline {
    store: TransientStore,
    converter: Arc<dyn MarkdownConverter>,
    reorganizer: Reorganizer,
}

impl Pipeline {
    pub fn new(
        store: TransientStore,
        converter: Arc<dyn MarkdownConverter>,
        reorganizer: Reorganizer,
    ) -> Self {
        Self {
            store,
            converter,
            reorganizer,
        }
    }

    /// Default collaborators: `pdf-extract` converter, reorganizer per config.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            TransientStore::new(config.temp_dir.clone()),
            Arc::new(PdfTextConverter),
            Reorganizer::from_config(config),
        )
    }

    pub fn reorganizer(&self) -> &Reorganizer {
        &self.reorganizer
    }

    /// Normalise and convert one upload to Markdown.
    ///
    /// All transient files are released before this returns, whether
    /// conversion succeeded or not.
    pub async fn to_markdown(
        &self,
        bytes: Vec<u8>,
        password: Option<String>,
    ) -> Result<String, Pdf2MdError> {
        let normalized = normalize::normalize(self.store.clone(), bytes, password).await?;
        debug!(
            "Converting {} (decrypted: {})",
            normalized.path().display(),
            normalized.was_decrypted()
        );

        let converted =
            markdown::convert_path(Arc::clone(&self.converter), normalized.path()).await;
        normalized.release();
        converted
    }

    /// Run the pipeline for one validated upload.
    pub async fn process(
        &self,
        upload: UploadRequest,
        mode: ProcessMode,
    ) -> Result<ConversionResult, Pdf2MdError> {
        let start = Instant::now();
        let UploadRequest {
            bytes,
            filename,
            password,
        } = upload;
        info!(
            "Processing '{}' ({} bytes, password: {}, mode: {:?})",
            filename,
            bytes.len(),
            password.is_some(),
            mode
        );

        let raw_markdown = self.to_markdown(bytes, password).await?;
        info!(
            "Converted '{}' → {} chars in {}ms",
            filename,
            raw_markdown.len(),
            start.elapsed().as_millis()
        );

        let organized_markdown = match mode {
            ProcessMode::RawOnly => None,
            ProcessMode::Full => {
                let outcome: ReorganizeOutcome = self.reorganizer.run(&raw_markdown).await;
                debug!("Reorganize outcome success={}", outcome.is_success());
                Some(outcome.into_text())
            }
        };

        Ok(ConversionResult {
            raw_markdown,
            organized_markdown,
            filename,
        })
    }
}
