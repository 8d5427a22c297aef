use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use tracing::debug;

use crate::error::ValidationError;
use crate::server::error::ApiError;

/// An uploaded file with its data and original name.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Parsed form fields from the multipart upload.
pub struct FormFields {
    /// `None` when the form had no `file` part carrying a filename.
    pub file: Option<UploadedFile>,
    /// `None` when absent or empty.
    pub password: Option<String>,
}

/// Parse a multipart form upload into structured form fields.
///
/// A `file` part without a `filename` parameter is an ordinary form value,
/// not an upload, and is ignored. When several `file` parts are sent, the
/// first one wins.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<FormFields, ApiError> {
    let mut file: Option<UploadedFile> = None;
    let mut password: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" if file.is_none() && field.file_name().is_some() => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(form_error)?.to_vec();
                debug!("Received file part '{}' ({} bytes)", filename, data.len());
                file = Some(UploadedFile { filename, data });
            }
            "password" => {
                let val = field.text().await.map_err(form_error)?;
                if !val.is_empty() {
                    password = Some(val);
                }
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await.map_err(form_error)?;
            }
        }
    }

    Ok(FormFields { file, password })
}

fn form_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::TooLarge(e.body_text())
    } else {
        ApiError::Validation(ValidationError::InvalidForm(e.body_text()))
    }
}
