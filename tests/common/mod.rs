//! Shared fixtures for the HTTP integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request};
use futures::future::BoxFuture;
use lopdf::content::{Content, Operation};
use lopdf::{
    dictionary, Document, EncryptionState, EncryptionVersion, Object, Permissions, Stream,
};
use pdf2md_service::{
    router, AppState, MarkdownConverter, Pdf2MdError, Pipeline, ReorganizeError, Reorganizer,
    ServiceConfig, TableReorganizer, TransientStore,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const BOUNDARY: &str = "pdf2md-test-boundary";

/// One-page PDF with a single line of Helvetica text.
pub fn hello_pdf(text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// [`hello_pdf`] protected with RC4 128-bit encryption and `user_password`.
pub fn encrypted_pdf(text: &str, user_password: &str) -> Vec<u8> {
    let mut doc = Document::load_mem(&hello_pdf(text)).unwrap();
    let id = Object::string_literal("pdf2md-fixture-id");
    doc.trailer.set("ID", vec![id.clone(), id]);
    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password,
        key_length: 128,
        permissions: Permissions::default(),
    })
    .unwrap();
    doc.encrypt(&state).unwrap();

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// One part of a multipart form.
pub enum Part<'a> {
    File {
        name: &'a str,
        filename: &'a str,
        data: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File {
                name,
                filename,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/pdf\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn upload_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Converter that never parses the PDF: it checks the normalised file is on
/// disk and reports its size, so tests do not depend on extractor output.
#[derive(Default)]
pub struct StubConverter {
    pub seen: Mutex<Vec<PathBuf>>,
}

impl MarkdownConverter for StubConverter {
    fn convert(&self, path: &Path) -> Result<String, Pdf2MdError> {
        let bytes = std::fs::read(path).map_err(|e| Pdf2MdError::ConversionFailed {
            detail: e.to_string(),
        })?;
        self.seen.lock().unwrap().push(path.to_path_buf());
        Ok(format!("# Stub\n\n{} bytes\n", bytes.len()))
    }
}

pub struct FailingConverter;

impl MarkdownConverter for FailingConverter {
    fn convert(&self, _path: &Path) -> Result<String, Pdf2MdError> {
        Err(Pdf2MdError::ConversionFailed {
            detail: "no text layer".into(),
        })
    }
}

/// Reorganizer that returns a canned answer and counts calls.
pub struct CountingReorganizer {
    pub answer: Result<String, ReorganizeError>,
    pub calls: AtomicUsize,
}

impl CountingReorganizer {
    pub fn ok(text: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Err(ReorganizeError::Api {
                message: message.to_string(),
            }),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TableReorganizer for CountingReorganizer {
    fn reorganize<'a>(
        &'a self,
        _markdown: &'a str,
    ) -> BoxFuture<'a, Result<String, ReorganizeError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let answer = self.answer.clone();
        Box::pin(async move { answer })
    }
}

/// A router whose transient files land in a private temp dir.
pub struct TestApp {
    pub router: axum::Router,
    pub temp: tempfile::TempDir,
}

impl TestApp {
    pub fn new(converter: Arc<dyn MarkdownConverter>, reorganizer: Reorganizer) -> Self {
        let temp = tempfile::tempdir().unwrap();
        let config = ServiceConfig::builder()
            .temp_dir(temp.path())
            .build()
            .unwrap();
        let pipeline = Pipeline::new(
            TransientStore::new(Some(temp.path().to_path_buf())),
            converter,
            reorganizer,
        );
        let state = Arc::new(AppState::with_pipeline(config, pipeline));
        Self {
            router: router(state),
            temp,
        }
    }

    pub fn with_stub(reorganizer: Reorganizer) -> Self {
        Self::new(Arc::new(StubConverter::default()), reorganizer)
    }

    /// Number of entries left in the transient directory.
    pub fn leftover_files(&self) -> usize {
        std::fs::read_dir(self.temp.path()).unwrap().count()
    }
}
