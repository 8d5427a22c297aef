//! PDF normalisation: make sure the converter never sees an encrypted file.
//!
//! The text extractor cannot read encrypted streams, so a password-protected
//! upload is decrypted with `lopdf` and then rebuilt page by page into a fresh
//! document with no `Encrypt` dictionary. Document-level security metadata is
//! not carried over; only the page tree and what it references survive.
//!
//! ```text
//! bytes ──▶ A (upload as-is) ──┬─ no password / not encrypted ──▶ A
//!                              └─ encrypted ──▶ decrypt ──▶ rebuild ──▶ B
//! ```
//!
//! Both A and B are [`TransientFile`]s owned by the returned [`NormalizedPdf`].

use crate::error::Pdf2MdError;
use crate::pipeline::transient::{TransientFile, TransientStore};
use lopdf::encryption::DecryptionError;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use std::path::Path;
use tracing::{debug, info};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in damaged files.
const MAX_TREE_DEPTH: usize = 64;

/// A PDF ready for conversion, plus every transient file created to get there.
#[derive(Debug)]
pub struct NormalizedPdf {
    original: TransientFile,
    decrypted: Option<TransientFile>,
}

impl NormalizedPdf {
    /// Path the converter should read.
    pub fn path(&self) -> &Path {
        self.decrypted.as_ref().unwrap_or(&self.original).path()
    }

    /// `true` when the upload was encrypted and a rebuilt copy is in use.
    pub fn was_decrypted(&self) -> bool {
        self.decrypted.is_some()
    }

    /// Release every transient file held by this value.
    pub fn release(self) {
        if let Some(decrypted) = self.decrypted {
            decrypted.release();
        }
        self.original.release();
    }
}

/// Normalise an upload on the blocking thread pool.
pub async fn normalize(
    store: TransientStore,
    bytes: Vec<u8>,
    password: Option<String>,
) -> Result<NormalizedPdf, Pdf2MdError> {
    tokio::task::spawn_blocking(move || normalize_blocking(&store, &bytes, password.as_deref()))
        .await
        .map_err(|e| Pdf2MdError::Internal(format!("Normalize task panicked: {}", e)))?
}

/// Blocking implementation of [`normalize`].
pub fn normalize_blocking(
    store: &TransientStore,
    bytes: &[u8],
    password: Option<&str>,
) -> Result<NormalizedPdf, Pdf2MdError> {
    check_magic(bytes)?;

    let original = store.acquire_with(".pdf", bytes)?;
    debug!(
        "Persisted upload ({} bytes) to {}",
        bytes.len(),
        original.path().display()
    );

    let Some(password) = password else {
        return Ok(NormalizedPdf {
            original,
            decrypted: None,
        });
    };

    let mut doc = Document::load(original.path()).map_err(|e| Pdf2MdError::CorruptPdf {
        detail: e.to_string(),
    })?;

    if !doc.is_encrypted() {
        debug!("Password supplied for an unencrypted PDF; ignoring it");
        return Ok(NormalizedPdf {
            original,
            decrypted: None,
        });
    }

    doc.decrypt(password).map_err(|e| match e {
        lopdf::Error::Decryption(DecryptionError::IncorrectPassword) => {
            Pdf2MdError::WrongPassword
        }
        other => Pdf2MdError::DecryptionFailed {
            detail: other.to_string(),
        },
    })?;

    let mut rebuilt = rebuild_from_pages(&doc)?;
    let mut buf = Vec::new();
    rebuilt
        .save_to(&mut buf)
        .map_err(|e| Pdf2MdError::Internal(format!("Failed to serialise decrypted PDF: {}", e)))?;

    let decrypted = store.acquire_with(".pdf", &buf)?;
    info!(
        "Decrypted PDF rebuilt ({} pages) at {}",
        rebuilt.get_pages().len(),
        decrypted.path().display()
    );

    Ok(NormalizedPdf {
        original,
        decrypted: Some(decrypted),
    })
}

/// Reject inputs that do not carry the `%PDF` header.
fn check_magic(bytes: &[u8]) -> Result<(), Pdf2MdError> {
    if bytes.starts_with(b"%PDF") {
        Ok(())
    } else {
        Err(Pdf2MdError::NotAPdf {
            magic: bytes.iter().take(8).copied().collect(),
        })
    }
}

/// Copy every page of `source`, in order, into a new single-level page tree.
///
/// Inheritable attributes are materialised on each page first, since the
/// intermediate `Pages` nodes that carried them are dropped. The trailer is
/// replaced, so `Encrypt`, `Info` and `ID` do not survive.
pub fn rebuild_from_pages(source: &Document) -> Result<Document, Pdf2MdError> {
    let pages = source.get_pages();
    if pages.is_empty() {
        return Err(Pdf2MdError::CorruptPdf {
            detail: "document has no pages".into(),
        });
    }

    let mut out = Document::with_version(source.version.clone());
    out.objects = source.objects.clone();
    out.max_id = source.max_id;

    let pages_root = out.new_object_id();
    let mut kids = Vec::with_capacity(pages.len());

    for &page_id in pages.values() {
        let inherited: Vec<(&[u8], Object)> = INHERITABLE
            .iter()
            .filter_map(|key| find_inherited(source, page_id, key).map(|v| (*key, v)))
            .collect();

        let page = out
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| Pdf2MdError::CorruptPdf {
                detail: format!("page {:?}: {}", page_id, e),
            })?;
        for (key, value) in inherited {
            page.set(key, value);
        }
        page.set("Parent", pages_root);
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    out.objects.insert(
        pages_root,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = out.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_root,
    });

    let mut trailer = Dictionary::new();
    trailer.set("Root", catalog_id);
    out.trailer = trailer;

    out.prune_objects();
    out.renumber_objects();
    Ok(out)
}

/// Value of `key` inherited by `page_id`, when the page does not set it itself.
fn find_inherited(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let page = doc.get_dictionary(page_id).ok()?;
    if page.has(key) {
        return None;
    }

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_dictionary(parent?).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}
