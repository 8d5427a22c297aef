//! Transient file store: per-request temporary files with guaranteed cleanup.
//!
//! `lopdf` and `pdf-extract` read from the file system, so every upload is
//! persisted to a [`TransientFile`] before it is touched. A `TransientFile`
//! wraps a [`tempfile::NamedTempFile`]: the name is random and created
//! exclusively, and the file is removed when the handle is released or
//! dropped. Errors that abort the pipeline simply drop the handle; the happy
//! path calls [`TransientFile::release`] so deletion failures get logged.

use crate::error::Pdf2MdError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Filename prefix for every transient file.
pub const FILE_PREFIX: &str = "pdf2md-";

/// Factory for transient files rooted in one directory.
#[derive(Debug, Clone)]
pub struct TransientStore {
    root: PathBuf,
}

impl TransientStore {
    /// Store rooted at `root`, or the OS temp dir when `None`.
    pub fn new(root: Option<PathBuf>) -> Self {
        Self {
            root: root.unwrap_or_else(std::env::temp_dir),
        }
    }

    /// Create an empty, uniquely named file ending in `suffix`.
    pub fn acquire(&self, suffix: &str) -> Result<TransientFile, Pdf2MdError> {
        let inner = tempfile::Builder::new()
            .prefix(FILE_PREFIX)
            .suffix(suffix)
            .tempfile_in(&self.root)
            .map_err(|e| Pdf2MdError::TransientFile {
                path: self.root.clone(),
                source: e,
            })?;
        debug!("Acquired transient file {}", inner.path().display());
        Ok(TransientFile { inner })
    }

    /// Acquire a file and fill it with `bytes`.
    pub fn acquire_with(&self, suffix: &str, bytes: &[u8]) -> Result<TransientFile, Pdf2MdError> {
        let mut file = self.acquire(suffix)?;
        file.write_all(bytes)?;
        Ok(file)
    }
}

/// A temporary file owned by exactly one request.
#[derive(Debug)]
pub struct TransientFile {
    inner: NamedTempFile,
}

impl TransientFile {
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Write `bytes` and flush them to disk.
    pub fn write_all(&mut self, bytes: &[u8]) -> Result<(), Pdf2MdError> {
        let path = self.inner.path().to_path_buf();
        self.inner
            .write_all(bytes)
            .and_then(|_| self.inner.flush())
            .map_err(|source| Pdf2MdError::TransientFile { path, source })
    }

    /// Delete the backing file.
    ///
    /// A file that has already vanished is not an error. Other failures are
    /// logged rather than returned: the request outcome does not depend on them.
    pub fn release(self) {
        let path = self.inner.path().to_path_buf();
        match self.inner.close() {
            Ok(()) => debug!("Released transient file {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Transient file {} already gone", path.display())
            }
            Err(e) => warn!("Failed to remove transient file {}: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn acquire_creates_unique_files_with_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let store = TransientStore::new(Some(dir.path().to_path_buf()));

        let a = store.acquire(".pdf").unwrap();
        let b = store.acquire(".pdf").unwrap();

        assert_ne!(a.path(), b.path());
        for f in [&a, &b] {
            let name = f.path().file_name().unwrap().to_string_lossy().to_string();
            assert!(name.starts_with(FILE_PREFIX), "got: {name}");
            assert!(name.ends_with(".pdf"), "got: {name}");
        }
        assert_eq!(entries(dir.path()), 2);
    }

    #[test]
    fn acquire_with_persists_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = TransientStore::new(Some(dir.path().to_path_buf()));

        let f = store.acquire_with(".pdf", b"%PDF-1.7 data").unwrap();
        assert_eq!(std::fs::read(f.path()).unwrap(), b"%PDF-1.7 data");
    }

    #[test]
    fn release_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = TransientStore::new(Some(dir.path().to_path_buf()));

        let f = store.acquire(".pdf").unwrap();
        let path = f.path().to_path_buf();
        f.release();

        assert!(!path.exists());
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn release_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = TransientStore::new(Some(dir.path().to_path_buf()));

        let f = store.acquire(".pdf").unwrap();
        std::fs::remove_file(f.path()).unwrap();
        f.release();

        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn drop_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = TransientStore::new(Some(dir.path().to_path_buf()));

        {
            let _f = store.acquire_with(".pdf", b"%PDF").unwrap();
            assert_eq!(entries(dir.path()), 1);
        }
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn acquire_in_missing_dir_is_an_error() {
        let store = TransientStore::new(Some(PathBuf::from("/definitely/not/a/real/dir")));
        let err = store.acquire(".pdf").unwrap_err();
        assert!(matches!(err, Pdf2MdError::TransientFile { .. }));
    }
}
