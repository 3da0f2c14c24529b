use std::path::{Path, PathBuf};

/// A reference to a document file persisted on disk.
///
/// Carries the path and the lowercased declared extension (with leading
/// dot). The byte size is read on demand via [`size`](DocumentRef::size)
/// rather than at construction, so classifying an unsupported file never
/// touches the filesystem.
///
/// Cleanup ownership is explicit: a ref built with
/// [`DocumentRef::owned`] deletes the file when dropped (the mode for
/// upload handlers that persist request bytes to a temp path), while
/// [`DocumentRef::new`] leaves the file alone (the mode for files the
/// caller owns, e.g. a CLI argument).
#[derive(Debug)]
pub struct DocumentRef {
    path: PathBuf,
    extension: String,
    owned: bool,
}

impl DocumentRef {
    /// A borrowed reference: the file is not deleted on drop.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = declared_extension(&path);
        Self {
            path,
            extension,
            owned: false,
        }
    }

    /// An owned reference: the file is deleted when this ref drops,
    /// whether extraction succeeded or failed.
    pub fn owned(path: impl Into<PathBuf>) -> Self {
        let mut doc = Self::new(path);
        doc.owned = true;
        doc
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lowercased extension with leading dot, or `""` when absent.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Byte size of the underlying file.
    pub fn size(&self) -> std::io::Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }
}

impl Drop for DocumentRef {
    fn drop(&mut self) {
        if self.owned {
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove document file");
            }
        }
    }
}

fn declared_extension(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!(".{}", ext.to_ascii_lowercase()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn extension_is_lowercased_with_dot() {
        assert_eq!(DocumentRef::new("/tmp/report.PDF").extension(), ".pdf");
        assert_eq!(DocumentRef::new("/tmp/a.docx").extension(), ".docx");
        assert_eq!(DocumentRef::new("/tmp/noext").extension(), "");
    }

    #[test]
    fn owned_ref_deletes_file_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.pdf");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"%PDF-")
            .unwrap();

        let doc = DocumentRef::owned(&path);
        assert!(path.exists());
        drop(doc);
        assert!(!path.exists());
    }

    #[test]
    fn borrowed_ref_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.pdf");
        std::fs::write(&path, b"%PDF-").unwrap();

        drop(DocumentRef::new(&path));
        assert!(path.exists());
    }

    #[test]
    fn size_reports_byte_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.pdf");
        std::fs::write(&path, b"12345").unwrap();
        assert_eq!(DocumentRef::new(&path).size().unwrap(), 5);
    }
}
