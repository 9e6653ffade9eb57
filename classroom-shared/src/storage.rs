/// Local media storage for uploads and generated artifacts
///
/// Uploaded files (profile pictures, course thumbnails, course files) and
/// generated certificates live under a single media root, organized into
/// subdirectories. Database rows store paths relative to that root (e.g.,
/// `certificates/cert_jdoe_algebra-i.png`); the API serves the root at
/// `/media`.
///
/// # Example
///
/// ```no_run
/// use classroom_shared::storage::MediaStore;
///
/// # async fn example() -> Result<(), classroom_shared::storage::StorageError> {
/// let store = MediaStore::new("media");
/// let path = store.save("course_files", "syllabus.pdf", b"...").await?;
/// assert_eq!(path, "course_files/syllabus.pdf");
/// assert_eq!(MediaStore::url_path(&path), "/media/course_files/syllabus.pdf");
/// # Ok(())
/// # }
/// ```

use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

/// Error type for media storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem operation failed
    #[error("Media I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Path escaped the media root or contained invalid components
    #[error("Invalid media path: {0}")]
    InvalidPath(String),
}

/// Disk-backed media store rooted at a single directory
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Creates a media store rooted at `root`
    ///
    /// The directory is created lazily on the first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The media root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Saves bytes under `subdir/filename` and returns the relative path
    ///
    /// The subdirectory is created if missing. Both components are rejected
    /// when they contain path separators or `..`.
    pub async fn save(
        &self,
        subdir: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        validate_component(subdir)?;
        validate_component(filename)?;

        let dir = self.root.join(subdir);
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(filename);
        tokio::fs::write(&path, bytes).await?;

        debug!(path = %path.display(), size = bytes.len(), "Stored media file");

        Ok(format!("{}/{}", subdir, filename))
    }

    /// Removes a stored file by its relative path
    ///
    /// Returns true if the file existed and was removed, false if it was
    /// already gone.
    pub async fn remove(&self, rel_path: &str) -> Result<bool, StorageError> {
        let path = self.resolve(rel_path)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    /// Resolves a relative media path to an absolute filesystem path
    pub fn resolve(&self, rel_path: &str) -> Result<PathBuf, StorageError> {
        for component in rel_path.split('/') {
            validate_component(component)?;
        }
        Ok(self.root.join(rel_path))
    }

    /// The public URL path for a stored file
    pub fn url_path(rel_path: &str) -> String {
        format!("/media/{}", rel_path)
    }

    /// Builds a collision-free filename from a client-supplied one
    ///
    /// Prefixes a short random token and replaces anything outside
    /// `[A-Za-z0-9._-]` so client input can't smuggle path components.
    pub fn unique_filename(original: &str) -> String {
        let sanitized = sanitize_filename(original);
        let token = Uuid::new_v4().simple().to_string();
        format!("{}_{}", &token[..8], sanitized)
    }
}

/// Replaces anything outside `[A-Za-z0-9._-]` with underscores
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // A name of only separators/dots would vanish or escape; fall back
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

fn validate_component(component: &str) -> Result<(), StorageError> {
    if component.is_empty()
        || component == "."
        || component == ".."
        || component.contains('\\')
        || component.contains('\0')
        || Path::new(component).components().count() != 1
    {
        return Err(StorageError::InvalidPath(component.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("my file (1).pdf"), "my_file__1_.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_filename("..."), "file");
        assert_eq!(sanitize_filename(""), "file");
    }

    #[test]
    fn test_unique_filename_prefixes_token() {
        let a = MediaStore::unique_filename("notes.txt");
        let b = MediaStore::unique_filename("notes.txt");

        assert!(a.ends_with("_notes.txt"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_url_path() {
        assert_eq!(
            MediaStore::url_path("certificates/cert_jdoe_algebra.png"),
            "/media/certificates/cert_jdoe_algebra.png"
        );
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let store = MediaStore::new("/tmp/media");
        assert!(store.resolve("../secrets").is_err());
        assert!(store.resolve("a/../b").is_err());
        assert!(store.resolve("certificates/cert.png").is_ok());
    }

    #[tokio::test]
    async fn test_save_and_remove_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());

        let rel = store
            .save("course_files", "notes.txt", b"hello")
            .await
            .unwrap();
        assert_eq!(rel, "course_files/notes.txt");

        let on_disk = tokio::fs::read(dir.path().join("course_files/notes.txt"))
            .await
            .unwrap();
        assert_eq!(on_disk, b"hello");

        assert!(store.remove(&rel).await.unwrap());
        assert!(!store.remove(&rel).await.unwrap());
    }

    #[tokio::test]
    async fn test_save_rejects_bad_components() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());

        assert!(store.save("..", "x.txt", b"x").await.is_err());
        assert!(store.save("files", "../x.txt", b"x").await.is_err());
    }
}
