//! Filesystem store implementation.
//!
//! Provides [`FsStore`] which keeps one pretty-printed JSON file per page
//! (`{content_dir}/{page_name}.json`).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use tempfile::NamedTempFile;

use crate::document::{PageContentDocument, Precondition, Sections, upsert, validate_page_name};
use crate::store::{ContentStore, StoreError, StoreErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Extension of page document files.
const EXTENSION: &str = "json";

/// Filesystem content store.
///
/// Writes go to a temporary file in the content directory that is then
/// renamed over the page file, so readers never observe a half-written
/// document. A process-local mutex serialises read-check-write sequences.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use folio_store::{ContentStore, FsStore};
///
/// let store = FsStore::new(PathBuf::from("content"));
/// let page = store.fetch_or_default("home")?;
/// ```
pub struct FsStore {
    /// Directory holding one JSON file per page.
    content_dir: PathBuf,
    /// Serialises conditional writes.
    write_lock: Mutex<()>,
}

impl FsStore {
    /// Create a store rooted at `content_dir`.
    ///
    /// The directory is created on first write.
    #[must_use]
    pub fn new(content_dir: PathBuf) -> Self {
        Self {
            content_dir,
            write_lock: Mutex::new(()),
        }
    }

    /// Directory holding the page files.
    #[must_use]
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    fn page_path(&self, page_name: &str) -> PathBuf {
        self.content_dir.join(format!("{page_name}.{EXTENSION}"))
    }

    fn read_document(&self, page_name: &str) -> Result<Option<PageContentDocument>, StoreError> {
        let path = self.page_path(page_name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(e, Some(page_name)).with_backend(BACKEND)),
        };

        serde_json::from_str(&content).map(Some).map_err(|e| {
            StoreError::new(StoreErrorKind::Corrupt)
                .with_page(page_name)
                .with_backend(BACKEND)
                .with_source(e)
        })
    }

    fn write_document(&self, document: &PageContentDocument) -> Result<(), StoreError> {
        let page_name = document.page_name.as_str();
        let io_err = |e: std::io::Error| StoreError::io(e, Some(page_name)).with_backend(BACKEND);

        fs::create_dir_all(&self.content_dir).map_err(io_err)?;

        let json = serde_json::to_vec_pretty(document).map_err(|e| {
            StoreError::new(StoreErrorKind::Other)
                .with_page(page_name)
                .with_backend(BACKEND)
                .with_source(e)
        })?;

        let mut file = NamedTempFile::new_in(&self.content_dir).map_err(io_err)?;
        file.write_all(&json).map_err(io_err)?;
        file.persist(self.page_path(page_name))
            .map_err(|e| io_err(e.error))?;

        Ok(())
    }
}

impl ContentStore for FsStore {
    fn get(&self, page_name: &str) -> Result<Option<PageContentDocument>, StoreError> {
        validate_page_name(page_name).map_err(|e| e.with_backend(BACKEND))?;
        self.read_document(page_name)
    }

    fn put(
        &self,
        page_name: &str,
        sections: Sections,
        published: bool,
        precondition: &Precondition,
    ) -> Result<PageContentDocument, StoreError> {
        validate_page_name(page_name).map_err(|e| e.with_backend(BACKEND))?;

        let _guard = self.write_lock.lock().unwrap();
        let current = self.read_document(page_name)?;
        let document = upsert(
            current.as_ref(),
            page_name,
            sections,
            published,
            precondition,
            Utc::now(),
        )
        .map_err(|e| e.with_backend(BACKEND))?;

        self.write_document(&document)?;
        tracing::debug!(
            page = %page_name,
            path = %self.page_path(page_name).display(),
            "Wrote page document"
        );

        Ok(document)
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.content_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(e, None).with_backend(BACKEND)),
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|e| e == EXTENSION))
            .filter_map(|path| Some(path.file_stem()?.to_string_lossy().into_owned()))
            .filter(|name| validate_page_name(name).is_ok())
            .collect();
        names.sort();

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn sections(value: serde_json::Value) -> Sections {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_get_missing_page() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path().join("content"));

        assert_eq!(store.get("home").unwrap(), None);
    }

    #[test]
    fn test_put_creates_directory_and_file() {
        let tmp = TempDir::new().unwrap();
        let content_dir = tmp.path().join("nested/content");
        let store = FsStore::new(content_dir.clone());

        store
            .put("home", sections(json!({"hero": {"title": "Hi"}})), true, &Precondition::Any)
            .unwrap();

        assert!(content_dir.join("home.json").exists());
    }

    #[test]
    fn test_round_trip_through_disk() {
        let tmp = TempDir::new().unwrap();
        let content = sections(json!({
            "hero": {"title": "Old", "companyName": "Acme"},
            "faq": {"questions": [{"question": "Q1", "answer": "A1"}]}
        }));

        let stored = FsStore::new(tmp.path().to_path_buf())
            .put("about", content, true, &Precondition::Any)
            .unwrap();

        // A fresh store instance reads the same document back
        let reopened = FsStore::new(tmp.path().to_path_buf());
        assert_eq!(reopened.get("about").unwrap(), Some(stored.clone()));
        assert_eq!(
            reopened.fetch_or_default("about").unwrap().revision,
            Some(stored.revision())
        );
    }

    #[test]
    fn test_put_preserves_created_at() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path().to_path_buf());

        let first = store
            .put("home", Sections::new(), false, &Precondition::Any)
            .unwrap();
        let second = store
            .put("home", Sections::new(), true, &Precondition::Any)
            .unwrap();

        assert_eq!(second.created_at, first.created_at);
        assert!(second.published);
    }

    #[test]
    fn test_conflict_on_stale_revision() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path().to_path_buf());
        let first = store
            .put("home", Sections::new(), true, &Precondition::Missing)
            .unwrap();
        store
            .put("home", Sections::new(), true, &Precondition::Any)
            .unwrap();

        let err = store
            .put(
                "home",
                Sections::new(),
                true,
                &Precondition::Matches(first.revision()),
            )
            .unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::Conflict);
        assert_eq!(err.backend, Some("Fs"));
    }

    #[test]
    fn test_corrupt_document() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("home.json"), "{not json").unwrap();
        let store = FsStore::new(tmp.path().to_path_buf());

        let err = store.get("home").unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::Corrupt);
        assert_eq!(err.page.as_deref(), Some("home"));
    }

    #[test]
    fn test_rejects_traversal() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path().join("content"));

        let err = store
            .put("..", Sections::new(), true, &Precondition::Any)
            .unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::InvalidPageName);
    }

    #[test]
    fn test_list_ignores_foreign_files() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path().to_path_buf());
        store
            .put("services", Sections::new(), true, &Precondition::Any)
            .unwrap();
        store
            .put("about", Sections::new(), true, &Precondition::Any)
            .unwrap();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();
        fs::write(tmp.path().join("bad name.json"), "{}").unwrap();

        assert_eq!(store.list().unwrap(), vec!["about", "services"]);
    }

    #[test]
    fn test_list_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path().join("absent"));

        assert!(store.list().unwrap().is_empty());
    }
}
