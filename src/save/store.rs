//! On-disk storage for the save document
//!
//! The document lives at one fixed path. Writes go to a temp file in the
//! same directory which is then renamed over the target, so a failed write
//! never leaves a truncated save behind.

use super::types::{SaveDocument, SaveError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub struct SaveStore {
    save_directory: PathBuf,
    path: PathBuf,
}

impl SaveStore {
    /// Creates a store for `file_name` inside `save_directory`
    ///
    /// The save directory will be created if it doesn't exist.
    pub fn new(save_directory: impl AsRef<Path>, file_name: &str) -> Result<Self, SaveError> {
        let save_dir = save_directory.as_ref().to_path_buf();

        if !save_dir.exists() {
            fs::create_dir_all(&save_dir)?;
        }

        Ok(SaveStore {
            path: save_dir.join(file_name),
            save_directory: save_dir,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Serializes and writes the document, fully replacing any prior file
    pub fn write(&self, document: &SaveDocument) -> Result<PathBuf, SaveError> {
        let json = document.to_json_pretty()?;

        let mut tmp = NamedTempFile::new_in(&self.save_directory)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;

        Ok(self.path.clone())
    }

    /// Reads and parses the document
    ///
    /// Returns `Ok(None)` when no save file exists.
    pub fn read(&self) -> Result<Option<SaveDocument>, SaveError> {
        if !self.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&self.path)?;
        SaveDocument::from_json(bytes).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::Snapshot;

    #[test]
    fn test_read_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path(), "gameData.json").unwrap();

        assert!(!store.exists());
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path().join("nested"), "gameData.json").unwrap();

        let mut doc = SaveDocument::new();
        doc.insert("flag", Snapshot::Opaque(serde_json::json!({ "repaired": true })));
        let path = store.write(&doc).unwrap();

        assert_eq!(path, store.path());
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains('\n'), "save file should be pretty-printed");
        assert_eq!(store.read().unwrap(), Some(doc));
    }

    #[test]
    fn test_write_replaces_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path(), "gameData.json").unwrap();

        let mut first = SaveDocument::new();
        first.insert("a", Snapshot::Opaque(serde_json::json!(1)));
        first.insert("b", Snapshot::Opaque(serde_json::json!(2)));
        store.write(&first).unwrap();

        let mut second = SaveDocument::new();
        second.insert("a", Snapshot::Opaque(serde_json::json!(3)));
        store.write(&second).unwrap();

        let loaded = store.read().unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(!loaded.contains("b"));
    }

    #[test]
    fn test_garbage_file_is_corrupted() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path(), "gameData.json").unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.read(), Err(SaveError::CorruptedData(_))));
    }

    #[test]
    fn test_invalid_utf8_is_corrupted() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path(), "gameData.json").unwrap();
        fs::write(store.path(), [0x7b, 0xff, 0xfe, 0x7d]).unwrap();

        assert!(matches!(store.read(), Err(SaveError::CorruptedData(_))));
    }

    #[test]
    fn test_failed_replace_leaves_target_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path(), "gameData.json").unwrap();

        let mut first = SaveDocument::new();
        first.insert("a", Snapshot::Opaque(serde_json::json!(1)));
        store.write(&first).unwrap();

        // Park the first save elsewhere and put a non-empty directory in its
        // place, so the rename over the target fails
        let kept = dir.path().join("kept.json");
        fs::rename(store.path(), &kept).unwrap();
        fs::create_dir(store.path()).unwrap();
        fs::write(store.path().join("blocker"), "x").unwrap();

        let mut second = SaveDocument::new();
        second.insert("b", Snapshot::Opaque(serde_json::json!(2)));
        assert!(matches!(store.write(&second), Err(SaveError::Persist(_))));

        let previous = SaveStore::new(dir.path(), "kept.json").unwrap();
        assert_eq!(previous.read().unwrap(), Some(first));
        assert!(store.path().join("blocker").exists());
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 2, "temp file should be cleaned up");
    }
}
