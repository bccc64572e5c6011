//! File-backed storage: one JSON file per key under a data directory.
//!
//! Writes are atomic (temp file + rename) so a crash mid-write never leaves
//! a half-serialized entry behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{StorageBackend, StorageError};

/// Directory-of-JSON-files backend.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open (creating if needed) a backend rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are fixed identifiers (see storage::keys); sanitize anyway so
        // a stray separator cannot escape the data directory.
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        write_atomic(&path, value)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let backend = FileBackend::open(dir.path()).expect("open");
            backend.write("cart", r#"[{"id":"p1"}]"#).expect("write");
        }
        let backend = FileBackend::open(dir.path()).expect("reopen");
        assert_eq!(
            backend.read("cart").expect("read").as_deref(),
            Some(r#"[{"id":"p1"}]"#)
        );
    }

    #[test]
    fn test_delete_missing_key_is_ok() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = FileBackend::open(dir.path()).expect("open");
        backend.delete("nothing").expect("delete");
    }

    #[test]
    fn test_keys_are_sanitized() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = FileBackend::open(dir.path()).expect("open");
        backend.write("../escape", "x").expect("write");
        assert!(dir.path().join("___escape.json").exists());
    }

    #[test]
    fn test_delete_removes_entry() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = FileBackend::open(dir.path()).expect("open");
        backend.write("user", "{}").expect("write");
        backend.delete("user").expect("delete");
        assert!(backend.read("user").expect("read").is_none());
    }
}
