use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use quotekit_core::{KeyValueStorage, StorageError};
use tracing::debug;

/// One `<key>.json` file per key inside `dir`. Writes go through a temp file and a rename so
/// a crash never leaves a half-written list behind.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
    quota_bytes: Option<u64>,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf(), quota_bytes: None }
    }

    pub fn with_quota(mut self, quota_bytes: Option<u64>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !valid {
            return Err(StorageError::Unavailable(format!("unsupported storage key `{key}`")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(StorageError::Io(format!("{}: {error}", path.display()))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        if let Some(quota) = self.quota_bytes {
            let needed = value.len() as u64;
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        fs::create_dir_all(&self.dir).map_err(|error| {
            StorageError::Unavailable(format!("{}: {error}", self.dir.display()))
        })?;

        let staging = path.with_extension("json.tmp");
        let written = fs::write(&staging, value)
            .map_err(|error| StorageError::Io(format!("{}: {error}", staging.display())))
            .and_then(|()| {
                fs::rename(&staging, &path)
                    .map_err(|error| StorageError::Io(format!("{}: {error}", path.display())))
            });
        if written.is_err() {
            let _ = fs::remove_file(&staging);
        }
        written?;

        debug!(path = %path.display(), bytes = value.len(), "storage key written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use quotekit_core::{KeyValueStorage, StorageError};
    use tempfile::TempDir;

    use super::FileStorage;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = TempDir::new().expect("temp dir");
        let storage = FileStorage::new(dir.path());

        assert_eq!(storage.get("quotations").expect("get"), None);
    }

    #[test]
    fn set_creates_directory_and_round_trips() {
        let dir = TempDir::new().expect("temp dir");
        let storage = FileStorage::new(dir.path().join("nested").join("state"));

        storage.set("quotations", "[1,2,3]").expect("set");

        assert_eq!(storage.get("quotations").expect("get"), Some("[1,2,3]".to_string()));
        assert!(storage.dir().join("quotations.json").exists());
        assert!(!storage.dir().join("quotations.json.tmp").exists());
    }

    #[test]
    fn oversized_value_is_rejected_and_previous_value_survives() {
        let dir = TempDir::new().expect("temp dir");
        let storage = FileStorage::new(dir.path()).with_quota(Some(8));
        storage.set("quotations", "[]").expect("small write");

        let error = storage.set("quotations", "[1,2,3,4,5]").expect_err("over quota");

        assert_eq!(error, StorageError::QuotaExceeded { needed: 11, quota: 8 });
        assert_eq!(storage.get("quotations").expect("get"), Some("[]".to_string()));
    }

    #[test]
    fn failed_rename_leaves_no_staging_file() {
        let dir = TempDir::new().expect("temp dir");
        let blocker = dir.path().join("quotations.json");
        std::fs::create_dir_all(blocker.join("occupied")).expect("blocking directory");
        let storage = FileStorage::new(dir.path());

        let error = storage.set("quotations", "[1]").expect_err("rename onto a directory");

        assert!(matches!(error, StorageError::Io(_)));
        assert!(!dir.path().join("quotations.json.tmp").exists());
        assert!(blocker.is_dir());
    }

    #[test]
    fn path_like_keys_are_refused() {
        let dir = TempDir::new().expect("temp dir");
        let storage = FileStorage::new(dir.path());

        let error = storage.set("../escape", "x").expect_err("bad key");

        assert!(matches!(error, StorageError::Unavailable(_)));
    }
}
