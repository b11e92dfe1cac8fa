use crate::error::app_error::AppError;
use crate::store::KeyValueStore;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Keeps every key in one JSON object on disk, the way a browser keeps local storage
/// for an origin. Each operation reads the file and writes it back whole; there is no
/// locking between processes sharing the file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(AppError::io(format!("reading {}", self.path.display()), e)),
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "store file is not a JSON object of strings");
            AppError::serialization(format!("parsing {}", self.path.display()), e)
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::io(format!("creating {}", parent.display()), e))?;
        }

        let raw = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw).map_err(|e| AppError::io(format!("writing {}", tmp.display()), e))?;
        fs::rename(&tmp, &self.path).map_err(|e| AppError::io(format!("replacing {}", self.path.display()), e))
    }
}

impl KeyValueStore for JsonFileStore {
    fn read_key(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.load()?.remove(key))
    }

    fn write_key(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn delete_key(&self, key: &str) -> Result<(), AppError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.read_key("anything").unwrap(), None);
        store.delete_key("anything").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn values_survive_a_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        JsonFileStore::new(&path).write_key("login_attempts_a@b.com", r#"{"failureCount":1}"#).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(
            reopened.read_key("login_attempts_a@b.com").unwrap().as_deref(),
            Some(r#"{"failureCount":1}"#)
        );

        reopened.delete_key("login_attempts_a@b.com").unwrap();
        assert_eq!(JsonFileStore::new(&path).read_key("login_attempts_a@b.com").unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.read_key("k"), Err(AppError::Serialization { .. })));
    }
}
