use crate::error::app_error::AppError;
use crate::store::KeyValueStore;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Process-local store. Records vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, AppError> {
        self.entries
            .lock()
            .map_err(|_| AppError::StorageUnavailable("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn read_key(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn write_key(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_key(&self, key: &str) -> Result<(), AppError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_delete() {
        let store = MemoryStore::new();
        assert_eq!(store.read_key("a").unwrap(), None);

        store.write_key("a", "1").unwrap();
        store.write_key("a", "2").unwrap();
        assert_eq!(store.read_key("a").unwrap().as_deref(), Some("2"));

        store.delete_key("a").unwrap();
        store.delete_key("a").unwrap();
        assert_eq!(store.read_key("a").unwrap(), None);
    }

    #[test]
    fn keys_are_case_sensitive() {
        let store = MemoryStore::new();
        store.write_key("login_attempts_A@b.com", "x").unwrap();
        assert_eq!(store.read_key("login_attempts_a@b.com").unwrap(), None);
    }
}
