pub mod file;
pub mod memory;
pub mod redis_store;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::app_error::AppError;
use std::sync::Arc;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// String key/value persistence the login guard keeps its records in.
pub trait KeyValueStore: Send + Sync {
    fn read_key(&self, key: &str) -> Result<Option<String>, AppError>;

    fn write_key(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Deleting a missing key is not an error.
    fn delete_key(&self, key: &str) -> Result<(), AppError>;
}

pub fn build_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>, AppError> {
    let store: Arc<dyn KeyValueStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(JsonFileStore::new(&config.path)),
        StorageBackend::Redis => Arc::new(RedisStore::open(&config.redis_url)?),
    };

    tracing::debug!(backend = ?config.backend, "key/value store ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_memory_store() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            ..StorageConfig::default()
        };

        let store = build_store(&config).unwrap();
        store.write_key("k", "v").unwrap();
        assert_eq!(store.read_key("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn builds_file_store_at_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attempts.json");
        let config = StorageConfig {
            backend: StorageBackend::File,
            path: path.to_string_lossy().into_owned(),
            ..StorageConfig::default()
        };

        let store = build_store(&config).unwrap();
        store.write_key("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn rejects_malformed_redis_url() {
        let config = StorageConfig {
            backend: StorageBackend::Redis,
            redis_url: "not a url".to_string(),
            ..StorageConfig::default()
        };

        assert!(matches!(build_store(&config), Err(AppError::Redis { .. })));
    }
}
