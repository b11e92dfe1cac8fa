use crate::error::app_error::AppError;
use crate::store::KeyValueStore;
use redis::{Client, Commands, Connection};

/// Store backed by a Redis instance. Opens a short-lived connection per call.
#[derive(Debug, Clone)]
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    /// Parses `url` without connecting; connection errors surface on first use.
    pub fn open(url: &str) -> Result<Self, AppError> {
        let client = Client::open(url).map_err(|e| AppError::redis(format!("invalid redis url {}", url), e))?;
        Ok(Self { client })
    }

    fn connection(&self) -> Result<Connection, AppError> {
        self.client.get_connection().map_err(|e| AppError::redis("connecting to redis", e))
    }
}

impl KeyValueStore for RedisStore {
    fn read_key(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.connection()?;
        let value: Option<String> = conn.get(key)?;
        Ok(value)
    }

    fn write_key(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut conn = self.connection()?;
        let _: () = conn.set(key, value)?;
        Ok(())
    }

    fn delete_key(&self, key: &str) -> Result<(), AppError> {
        let mut conn = self.connection()?;
        let _: () = conn.del(key)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_accepts_redis_urls() {
        assert!(RedisStore::open("redis://127.0.0.1:6379").is_ok());
        assert!(RedisStore::open("redis://127.0.0.1:6379/2").is_ok());
    }

    #[test]
    #[ignore = "requires redis"]
    fn write_read_delete_roundtrip() {
        let store = RedisStore::open("redis://127.0.0.1:6379").unwrap();
        store.write_key("uniapp_core_test", "1").unwrap();
        assert_eq!(store.read_key("uniapp_core_test").unwrap().as_deref(), Some("1"));
        store.delete_key("uniapp_core_test").unwrap();
        assert_eq!(store.read_key("uniapp_core_test").unwrap(), None);
    }
}
