use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::app_error::AppError;

pub const DEFAULT_KEY_PREFIX: &str = "login_attempts_";

#[derive(Debug, Deserialize, Serialize, Clone, Default, Validate)]
pub struct Config {
    #[validate(nested)]
    pub login_guard: LoginGuardConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct LoginGuardConfig {
    /// Failed attempts that trigger a lockout.
    #[validate(range(min = 1))]
    pub max_attempts: u32,
    /// At most one year.
    #[validate(range(min = 1, max = 525_600))]
    pub lock_duration_minutes: i64,
    /// Prepended to the account identifier to build the storage key.
    pub key_prefix: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
    Redis,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: String,
    pub redis_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    pub password_reset_redirect: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

impl Default for LoginGuardConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lock_duration_minutes: 5,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            path: "login_attempts.json".to_string(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_reset_redirect: "http://localhost:5173/reset-password".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. Compiled defaults
    /// 2. Uniapp.toml (optional)
    /// 3. Environment variables prefixed with UNIAPP_, `__` separating sections
    ///    (e.g. UNIAPP_LOGIN_GUARD__MAX_ATTEMPTS)
    ///
    /// The merged result is validated before it is returned.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let defaults = toml::to_string(&Config::default()).map_err(|e| figment::Error::from(e.to_string()))?;

        let config: Config = Figment::new()
            .merge(Toml::string(&defaults))
            .merge(Toml::file("Uniapp.toml"))
            .merge(Env::prefixed("UNIAPP_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }
}
