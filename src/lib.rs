pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod util;

pub use config::Config;
pub use error::app_error::AppError;
pub use models::availability::{AvailabilityGrid, Day, Slot};
pub use models::login_attempt::LockStatus;
pub use service::auth::{AuthService, Authenticator, LoginOutcome};
pub use service::login_guard::LoginGuard;
pub use store::{KeyValueStore, build_store};

use tracing_subscriber::EnvFilter;
use validator::Validate;

/// Installs the global tracing subscriber. Call once, at startup.
///
/// RUST_LOG takes precedence over the configured level for fine-grained control:
///   RUST_LOG=debug                              - everything at debug
///   RUST_LOG=info,uniapp_core::service=debug    - guard and codec at debug
pub fn init_tracing(logging: &config::LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    if logging.json_format {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Builds a login guard over the configured store.
pub fn build_login_guard(config: &Config) -> Result<LoginGuard, AppError> {
    config.login_guard.validate()?;
    let store = build_store(&config.storage)?;
    Ok(LoginGuard::new(store, config.login_guard.clone()))
}
