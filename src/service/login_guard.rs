use crate::config::LoginGuardConfig;
use crate::error::app_error::AppError;
use crate::models::login_attempt::{LockStatus, LoginAttemptRecord};
use crate::store::KeyValueStore;
use crate::util::{Clock, SystemClock};
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Advisory login limiter.
///
/// Counts failed sign-ins per identifier in the injected store and locks the
/// identifier for a while once the threshold is reached. The lock only holds for
/// clients sharing the same store: it is a courtesy brake, not a server-side rate
/// limit, and two writers racing on one key can lose an update.
///
/// Storage failures never block a login. They are logged and the identifier is
/// reported as unlocked.
pub struct LoginGuard {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    config: LoginGuardConfig,
}

impl LoginGuard {
    pub fn new(store: Arc<dyn KeyValueStore>, config: LoginGuardConfig) -> Self {
        Self::with_clock(store, Arc::new(SystemClock), config)
    }

    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, config: LoginGuardConfig) -> Self {
        Self { store, clock, config }
    }

    pub fn config(&self) -> &LoginGuardConfig {
        &self.config
    }

    /// Whether a new attempt for `identifier` may go ahead. Clears an expired lock as a side effect.
    pub fn check_lock(&self, identifier: &str) -> LockStatus {
        let key = self.key(identifier);
        let record = match self.load(&key) {
            Ok(record) => record.unwrap_or_default(),
            Err(e) => {
                error!(identifier = %identifier, error = ?e, "could not read login attempts; allowing attempt");
                return LockStatus::unlocked(self.config.max_attempts);
            }
        };

        let now = self.clock.now();
        match record.locked_until {
            Some(until) if record.is_locked_at(now) => {
                let remaining_ms = (until - now).num_milliseconds();
                let remaining_minutes = (remaining_ms + MILLIS_PER_MINUTE - 1) / MILLIS_PER_MINUTE;
                debug!(identifier = %identifier, remaining_minutes, "login locked");
                LockStatus::locked(remaining_minutes)
            }
            Some(_) => {
                info!(identifier = %identifier, "login lock expired");
                if let Err(e) = self.store.delete_key(&key) {
                    error!(identifier = %identifier, error = ?e, "could not clear expired login lock");
                }
                LockStatus::unlocked(self.config.max_attempts)
            }
            None => LockStatus::unlocked(self.config.max_attempts.saturating_sub(record.failure_count)),
        }
    }

    /// Counts one failed attempt, locking the identifier when the threshold is reached.
    pub fn record_failure(&self, identifier: &str) {
        if let Err(e) = self.try_record_failure(identifier) {
            error!(identifier = %identifier, error = ?e, "could not record failed login");
        }
    }

    /// Forgets all failures for `identifier`; called after a successful sign-in.
    pub fn reset(&self, identifier: &str) {
        if let Err(e) = self.store.delete_key(&self.key(identifier)) {
            error!(identifier = %identifier, error = ?e, "could not reset login attempts");
        }
    }

    pub fn failed_attempts(&self, identifier: &str) -> u32 {
        match self.load(&self.key(identifier)) {
            Ok(record) => record.map_or(0, |r| r.failure_count),
            Err(e) => {
                error!(identifier = %identifier, error = ?e, "could not read login attempts");
                0
            }
        }
    }

    fn try_record_failure(&self, identifier: &str) -> Result<(), AppError> {
        let key = self.key(identifier);
        let now = self.clock.now();

        // A lock that ran out but was never observed starts a fresh count.
        let mut record = self
            .load(&key)?
            .filter(|r| r.locked_until.is_none() || r.is_locked_at(now))
            .unwrap_or_default();

        record.failure_count = record.failure_count.saturating_add(1);
        if record.failure_count >= self.config.max_attempts {
            let until = self
                .lock_expiry(now)
                .ok_or(AppError::InvalidLockDuration(self.config.lock_duration_minutes))?;
            if record.locked_until.is_none() {
                warn!(identifier = %identifier, failures = record.failure_count, locked_until = %until, "login locked");
            }
            record.locked_until = Some(until);
        }

        self.save(&key, &record)
    }

    fn lock_expiry(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        TimeDelta::try_minutes(self.config.lock_duration_minutes)
            .filter(|duration| *duration > TimeDelta::zero())
            .and_then(|duration| now.checked_add_signed(duration))
    }

    fn key(&self, identifier: &str) -> String {
        format!("{}{}", self.config.key_prefix, identifier)
    }

    fn load(&self, key: &str) -> Result<Option<LoginAttemptRecord>, AppError> {
        let Some(raw) = self.store.read_key(key)? else {
            return Ok(None);
        };

        match serde_json::from_str::<LoginAttemptRecord>(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(key = %key, error = %e, "discarding malformed login attempt record");
                Ok(None)
            }
        }
    }

    fn save(&self, key: &str, record: &LoginAttemptRecord) -> Result<(), AppError> {
        let raw = serde_json::to_string(record)?;
        self.store.write_key(key, &raw)
    }
}
