use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Failed login bookkeeping for one account identifier.
///
/// `locked_until` is set only once `failure_count` reached the lockout threshold,
/// and the whole record is dropped when the lock expires or the user signs in.
/// Older clients wrote `count`/`lockUntil`; both spellings are read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginAttemptRecord {
    #[serde(alias = "count")]
    pub failure_count: u32,
    #[serde(alias = "lockUntil", default, with = "chrono::serde::ts_milliseconds_option")]
    pub locked_until: Option<DateTime<Utc>>,
}

impl LoginAttemptRecord {
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockStatus {
    pub is_locked: bool,
    pub remaining_minutes: i64,
    pub attempts_remaining: u32,
}

impl LockStatus {
    pub fn unlocked(attempts_remaining: u32) -> Self {
        Self {
            is_locked: false,
            remaining_minutes: 0,
            attempts_remaining,
        }
    }

    pub fn locked(remaining_minutes: i64) -> Self {
        Self {
            is_locked: true,
            remaining_minutes,
            attempts_remaining: 0,
        }
    }
}
