use crate::error::app_error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a tutoring booking.
///
/// ```text
/// pending ──► confirmed ──► in_progress ──► completed
///    │            │
///    │            ├──► no_show
///    └────────────┴──► cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

/// Column stamped when a booking enters a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampField {
    ConfirmedAt,
    CompletedAt,
}

impl TimestampField {
    pub fn column(self) -> &'static str {
        match self {
            TimestampField::ConfirmedAt => "confirmed_at",
            TimestampField::CompletedAt => "completed_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingActions {
    pub can_confirm: bool,
    pub can_reject: bool,
    pub can_cancel: bool,
    pub can_start: bool,
    pub can_complete: bool,
    pub can_mark_no_show: bool,
    pub can_review: bool,
}

impl BookingStatus {
    pub fn available_transitions(self) -> &'static [BookingStatus] {
        use BookingStatus::*;
        match self {
            Pending => &[Confirmed, Cancelled],
            Confirmed => &[InProgress, Cancelled, NoShow],
            InProgress => &[Completed],
            Completed | Cancelled | NoShow => &[],
        }
    }

    pub fn can_transition(self, to: BookingStatus) -> bool {
        self.available_transitions().contains(&to)
    }

    pub fn transition(self, to: BookingStatus) -> Result<BookingStatus, AppError> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(AppError::InvalidTransition { from: self, to })
        }
    }

    pub fn is_terminal(self) -> bool {
        self.available_transitions().is_empty()
    }

    /// The session may still happen.
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::InProgress)
    }

    pub fn is_past(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::NoShow)
    }

    pub fn can_modify(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    pub fn timestamp_field(self) -> Option<TimestampField> {
        match self {
            BookingStatus::Confirmed => Some(TimestampField::ConfirmedAt),
            BookingStatus::Completed => Some(TimestampField::CompletedAt),
            _ => None,
        }
    }

    pub fn tutor_actions(self) -> BookingActions {
        BookingActions {
            can_confirm: self == BookingStatus::Pending,
            can_reject: self == BookingStatus::Pending,
            can_cancel: self.can_modify(),
            can_start: self == BookingStatus::Confirmed,
            can_complete: self == BookingStatus::InProgress,
            can_mark_no_show: self == BookingStatus::Confirmed,
            can_review: false,
        }
    }

    pub fn student_actions(self) -> BookingActions {
        BookingActions {
            can_cancel: self.can_modify(),
            can_review: self == BookingStatus::Completed,
            ..BookingActions::default()
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NoShow => "no_show",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::InProgress => "In progress",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::NoShow => "No show",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
