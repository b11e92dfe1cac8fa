pub mod availability;
pub mod booking;
pub mod login_attempt;
pub mod password;
pub mod tutoring;
pub mod user;
