pub mod auth;
pub mod availability;
pub mod login_guard;
