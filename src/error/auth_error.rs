use thiserror::Error;

/// Failures reported by the authentication provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Email not confirmed")]
    EmailNotConfirmed,
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
    #[error("Provider error: {0}")]
    Provider(String),
}
