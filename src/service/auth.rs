use crate::config::AuthConfig;
use crate::error::app_error::AppError;
use crate::error::auth_error::AuthError;
use crate::models::user::{LoginRequest, PasswordResetRequest, Session};
use crate::service::login_guard::LoginGuard;
use async_trait::async_trait;
use tracing::{info, warn};
use validator::Validate;

/// The hosted authentication provider.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn request_password_reset(&self, email: &str, redirect_to: &str) -> Result<(), AuthError>;
}

/// What happened during a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials accepted by the provider.
    Success(Session),
    /// Too many failures; the provider was not contacted.
    Locked { remaining_minutes: i64 },
    /// Wrong credentials, with the attempts left before a lockout.
    Rejected { attempts_remaining: u32 },
}

impl LoginOutcome {
    pub fn message(&self) -> String {
        match self {
            LoginOutcome::Success(_) => "Signed in".to_string(),
            LoginOutcome::Locked { remaining_minutes } => {
                let unit = if *remaining_minutes == 1 { "minute" } else { "minutes" };
                format!("Too many failed attempts. Try again in {} {}.", remaining_minutes, unit)
            }
            LoginOutcome::Rejected { attempts_remaining } => {
                let unit = if *attempts_remaining == 1 { "attempt" } else { "attempts" };
                format!("Incorrect email or password. {} {} left.", attempts_remaining, unit)
            }
        }
    }
}

pub struct AuthService<A: Authenticator> {
    authenticator: A,
    guard: LoginGuard,
    config: AuthConfig,
}

impl<A: Authenticator> AuthService<A> {
    pub fn new(authenticator: A, guard: LoginGuard, config: AuthConfig) -> Self {
        Self {
            authenticator,
            guard,
            config,
        }
    }

    pub fn guard(&self) -> &LoginGuard {
        &self.guard
    }

    /// Validates the form, consults the login guard and signs in.
    ///
    /// Only a credentials rejection counts towards the lockout; an unreachable
    /// provider is returned as an error and leaves the counters alone.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, AppError> {
        request.validate()?;
        let email = request.email.as_str();

        let status = self.guard.check_lock(email);
        if status.is_locked {
            info!(identifier = %email, remaining_minutes = status.remaining_minutes, "login blocked by lockout");
            return Ok(LoginOutcome::Locked {
                remaining_minutes: status.remaining_minutes,
            });
        }

        match self.authenticator.sign_in(email, &request.password).await {
            Ok(session) => {
                self.guard.reset(email);
                info!(identifier = %email, user_id = %session.user_id, "login succeeded");
                Ok(LoginOutcome::Success(session))
            }
            Err(AuthError::InvalidCredentials) => {
                self.guard.record_failure(email);
                let status = self.guard.check_lock(email);
                warn!(identifier = %email, attempts_remaining = status.attempts_remaining, "login rejected");

                if status.is_locked {
                    Ok(LoginOutcome::Locked {
                        remaining_minutes: status.remaining_minutes,
                    })
                } else {
                    Ok(LoginOutcome::Rejected {
                        attempts_remaining: status.attempts_remaining,
                    })
                }
            }
            Err(e) => {
                warn!(identifier = %email, error = %e, "login failed at provider");
                Err(e.into())
            }
        }
    }

    pub async fn request_password_reset(&self, request: &PasswordResetRequest) -> Result<(), AppError> {
        request.validate()?;
        self.authenticator
            .request_password_reset(&request.email, &self.config.password_reset_redirect)
            .await?;
        info!(identifier = %request.email, "password reset requested");
        Ok(())
    }
}
