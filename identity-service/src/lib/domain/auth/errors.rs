use thiserror::Error;

use crate::domain::verification::errors::VerificationError;

/// Error for ActorKind parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActorKindError {
    #[error("Unknown actor kind: {0}")]
    Unknown(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for authentication operations.
///
/// The message for `InvalidCredentials` is deliberately generic: a
/// login against an unknown email and a login with a wrong password
/// are indistinguishable from the outside.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired refresh token")]
    InvalidOrExpiredToken,

    #[error("Refresh token not found")]
    TokenNotFound,

    #[error("Actor not found")]
    ActorNotFound,

    #[error("Account is not activated")]
    NotActive,

    #[error("Account is blocked")]
    Blocked,

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Verification request not found or expired")]
    EventNotFoundOrExpired,

    // Value object validation errors
    #[error("Invalid actor kind: {0}")]
    InvalidActorKind(#[from] ActorKindError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    Jwt(#[from] auth::JwtError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<VerificationError> for AuthError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::EventNotFoundOrExpired => AuthError::EventNotFoundOrExpired,
            VerificationError::Database(msg) => AuthError::Database(msg),
            VerificationError::Notification(e) => AuthError::Notification(e.to_string()),
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Unknown(err.to_string())
    }
}
