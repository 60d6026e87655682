use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::actor::models::ActorId;
use crate::domain::actor::models::ActorKind;
use crate::domain::actor::models::EmailAddress;

/// Login input after request-level validation.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: EmailAddress,
    pub password: String,
    /// Extends the refresh session to the long lifetime.
    pub remember: bool,
}

/// A signed access/refresh pair returned by issuance.
///
/// Every pair is backed by exactly one stored [`RefreshSession`] at the
/// moment it is returned.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// One outstanding refresh token.
///
/// At most one session exists per token value; a session is consumed
/// exactly once, by rotation or by logout.
#[derive(Debug, Clone)]
pub struct RefreshSession {
    pub id: Uuid,
    pub actor_id: ActorId,
    pub actor_kind: ActorKind,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RefreshSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Command to register a new actor with validated fields.
#[derive(Debug)]
pub struct RegisterCommand {
    pub name: String,
    pub email: EmailAddress,
    pub phone: Option<String>,
    pub password: String,
}

/// Token lifetimes, environment-tunable with the recommended defaults.
#[derive(Debug, Clone, Copy)]
pub struct TokenTtl {
    pub access_minutes: i64,
    pub refresh_days: i64,
    /// Refresh lifetime when the caller asked to be remembered.
    pub remember_days: i64,
}

impl Default for TokenTtl {
    fn default() -> Self {
        Self {
            access_minutes: 15,
            refresh_days: 7,
            remember_days: 30,
        }
    }
}

impl TokenTtl {
    /// Refresh lifetime in days for the given remember flag.
    pub fn refresh_days_for(&self, remember: bool) -> i64 {
        if remember {
            self.remember_days
        } else {
            self.refresh_days
        }
    }
}
