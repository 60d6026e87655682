use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::auth::errors::ActorKindError;
use crate::domain::auth::errors::EmailError;

/// The two principal kinds the platform authenticates.
///
/// Each kind carries its own signing secrets, its own refresh cookie,
/// and its own session rows; the flows are otherwise identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    User,
    Employee,
}

impl ActorKind {
    /// Stable wire/storage representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorKind::User => "user",
            ActorKind::Employee => "employee",
        }
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorKind {
    type Err = ActorKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(ActorKind::User),
            "employee" => Ok(ActorKind::Employee),
            other => Err(ActorKindError::Unknown(other.to_string())),
        }
    }
}

/// Actor unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// Generate a new random actor ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an actor ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, ActorIdError> {
        Uuid::parse_str(s)
            .map(ActorId)
            .map_err(|e| ActorIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Error for ActorId parsing failures
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ActorIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Actor aggregate entity.
///
/// A principal of either kind capable of authenticating. Email is unique
/// per kind; the password hash is an Argon2id PHC string. `is_active`
/// flips through the activation flow, `is_blocked` is set by operations
/// tooling outside this service.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub email: EmailAddress,
    pub name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_kind_round_trip() {
        for kind in [ActorKind::User, ActorKind::Employee] {
            assert_eq!(kind.as_str().parse::<ActorKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_actor_kind_unknown() {
        assert!("admin".parse::<ActorKind>().is_err());
    }

    #[test]
    fn test_email_address_validation() {
        assert!(EmailAddress::new("alice@example.com".to_string()).is_ok());
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }
}
