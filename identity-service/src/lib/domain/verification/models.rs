use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::actor::models::ActorKind;
use crate::domain::actor::models::EmailAddress;

/// The two verification flows sharing one event lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    PasswordReset,
    Activate,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PasswordReset => "passwordReset",
            EventType::Activate => "activate",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = UnknownEventValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "passwordReset" => Ok(EventType::PasswordReset),
            "activate" => Ok(EventType::Activate),
            other => Err(UnknownEventValue(other.to_string())),
        }
    }
}

/// Lifecycle state of a verification event.
///
/// `Pending -> Completed` is one-way and terminal; completed or expired
/// events are permanently inert but never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Pending,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::Completed => "completed",
        }
    }
}

impl FromStr for EventStatus {
    type Err = UnknownEventValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(EventStatus::Pending),
            "completed" => Ok(EventStatus::Completed),
            other => Err(UnknownEventValue(other.to_string())),
        }
    }
}

/// Error for event type/status parsing failures
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Unknown event value: {0}")]
pub struct UnknownEventValue(pub String);

/// One in-flight password-reset or activation request.
///
/// The access key is the unguessable public token embedded in the
/// emailed link; the target email is the payload the consumer applies
/// its effect to.
#[derive(Debug, Clone)]
pub struct VerificationEvent {
    pub id: Uuid,
    pub access_key: String,
    pub actor_kind: ActorKind,
    pub event_type: EventType,
    pub status: EventStatus,
    pub email: EmailAddress,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl VerificationEvent {
    /// Open a fresh pending event with a random access key.
    pub fn open(
        kind: ActorKind,
        event_type: EventType,
        email: EmailAddress,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            access_key: Uuid::new_v4().to_string(),
            actor_kind: kind,
            event_type,
            status: EventStatus::Pending,
            email,
            expires_at: now + ttl,
            created_at: now,
            completed_at: None,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_event_is_pending() {
        let email = EmailAddress::new("alice@example.com".to_string()).unwrap();
        let event = VerificationEvent::open(
            ActorKind::User,
            EventType::PasswordReset,
            email,
            Duration::hours(24),
        );

        assert_eq!(event.status, EventStatus::Pending);
        assert!(!event.is_expired(Utc::now()));
        assert!(event.completed_at.is_none());
    }

    #[test]
    fn test_access_keys_are_unique() {
        let email = EmailAddress::new("alice@example.com".to_string()).unwrap();
        let a = VerificationEvent::open(
            ActorKind::User,
            EventType::Activate,
            email.clone(),
            Duration::days(7),
        );
        let b = VerificationEvent::open(
            ActorKind::User,
            EventType::Activate,
            email,
            Duration::days(7),
        );
        assert_ne!(a.access_key, b.access_key);
    }

    #[test]
    fn test_event_value_round_trips() {
        assert_eq!(
            "passwordReset".parse::<EventType>().unwrap(),
            EventType::PasswordReset
        );
        assert_eq!("activate".parse::<EventType>().unwrap(), EventType::Activate);
        assert_eq!(
            "pending".parse::<EventStatus>().unwrap(),
            EventStatus::Pending
        );
        assert!("bogus".parse::<EventType>().is_err());
    }
}
