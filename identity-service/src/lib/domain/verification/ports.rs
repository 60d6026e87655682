use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::actor::models::ActorKind;
use crate::domain::verification::errors::NotificationError;
use crate::domain::verification::errors::VerificationError;
use crate::domain::verification::models::EventType;
use crate::domain::verification::models::VerificationEvent;

/// Persistence operations for verification events.
///
/// Events are append-then-complete: nothing here deletes a row, the
/// table doubles as the audit trail.
#[async_trait]
pub trait VerificationEventStore: Send + Sync + 'static {
    /// Persist a freshly opened event.
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn insert(&self, event: VerificationEvent) -> Result<VerificationEvent, VerificationError>;

    /// Retrieve the pending event matching key, type, and kind.
    ///
    /// Expiry is not checked here; the caller decides what expired means.
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn find_pending(
        &self,
        kind: ActorKind,
        access_key: &str,
        event_type: EventType,
    ) -> Result<Option<VerificationEvent>, VerificationError>;

    /// Compare-and-swap the event from pending to completed.
    ///
    /// # Returns
    /// True if this call performed the transition, false if the event
    /// was no longer pending (someone else won, or it never existed)
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn mark_completed(&self, id: &Uuid) -> Result<bool, VerificationError>;
}

/// Outbound mail message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Delivery contract for verification mail.
///
/// Transport mechanics live behind this port; the engine only decides
/// whether a failure is fatal for the request at hand.
#[async_trait]
pub trait NotificationGateway: Send + Sync + 'static {
    /// Deliver one message.
    ///
    /// # Errors
    /// * `InvalidMessage` - Recipients or headers could not be built
    /// * `SendFailed` - Transport-level delivery failure
    async fn send(&self, mail: Mail) -> Result<(), NotificationError>;
}
