use async_trait::async_trait;

use crate::domain::actor::models::ActorId;
use crate::domain::actor::models::ActorKind;
use crate::domain::actor::models::EmailAddress;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::RefreshSession;
use crate::domain::verification::errors::VerificationError;
use crate::domain::verification::models::EventType;
use crate::domain::verification::models::VerificationEvent;

/// Persistence operations for refresh sessions.
///
/// Rows are scoped by their unique token value; rotation and logout are
/// the only consumers, so no operation here ever updates a row in place.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Persist a freshly issued session.
    ///
    /// # Errors
    /// * `Database` - Storage operation failed (including a token collision)
    async fn insert(&self, session: RefreshSession) -> Result<(), AuthError>;

    /// Retrieve a session by its token value without consuming it.
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshSession>, AuthError>;

    /// Atomically delete and return the session with this token value.
    ///
    /// This is the single-writer primitive behind rotation: of any
    /// number of concurrent callers presenting the same token, exactly
    /// one receives the row and every other caller receives `None`.
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn claim_by_token(&self, token: &str) -> Result<Option<RefreshSession>, AuthError>;

    /// Delete every session belonging to the actor.
    ///
    /// # Returns
    /// Number of sessions removed
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn delete_all_for_actor(
        &self,
        kind: ActorKind,
        actor_id: &ActorId,
    ) -> Result<u64, AuthError>;
}

/// The verification-event engine as seen by the authenticator.
///
/// One engine instance exists per actor kind; the authenticator owns the
/// account-state pre-checks and applies the effect after `consume`.
#[async_trait]
pub trait VerificationEngine: Send + Sync + 'static {
    /// Open a password-reset event and email its link.
    ///
    /// # Errors
    /// * `Database` - Event could not be stored
    /// * `Notification` - Reset mail could not be delivered (fatal here)
    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), VerificationError>;

    /// Open an activation event and email its link.
    ///
    /// Mail delivery failures are logged and swallowed; activation must
    /// not block registration.
    ///
    /// # Errors
    /// * `Database` - Event could not be stored
    async fn request_activation(&self, email: &EmailAddress) -> Result<(), VerificationError>;

    /// Consume the pending event with this access key.
    ///
    /// Absent, expired, and already-consumed events are all reported as
    /// `EventNotFoundOrExpired`; of concurrent callers presenting the
    /// same key, exactly one succeeds.
    ///
    /// # Errors
    /// * `EventNotFoundOrExpired` - No consumable match
    /// * `Database` - Storage operation failed
    async fn consume(
        &self,
        access_key: &str,
        event_type: EventType,
    ) -> Result<VerificationEvent, VerificationError>;
}
