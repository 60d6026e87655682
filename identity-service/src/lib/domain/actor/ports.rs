use async_trait::async_trait;

use crate::domain::actor::models::Actor;
use crate::domain::actor::models::ActorId;
use crate::domain::actor::models::ActorKind;
use crate::domain::auth::errors::AuthError;

/// Persistence operations for the credential store.
///
/// The credential records themselves are owned elsewhere; this port is
/// the narrow slice the authentication core needs, always scoped by
/// actor kind so the two principal populations stay isolated.
#[async_trait]
pub trait ActorStore: Send + Sync + 'static {
    /// Persist a new actor.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered for this kind
    /// * `Database` - Storage operation failed
    async fn create(&self, actor: Actor) -> Result<Actor, AuthError>;

    /// Retrieve an actor of the given kind by email.
    ///
    /// # Returns
    /// Optional actor (None if not found)
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn find_by_email(&self, kind: ActorKind, email: &str)
        -> Result<Option<Actor>, AuthError>;

    /// Retrieve an actor of the given kind by identifier.
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn find_by_id(&self, kind: ActorKind, id: &ActorId) -> Result<Option<Actor>, AuthError>;

    /// Replace the stored password hash for the actor with this email.
    ///
    /// # Errors
    /// * `ActorNotFound` - No actor of this kind has that email
    /// * `Database` - Storage operation failed
    async fn update_password(
        &self,
        kind: ActorKind,
        email: &str,
        password_hash: &str,
    ) -> Result<(), AuthError>;

    /// Flip `is_active` to true for the actor with this email.
    ///
    /// # Errors
    /// * `ActorNotFound` - No actor of this kind has that email
    /// * `Database` - Storage operation failed
    async fn mark_active(&self, kind: ActorKind, email: &str) -> Result<(), AuthError>;
}
