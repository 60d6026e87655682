use std::sync::Arc;

use auth::AccessClaims;
use auth::PasswordHasher;
use auth::RefreshClaims;
use auth::TokenSigner;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::actor::models::Actor;
use crate::domain::actor::models::ActorId;
use crate::domain::actor::models::ActorKind;
use crate::domain::actor::models::EmailAddress;
use crate::domain::actor::ports::ActorStore;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::RefreshSession;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::TokenPair;
use crate::domain::auth::models::TokenTtl;
use crate::domain::auth::ports::SessionStore;
use crate::domain::auth::ports::VerificationEngine;
use crate::domain::verification::models::EventType;

/// Authenticator for one actor kind.
///
/// Validates credentials, issues and rotates token pairs, and drives
/// the reset/activation flows through the verification engine. Two
/// instances exist at runtime, one per [`ActorKind`], each with its own
/// [`TokenSigner`]; everything else about the flows is identical.
pub struct AuthService<AS, SS, VE>
where
    AS: ActorStore,
    SS: SessionStore,
    VE: VerificationEngine,
{
    kind: ActorKind,
    actors: Arc<AS>,
    sessions: Arc<SS>,
    verification: Arc<VE>,
    signer: TokenSigner,
    ttl: TokenTtl,
}

impl<AS, SS, VE> AuthService<AS, SS, VE>
where
    AS: ActorStore,
    SS: SessionStore,
    VE: VerificationEngine,
{
    /// Create an authenticator with injected dependencies.
    ///
    /// # Arguments
    /// * `kind` - Actor kind this instance serves
    /// * `actors` - Credential store implementation
    /// * `sessions` - Refresh session persistence implementation
    /// * `verification` - Verification-event engine for this kind
    /// * `signer` - This kind's access/refresh signing key pair
    /// * `ttl` - Token lifetimes
    pub fn new(
        kind: ActorKind,
        actors: Arc<AS>,
        sessions: Arc<SS>,
        verification: Arc<VE>,
        signer: TokenSigner,
        ttl: TokenTtl,
    ) -> Self {
        Self {
            kind,
            actors,
            sessions,
            verification,
            signer,
            ttl,
        }
    }

    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    /// Authenticate an actor and issue a token pair.
    ///
    /// An unknown email and a wrong password fail identically.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No such actor or password mismatch
    /// * `Database` - Storage operation failed
    pub async fn login(&self, credentials: Credentials) -> Result<TokenPair, AuthError> {
        let actor = self
            .actors
            .find_by_email(self.kind, credentials.email.as_str())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password_matches =
            verify_password(credentials.password, actor.password_hash.clone()).await?;
        if !password_matches {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(kind = %self.kind, actor_id = %actor.id, "Actor logged in");

        self.issue_tokens(&actor, credentials.remember).await
    }

    /// Rotate a refresh token: consume the presented session and issue
    /// a replacement pair.
    ///
    /// The session row is claimed with an atomic delete, so of any
    /// number of concurrent calls presenting the same token exactly one
    /// succeeds; the rest observe `InvalidOrExpiredToken` as if the
    /// token had already been consumed.
    ///
    /// # Errors
    /// * `InvalidOrExpiredToken` - Bad signature, no session, or expired
    /// * `ActorNotFound` - Owning actor no longer exists
    /// * `Database` - Storage operation failed
    pub async fn refresh(&self, old_refresh_token: &str) -> Result<TokenPair, AuthError> {
        // Signature check first: tokens signed for the other actor kind
        // never reach this kind's session rows.
        self.signer
            .verify_refresh(old_refresh_token)
            .map_err(|_| AuthError::InvalidOrExpiredToken)?;

        let session = self
            .sessions
            .claim_by_token(old_refresh_token)
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        if session.is_expired(Utc::now()) {
            return Err(AuthError::InvalidOrExpiredToken);
        }

        let actor = self
            .actors
            .find_by_id(self.kind, &session.actor_id)
            .await?
            .ok_or(AuthError::ActorNotFound)?;

        tracing::debug!(kind = %self.kind, actor_id = %actor.id, "Refresh token rotated");

        // Rotation always issues the short session lifetime; only an
        // explicit login opts into the remembered one.
        self.issue_tokens(&actor, false).await
    }

    /// Invalidate every session of the actor owning this token.
    ///
    /// # Errors
    /// * `TokenNotFound` - No session matches the presented token
    /// * `Database` - Storage operation failed
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let session = self
            .sessions
            .find_by_token(refresh_token)
            .await?
            .filter(|session| session.actor_kind == self.kind)
            .ok_or(AuthError::TokenNotFound)?;

        let removed = self
            .sessions
            .delete_all_for_actor(self.kind, &session.actor_id)
            .await?;

        tracing::info!(
            kind = %self.kind,
            actor_id = %session.actor_id,
            sessions_removed = removed,
            "Actor logged out"
        );

        Ok(())
    }

    /// Register a new actor, request activation, and log them in.
    ///
    /// Activation mail delivery is best-effort; a failure there never
    /// fails the registration.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is taken for this kind
    /// * `Database` - Storage operation failed
    pub async fn register(&self, command: RegisterCommand) -> Result<TokenPair, AuthError> {
        let password_hash = hash_password(command.password).await?;

        let actor = Actor {
            id: ActorId::new(),
            kind: self.kind,
            email: command.email,
            name: command.name,
            phone: command.phone,
            password_hash,
            is_active: false,
            is_blocked: false,
            created_at: Utc::now(),
        };

        let actor = self.actors.create(actor).await?;

        tracing::info!(kind = %self.kind, actor_id = %actor.id, "Actor registered");

        self.verification.request_activation(&actor.email).await?;

        self.issue_tokens(&actor, true).await
    }

    /// Open a password-reset event for an existing, usable account.
    ///
    /// The account-state pre-checks live here, not in the engine; how
    /// much of the failure reaches the caller is the transport layer's
    /// decision.
    ///
    /// # Errors
    /// * `ActorNotFound` - No actor of this kind has that email
    /// * `NotActive` - Account has not completed activation
    /// * `Blocked` - Account is blocked
    /// * `Notification` - Reset mail could not be delivered
    /// * `Database` - Storage operation failed
    pub async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), AuthError> {
        let actor = self
            .actors
            .find_by_email(self.kind, email.as_str())
            .await?
            .ok_or(AuthError::ActorNotFound)?;

        if !actor.is_active {
            return Err(AuthError::NotActive);
        }
        if actor.is_blocked {
            return Err(AuthError::Blocked);
        }

        self.verification.request_password_reset(email).await?;
        Ok(())
    }

    /// Consume a reset event and replace the stored password.
    ///
    /// # Errors
    /// * `EventNotFoundOrExpired` - Unknown, expired, or consumed key
    /// * `ActorNotFound` - Target account vanished since the request
    /// * `Database` - Storage operation failed
    pub async fn reset_password(
        &self,
        access_key: &str,
        new_password: String,
    ) -> Result<(), AuthError> {
        let event = self
            .verification
            .consume(access_key, EventType::PasswordReset)
            .await?;

        let password_hash = hash_password(new_password).await?;
        self.actors
            .update_password(self.kind, event.email.as_str(), &password_hash)
            .await?;

        tracing::info!(kind = %self.kind, event_id = %event.id, "Password reset completed");

        Ok(())
    }

    /// Consume an activation event and mark the account active.
    ///
    /// # Errors
    /// * `EventNotFoundOrExpired` - Unknown, expired, or consumed key
    /// * `ActorNotFound` - Target account vanished since the request
    /// * `Database` - Storage operation failed
    pub async fn activate(&self, access_key: &str) -> Result<(), AuthError> {
        let event = self
            .verification
            .consume(access_key, EventType::Activate)
            .await?;

        self.actors
            .mark_active(self.kind, event.email.as_str())
            .await?;

        tracing::info!(kind = %self.kind, event_id = %event.id, "Account activated");

        Ok(())
    }

    /// Validate a bearer token against this kind's access secret.
    ///
    /// # Errors
    /// * `InvalidOrExpiredToken` - Bad signature, wrong kind, or expired
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        self.signer
            .verify_access(token)
            .map_err(|_| AuthError::InvalidOrExpiredToken)
    }

    /// Sign a pair and persist the backing session.
    ///
    /// The session row is committed before the pair is returned, so a
    /// caller holding a refresh token always holds a stored one.
    async fn issue_tokens(&self, actor: &Actor, remember: bool) -> Result<TokenPair, AuthError> {
        let access_claims =
            AccessClaims::new(actor.id, actor.email.as_str(), self.ttl.access_minutes);
        let access_token = self.signer.sign_access(&access_claims)?;

        let refresh_days = self.ttl.refresh_days_for(remember);
        let refresh_claims = RefreshClaims::new(actor.id, actor.email.as_str(), refresh_days);
        let refresh_token = self.signer.sign_refresh(&refresh_claims)?;

        let now = Utc::now();
        self.sessions
            .insert(RefreshSession {
                id: Uuid::new_v4(),
                actor_id: actor.id,
                actor_kind: self.kind,
                token: refresh_token.clone(),
                expires_at: now + Duration::days(refresh_days),
                created_at: now,
            })
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

/// Argon2 is deliberately slow; keep it off the async workers.
async fn hash_password(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || PasswordHasher::new().hash(&password))
        .await
        .map_err(|e| AuthError::Unknown(e.to_string()))?
        .map_err(AuthError::from)
}

async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || PasswordHasher::new().verify(&password, &hash))
        .await
        .map_err(|e| AuthError::Unknown(e.to_string()))
}
