#![allow(dead_code)] // each test binary uses a different slice of this module

//! In-memory port implementations backing the flow tests.
//!
//! The stores mirror the relational constraints the real adapters rely
//! on (unique token, unique access key, single-winner claim and
//! complete) so the full login/refresh/reset flows run without outside
//! infrastructure.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::TokenSigner;
use chrono::Duration;
use chrono::Utc;
use identity_service::domain::actor::models::Actor;
use identity_service::domain::actor::models::ActorId;
use identity_service::domain::actor::models::ActorKind;
use identity_service::domain::actor::models::EmailAddress;
use identity_service::domain::actor::ports::ActorStore;
use identity_service::domain::auth::errors::AuthError;
use identity_service::domain::auth::models::Credentials;
use identity_service::domain::auth::models::RefreshSession;
use identity_service::domain::auth::models::RegisterCommand;
use identity_service::domain::auth::models::TokenPair;
use identity_service::domain::auth::models::TokenTtl;
use identity_service::domain::auth::ports::SessionStore;
use identity_service::domain::auth::service::AuthService;
use identity_service::domain::verification::errors::NotificationError;
use identity_service::domain::verification::errors::VerificationError;
use identity_service::domain::verification::models::EventType;
use identity_service::domain::verification::models::VerificationEvent;
use identity_service::domain::verification::ports::Mail;
use identity_service::domain::verification::ports::NotificationGateway;
use identity_service::domain::verification::ports::VerificationEventStore;
use identity_service::domain::verification::service::VerificationService;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryActorStore {
    rows: Mutex<Vec<Actor>>,
}

#[async_trait]
impl ActorStore for InMemoryActorStore {
    async fn create(&self, actor: Actor) -> Result<Actor, AuthError> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|row| row.kind == actor.kind && row.email == actor.email)
        {
            return Err(AuthError::EmailAlreadyExists(
                actor.email.as_str().to_string(),
            ));
        }
        rows.push(actor.clone());
        Ok(actor)
    }

    async fn find_by_email(&self, kind: ActorKind, email: &str) -> Result<Option<Actor>, AuthError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|row| row.kind == kind && row.email.as_str() == email)
            .cloned())
    }

    async fn find_by_id(&self, kind: ActorKind, id: &ActorId) -> Result<Option<Actor>, AuthError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|row| row.kind == kind && row.id == *id)
            .cloned())
    }

    async fn update_password(
        &self,
        kind: ActorKind,
        email: &str,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.kind == kind && row.email.as_str() == email)
            .ok_or(AuthError::ActorNotFound)?;
        row.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn mark_active(&self, kind: ActorKind, email: &str) -> Result<(), AuthError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.kind == kind && row.email.as_str() == email)
            .ok_or(AuthError::ActorNotFound)?;
        row.is_active = true;
        Ok(())
    }
}

impl InMemoryActorStore {
    pub fn get(&self, kind: ActorKind, email: &str) -> Option<Actor> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|row| row.kind == kind && row.email.as_str() == email)
            .cloned()
    }

    pub fn block(&self, kind: ActorKind, email: &str) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows
            .iter_mut()
            .find(|row| row.kind == kind && row.email.as_str() == email)
        {
            row.is_blocked = true;
        }
    }
}

#[derive(Default)]
pub struct InMemorySessionStore {
    rows: Mutex<HashMap<String, RefreshSession>>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: RefreshSession) -> Result<(), AuthError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&session.token) {
            return Err(AuthError::Database("duplicate token".to_string()));
        }
        rows.insert(session.token.clone(), session);
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshSession>, AuthError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.get(token).cloned())
    }

    async fn claim_by_token(&self, token: &str) -> Result<Option<RefreshSession>, AuthError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.remove(token))
    }

    async fn delete_all_for_actor(
        &self,
        kind: ActorKind,
        actor_id: &ActorId,
    ) -> Result<u64, AuthError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, session| !(session.actor_kind == kind && session.actor_id == *actor_id));
        Ok((before - rows.len()) as u64)
    }
}

impl InMemorySessionStore {
    pub fn count_for(&self, kind: ActorKind, actor_id: &ActorId) -> usize {
        let rows = self.rows.lock().unwrap();
        rows.values()
            .filter(|session| session.actor_kind == kind && session.actor_id == *actor_id)
            .count()
    }

    pub fn expire_token(&self, token: &str) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(session) = rows.get_mut(token) {
            session.expires_at = Utc::now() - Duration::hours(1);
        }
    }
}

#[derive(Default)]
pub struct InMemoryEventStore {
    rows: Mutex<Vec<VerificationEvent>>,
}

#[async_trait]
impl VerificationEventStore for InMemoryEventStore {
    async fn insert(&self, event: VerificationEvent) -> Result<VerificationEvent, VerificationError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|row| row.access_key == event.access_key) {
            return Err(VerificationError::Database(
                "duplicate access key".to_string(),
            ));
        }
        rows.push(event.clone());
        Ok(event)
    }

    async fn find_pending(
        &self,
        kind: ActorKind,
        access_key: &str,
        event_type: EventType,
    ) -> Result<Option<VerificationEvent>, VerificationError> {
        use identity_service::domain::verification::models::EventStatus;

        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|row| {
                row.actor_kind == kind
                    && row.access_key == access_key
                    && row.event_type == event_type
                    && row.status == EventStatus::Pending
            })
            .cloned())
    }

    async fn mark_completed(&self, id: &Uuid) -> Result<bool, VerificationError> {
        use identity_service::domain::verification::models::EventStatus;

        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|row| row.id == *id && row.status == EventStatus::Pending)
        {
            Some(row) => {
                row.status = EventStatus::Completed;
                row.completed_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl InMemoryEventStore {
    pub fn expire_key(&self, access_key: &str) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|row| row.access_key == access_key) {
            row.expires_at = Utc::now() - Duration::hours(1);
        }
    }
}

/// Captures outgoing mail instead of delivering it.
#[derive(Default)]
pub struct RecordingGateway {
    sent: Mutex<Vec<Mail>>,
}

#[async_trait]
impl NotificationGateway for RecordingGateway {
    async fn send(&self, mail: Mail) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

impl RecordingGateway {
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Pull the access key out of the last emailed link.
    pub fn last_access_key(&self) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let body = &sent.last()?.body;
        let line = body.lines().find(|line| line.contains("http"))?;
        Some(line.rsplit('/').next()?.trim().to_string())
    }
}

pub type TestAuthenticator = AuthService<
    InMemoryActorStore,
    InMemorySessionStore,
    VerificationService<InMemoryEventStore, RecordingGateway>,
>;

/// One actor kind's fully wired service over in-memory stores.
pub struct TestHarness {
    pub kind: ActorKind,
    pub auth: Arc<TestAuthenticator>,
    pub actors: Arc<InMemoryActorStore>,
    pub sessions: Arc<InMemorySessionStore>,
    pub events: Arc<InMemoryEventStore>,
    pub outbox: Arc<RecordingGateway>,
}

impl TestHarness {
    pub fn new(kind: ActorKind) -> Self {
        let actors = Arc::new(InMemoryActorStore::default());
        let sessions = Arc::new(InMemorySessionStore::default());
        let events = Arc::new(InMemoryEventStore::default());
        let outbox = Arc::new(RecordingGateway::default());

        let verification = Arc::new(VerificationService::new(
            kind,
            Arc::clone(&events),
            Arc::clone(&outbox),
            "http://localhost:5173".to_string(),
        ));

        let (access_secret, refresh_secret) = match kind {
            ActorKind::User => ("user-access-secret!", "user-refresh-secret!"),
            ActorKind::Employee => ("employee-access-secret!", "employee-refresh-secret!"),
        };

        let auth = Arc::new(AuthService::new(
            kind,
            Arc::clone(&actors),
            Arc::clone(&sessions),
            verification,
            TokenSigner::new(access_secret.as_bytes(), refresh_secret.as_bytes()),
            TokenTtl::default(),
        ));

        Self {
            kind,
            auth,
            actors,
            sessions,
            events,
            outbox,
        }
    }

    /// Register and activate an account, ready for login.
    pub async fn provision(&self, email: &str, password: &str) -> TokenPair {
        let pair = self
            .auth
            .register(RegisterCommand {
                name: "Test Actor".to_string(),
                email: EmailAddress::new(email.to_string()).unwrap(),
                phone: None,
                password: password.to_string(),
            })
            .await
            .expect("registration failed");

        let key = self
            .outbox
            .last_access_key()
            .expect("no activation mail captured");
        self.auth.activate(&key).await.expect("activation failed");

        pair
    }

    pub async fn login(&self, email: &str, password: &str, remember: bool) -> TokenPair {
        self.auth
            .login(Credentials {
                email: EmailAddress::new(email.to_string()).unwrap(),
                password: password.to_string(),
                remember,
            })
            .await
            .expect("login failed")
    }
}
