use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use chrono::Utc;

use crate::domain::actor::models::ActorKind;
use crate::domain::actor::models::EmailAddress;
use crate::domain::auth::ports::VerificationEngine;
use crate::domain::verification::errors::VerificationError;
use crate::domain::verification::models::EventType;
use crate::domain::verification::models::VerificationEvent;
use crate::domain::verification::ports::Mail;
use crate::domain::verification::ports::NotificationGateway;
use crate::domain::verification::ports::VerificationEventStore;

const RESET_TTL_HOURS: i64 = 24;
const ACTIVATION_TTL_DAYS: i64 = 7;

/// Verification-event engine for one actor kind.
///
/// Drives the password-reset and activation flows through a shared
/// pending-then-completed event lifecycle. The engine never touches
/// credential records; callers apply the effect after a successful
/// [`consume`](VerificationEngine::consume).
pub struct VerificationService<VS, NG>
where
    VS: VerificationEventStore,
    NG: NotificationGateway,
{
    kind: ActorKind,
    store: Arc<VS>,
    gateway: Arc<NG>,
    base_url: String,
}

impl<VS, NG> VerificationService<VS, NG>
where
    VS: VerificationEventStore,
    NG: NotificationGateway,
{
    /// Create an engine bound to one actor kind.
    ///
    /// # Arguments
    /// * `kind` - Actor kind this engine serves
    /// * `store` - Event persistence implementation
    /// * `gateway` - Mail delivery implementation
    /// * `base_url` - Public base URL embedded in verification links
    pub fn new(kind: ActorKind, store: Arc<VS>, gateway: Arc<NG>, base_url: String) -> Self {
        Self {
            kind,
            store,
            gateway,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn reset_link(&self, access_key: &str) -> String {
        format!("{}/reset-password/{}", self.base_url, access_key)
    }

    fn activation_link(&self, access_key: &str) -> String {
        format!("{}/activate-{}/{}", self.base_url, self.kind, access_key)
    }
}

#[async_trait]
impl<VS, NG> VerificationEngine for VerificationService<VS, NG>
where
    VS: VerificationEventStore,
    NG: NotificationGateway,
{
    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), VerificationError> {
        let event = VerificationEvent::open(
            self.kind,
            EventType::PasswordReset,
            email.clone(),
            Duration::hours(RESET_TTL_HOURS),
        );
        let event = self.store.insert(event).await?;

        tracing::info!(
            kind = %self.kind,
            event_id = %event.id,
            "Password reset event opened"
        );

        // A reset the actor never hears about is a failed reset.
        self.gateway
            .send(Mail {
                recipients: vec![email.as_str().to_string()],
                subject: "Password reset".to_string(),
                body: format!(
                    "To reset your password, follow the link: {}",
                    self.reset_link(&event.access_key)
                ),
            })
            .await?;

        Ok(())
    }

    async fn request_activation(&self, email: &EmailAddress) -> Result<(), VerificationError> {
        let event = VerificationEvent::open(
            self.kind,
            EventType::Activate,
            email.clone(),
            Duration::days(ACTIVATION_TTL_DAYS),
        );
        let event = self.store.insert(event).await?;

        tracing::info!(
            kind = %self.kind,
            event_id = %event.id,
            "Activation event opened"
        );

        // Activation must not block registration; delivery failures are
        // logged and the event stays pending for a manual re-send.
        if let Err(e) = self
            .gateway
            .send(Mail {
                recipients: vec![email.as_str().to_string()],
                subject: "Account activation".to_string(),
                body: format!(
                    "To activate your account, follow the link: {}",
                    self.activation_link(&event.access_key)
                ),
            })
            .await
        {
            tracing::error!(
                kind = %self.kind,
                event_id = %event.id,
                error = %e,
                "Failed to send activation mail"
            );
        }

        Ok(())
    }

    async fn consume(
        &self,
        access_key: &str,
        event_type: EventType,
    ) -> Result<VerificationEvent, VerificationError> {
        let event = self
            .store
            .find_pending(self.kind, access_key, event_type)
            .await?
            .ok_or(VerificationError::EventNotFoundOrExpired)?;

        if event.is_expired(Utc::now()) {
            // Reported identically to an absent key.
            return Err(VerificationError::EventNotFoundOrExpired);
        }

        // CAS claim before the caller applies any effect: the loser of a
        // concurrent race sees the same error as an unknown key.
        if !self.store.mark_completed(&event.id).await? {
            return Err(VerificationError::EventNotFoundOrExpired);
        }

        tracing::info!(
            kind = %self.kind,
            event_id = %event.id,
            event_type = %event.event_type,
            "Verification event consumed"
        );

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use mockall::mock;
    use mockall::predicate::*;
    use uuid::Uuid;

    use super::*;
    use crate::domain::verification::errors::NotificationError;

    mock! {
        pub TestEventStore {}

        #[async_trait]
        impl VerificationEventStore for TestEventStore {
            async fn insert(&self, event: VerificationEvent) -> Result<VerificationEvent, VerificationError>;
            async fn find_pending(
                &self,
                kind: ActorKind,
                access_key: &str,
                event_type: EventType,
            ) -> Result<Option<VerificationEvent>, VerificationError>;
            async fn mark_completed(&self, id: &Uuid) -> Result<bool, VerificationError>;
        }
    }

    mock! {
        pub TestGateway {}

        #[async_trait]
        impl NotificationGateway for TestGateway {
            async fn send(&self, mail: Mail) -> Result<(), NotificationError>;
        }
    }

    fn email() -> EmailAddress {
        EmailAddress::new("alice@example.com".to_string()).unwrap()
    }

    fn service(
        store: MockTestEventStore,
        gateway: MockTestGateway,
    ) -> VerificationService<MockTestEventStore, MockTestGateway> {
        VerificationService::new(
            ActorKind::User,
            Arc::new(store),
            Arc::new(gateway),
            "https://app.example.com".to_string(),
        )
    }

    #[tokio::test]
    async fn test_reset_request_sends_link_with_access_key() {
        let mut store = MockTestEventStore::new();
        let mut gateway = MockTestGateway::new();

        store
            .expect_insert()
            .withf(|event| {
                event.event_type == EventType::PasswordReset
                    && event.actor_kind == ActorKind::User
                    && event.email.as_str() == "alice@example.com"
            })
            .times(1)
            .returning(Ok);

        gateway
            .expect_send()
            .withf(|mail| {
                mail.recipients == vec!["alice@example.com".to_string()]
                    && mail
                        .body
                        .contains("https://app.example.com/reset-password/")
            })
            .times(1)
            .returning(|_| Ok(()));

        let result = service(store, gateway)
            .request_password_reset(&email())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_reset_request_mail_failure_is_fatal() {
        let mut store = MockTestEventStore::new();
        let mut gateway = MockTestGateway::new();

        store.expect_insert().times(1).returning(Ok);
        gateway
            .expect_send()
            .times(1)
            .returning(|_| Err(NotificationError::SendFailed("smtp down".to_string())));

        let result = service(store, gateway)
            .request_password_reset(&email())
            .await;
        assert!(matches!(result, Err(VerificationError::Notification(_))));
    }

    #[tokio::test]
    async fn test_activation_request_mail_failure_is_swallowed() {
        let mut store = MockTestEventStore::new();
        let mut gateway = MockTestGateway::new();

        store.expect_insert().times(1).returning(Ok);
        gateway
            .expect_send()
            .withf(|mail| mail.body.contains("/activate-user/"))
            .times(1)
            .returning(|_| Err(NotificationError::SendFailed("smtp down".to_string())));

        let result = service(store, gateway).request_activation(&email()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_consume_unknown_key() {
        let mut store = MockTestEventStore::new();
        let gateway = MockTestGateway::new();

        store.expect_find_pending().times(1).returning(|_, _, _| Ok(None));

        let result = service(store, gateway)
            .consume("no-such-key", EventType::PasswordReset)
            .await;
        assert!(matches!(
            result,
            Err(VerificationError::EventNotFoundOrExpired)
        ));
    }

    #[tokio::test]
    async fn test_consume_expired_event_reported_as_absent() {
        let mut store = MockTestEventStore::new();
        let gateway = MockTestGateway::new();

        store.expect_find_pending().times(1).returning(|_, _, _| {
            let mut event = VerificationEvent::open(
                ActorKind::User,
                EventType::PasswordReset,
                EmailAddress::new("alice@example.com".to_string()).unwrap(),
                Duration::hours(24),
            );
            event.expires_at = Utc::now() - Duration::hours(1);
            Ok(Some(event))
        });
        // Expired events must not be completed.
        store.expect_mark_completed().times(0);

        let result = service(store, gateway)
            .consume("stale-key", EventType::PasswordReset)
            .await;
        assert!(matches!(
            result,
            Err(VerificationError::EventNotFoundOrExpired)
        ));
    }

    #[tokio::test]
    async fn test_consume_cas_loser_gets_not_found() {
        let mut store = MockTestEventStore::new();
        let gateway = MockTestGateway::new();

        store.expect_find_pending().times(1).returning(|_, _, _| {
            Ok(Some(VerificationEvent::open(
                ActorKind::User,
                EventType::Activate,
                EmailAddress::new("alice@example.com".to_string()).unwrap(),
                Duration::days(7),
            )))
        });
        store.expect_mark_completed().times(1).returning(|_| Ok(false));

        let result = service(store, gateway)
            .consume("contested-key", EventType::Activate)
            .await;
        assert!(matches!(
            result,
            Err(VerificationError::EventNotFoundOrExpired)
        ));
    }

    #[tokio::test]
    async fn test_consume_success_returns_event() {
        let mut store = MockTestEventStore::new();
        let gateway = MockTestGateway::new();

        let event = VerificationEvent::open(
            ActorKind::User,
            EventType::PasswordReset,
            email(),
            Duration::hours(24),
        );
        let key = event.access_key.clone();
        let id = event.id;

        let returned = event.clone();
        let expected_key = key.clone();
        store
            .expect_find_pending()
            .withf(move |kind, candidate, event_type| {
                *kind == ActorKind::User
                    && candidate == expected_key
                    && *event_type == EventType::PasswordReset
            })
            .times(1)
            .returning(move |_, _, _| Ok(Some(returned.clone())));
        store
            .expect_mark_completed()
            .withf(move |candidate| *candidate == id)
            .times(1)
            .returning(|_| Ok(true));

        let consumed = service(store, gateway)
            .consume(&key, EventType::PasswordReset)
            .await
            .expect("consume failed");
        assert_eq!(consumed.email.as_str(), "alice@example.com");
    }
}
