use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::actor::models::ActorKind;
use crate::domain::actor::models::EmailAddress;
use crate::domain::verification::errors::VerificationError;
use crate::domain::verification::models::EventStatus;
use crate::domain::verification::models::EventType;
use crate::domain::verification::models::VerificationEvent;
use crate::domain::verification::ports::VerificationEventStore;

pub struct PostgresVerificationEventStore {
    pool: PgPool,
}

impl PostgresVerificationEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct EventRow {
    id: Uuid,
    access_key: String,
    actor_kind: String,
    event_type: String,
    status: String,
    email: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<EventRow> for VerificationEvent {
    type Error = VerificationError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(VerificationEvent {
            id: row.id,
            access_key: row.access_key,
            actor_kind: row
                .actor_kind
                .parse::<ActorKind>()
                .map_err(|e| VerificationError::Database(e.to_string()))?,
            event_type: row
                .event_type
                .parse::<EventType>()
                .map_err(|e| VerificationError::Database(e.to_string()))?,
            status: row
                .status
                .parse::<EventStatus>()
                .map_err(|e| VerificationError::Database(e.to_string()))?,
            email: EmailAddress::new(row.email)
                .map_err(|e| VerificationError::Database(e.to_string()))?,
            expires_at: row.expires_at,
            created_at: row.created_at,
            completed_at: row.completed_at,
        })
    }
}

#[async_trait]
impl VerificationEventStore for PostgresVerificationEventStore {
    async fn insert(&self, event: VerificationEvent) -> Result<VerificationEvent, VerificationError> {
        sqlx::query(
            r#"
            INSERT INTO verification_events
                (id, access_key, actor_kind, event_type, status, email, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(event.id)
        .bind(&event.access_key)
        .bind(event.actor_kind.as_str())
        .bind(event.event_type.as_str())
        .bind(event.status.as_str())
        .bind(event.email.as_str())
        .bind(event.expires_at)
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| VerificationError::Database(e.to_string()))?;

        Ok(event)
    }

    async fn find_pending(
        &self,
        kind: ActorKind,
        access_key: &str,
        event_type: EventType,
    ) -> Result<Option<VerificationEvent>, VerificationError> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, access_key, actor_kind, event_type, status, email,
                   expires_at, created_at, completed_at
            FROM verification_events
            WHERE actor_kind = $1 AND access_key = $2 AND event_type = $3 AND status = 'pending'
            "#,
        )
        .bind(kind.as_str())
        .bind(access_key)
        .bind(event_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| VerificationError::Database(e.to_string()))?;

        row.map(VerificationEvent::try_from).transpose()
    }

    async fn mark_completed(&self, id: &Uuid) -> Result<bool, VerificationError> {
        // Compare-and-set on the status column; the single row update
        // decides which concurrent consumer wins.
        let result = sqlx::query(
            r#"
            UPDATE verification_events
            SET status = 'completed', completed_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| VerificationError::Database(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }
}
