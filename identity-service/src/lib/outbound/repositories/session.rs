use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::actor::models::ActorId;
use crate::domain::actor::models::ActorKind;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::RefreshSession;
use crate::domain::auth::ports::SessionStore;

pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct SessionRow {
    id: Uuid,
    actor_id: Uuid,
    actor_kind: String,
    token: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl TryFrom<SessionRow> for RefreshSession {
    type Error = AuthError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        Ok(RefreshSession {
            id: row.id,
            actor_id: ActorId(row.actor_id),
            actor_kind: row.actor_kind.parse()?,
            token: row.token,
            expires_at: row.expires_at,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn insert(&self, session: RefreshSession) -> Result<(), AuthError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_sessions (id, actor_id, actor_kind, token, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(session.id)
        .bind(session.actor_id.0)
        .bind(session.actor_kind.as_str())
        .bind(&session.token)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshSession>, AuthError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, actor_id, actor_kind, token, expires_at, created_at
            FROM refresh_sessions
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        row.map(RefreshSession::try_from).transpose()
    }

    async fn claim_by_token(&self, token: &str) -> Result<Option<RefreshSession>, AuthError> {
        // Delete-with-returning makes rotation single-winner: concurrent
        // claims of the same token value see the row at most once.
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            DELETE FROM refresh_sessions
            WHERE token = $1
            RETURNING id, actor_id, actor_kind, token, expires_at, created_at
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        row.map(RefreshSession::try_from).transpose()
    }

    async fn delete_all_for_actor(
        &self,
        kind: ActorKind,
        actor_id: &ActorId,
    ) -> Result<u64, AuthError> {
        let result = sqlx::query(
            "DELETE FROM refresh_sessions WHERE actor_kind = $1 AND actor_id = $2",
        )
        .bind(kind.as_str())
        .bind(actor_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
