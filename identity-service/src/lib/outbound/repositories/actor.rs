use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::actor::models::Actor;
use crate::domain::actor::models::ActorId;
use crate::domain::actor::models::ActorKind;
use crate::domain::actor::models::EmailAddress;
use crate::domain::actor::ports::ActorStore;
use crate::domain::auth::errors::AuthError;

pub struct PostgresActorStore {
    pool: PgPool,
}

impl PostgresActorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ActorRow {
    id: Uuid,
    kind: String,
    email: String,
    name: String,
    phone: Option<String>,
    password_hash: String,
    is_active: bool,
    is_blocked: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<ActorRow> for Actor {
    type Error = AuthError;

    fn try_from(row: ActorRow) -> Result<Self, Self::Error> {
        Ok(Actor {
            id: ActorId(row.id),
            kind: row.kind.parse()?,
            email: EmailAddress::new(row.email)?,
            name: row.name,
            phone: row.phone,
            password_hash: row.password_hash,
            is_active: row.is_active,
            is_blocked: row.is_blocked,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl ActorStore for PostgresActorStore {
    async fn create(&self, actor: Actor) -> Result<Actor, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO actors (id, kind, email, name, phone, password_hash, is_active, is_blocked, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(actor.id.0)
        .bind(actor.kind.as_str())
        .bind(actor.email.as_str())
        .bind(&actor.name)
        .bind(&actor.phone)
        .bind(&actor.password_hash)
        .bind(actor.is_active)
        .bind(actor.is_blocked)
        .bind(actor.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("actors_kind_email_key")
                {
                    return AuthError::EmailAlreadyExists(actor.email.as_str().to_string());
                }
            }
            AuthError::Database(e.to_string())
        })?;

        Ok(actor)
    }

    async fn find_by_email(&self, kind: ActorKind, email: &str) -> Result<Option<Actor>, AuthError> {
        let row = sqlx::query_as::<_, ActorRow>(
            r#"
            SELECT id, kind, email, name, phone, password_hash, is_active, is_blocked, created_at
            FROM actors
            WHERE kind = $1 AND email = $2
            "#,
        )
        .bind(kind.as_str())
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        row.map(Actor::try_from).transpose()
    }

    async fn find_by_id(&self, kind: ActorKind, id: &ActorId) -> Result<Option<Actor>, AuthError> {
        let row = sqlx::query_as::<_, ActorRow>(
            r#"
            SELECT id, kind, email, name, phone, password_hash, is_active, is_blocked, created_at
            FROM actors
            WHERE kind = $1 AND id = $2
            "#,
        )
        .bind(kind.as_str())
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        row.map(Actor::try_from).transpose()
    }

    async fn update_password(
        &self,
        kind: ActorKind,
        email: &str,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        let result = sqlx::query(
            "UPDATE actors SET password_hash = $3 WHERE kind = $1 AND email = $2",
        )
        .bind(kind.as_str())
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::ActorNotFound);
        }
        Ok(())
    }

    async fn mark_active(&self, kind: ActorKind, email: &str) -> Result<(), AuthError> {
        let result = sqlx::query("UPDATE actors SET is_active = TRUE WHERE kind = $1 AND email = $2")
            .bind(kind.as_str())
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::ActorNotFound);
        }
        Ok(())
    }
}
