use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Marker value carried by every refresh token.
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Claims carried by short-lived access tokens.
///
/// Signed with the actor-kind-specific access secret; proves identity
/// for API calls until `exp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Subject (actor identifier)
    pub sub: String,

    /// Email of the authenticated actor
    pub email: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl AccessClaims {
    /// Create access claims expiring `ttl_minutes` from now.
    pub fn new(actor_id: impl ToString, email: impl ToString, ttl_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: actor_id.to_string(),
            email: email.to_string(),
            exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Claims carried by refresh tokens.
///
/// Signed with the actor-kind-specific refresh secret. The random `jti`
/// keeps the serialized token unique even when two tokens are minted
/// for the same actor within the same second, which the session store
/// relies on for its unique token column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshClaims {
    /// Subject (actor identifier)
    pub sub: String,

    /// Email of the actor, kept under the historical `username` key
    pub username: String,

    /// Always [`REFRESH_TOKEN_TYPE`]; refuses access-scope replay
    pub token_type: String,

    /// Unique token identifier
    pub jti: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl RefreshClaims {
    /// Create refresh claims expiring `ttl_days` from now.
    pub fn new(actor_id: impl ToString, email: impl ToString, ttl_days: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: actor_id.to_string(),
            username: email.to_string(),
            token_type: REFRESH_TOKEN_TYPE.to_string(),
            jti: Uuid::new_v4().to_string(),
            exp: (now + Duration::days(ttl_days)).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Whether the `token_type` claim marks this as a refresh token.
    pub fn is_refresh(&self) -> bool {
        self.token_type == REFRESH_TOKEN_TYPE
    }
}
