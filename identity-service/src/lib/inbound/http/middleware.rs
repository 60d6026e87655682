use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::actor::models::ActorId;
use crate::inbound::http::router::KindState;

/// Extension type carrying the authenticated principal.
#[derive(Debug, Clone)]
pub struct AuthenticatedActor {
    pub actor_id: ActorId,
    pub email: String,
}

/// Middleware that validates bearer tokens against this kind's access
/// secret and adds the principal to request extensions.
///
/// A token signed for the other actor kind fails signature validation
/// here; the kinds cannot impersonate each other.
pub async fn authenticate(
    State(state): State<KindState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let claims = state.auth.verify_access_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Bearer token validation failed");
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid or expired token"
            })),
        )
            .into_response()
    })?;

    let actor_id = ActorId::from_string(&claims.sub).map_err(|e| {
        tracing::error!(error = %e, "Malformed 'sub' claim in token");
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid token format"
            })),
        )
            .into_response()
    })?;

    req.extensions_mut().insert(AuthenticatedActor {
        actor_id,
        email: claims.email,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Missing authorization header"
                })),
            )
                .into_response()
        })?;

    header.strip_prefix("Bearer ").ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid authorization header format"
            })),
        )
            .into_response()
    })
}
