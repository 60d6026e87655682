use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedActor;
use crate::inbound::http::router::KindState;

pub async fn me(
    State(state): State<KindState>,
    Extension(actor): Extension<AuthenticatedActor>,
) -> Result<ApiSuccess<MeResponseData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        MeResponseData {
            id: actor.actor_id.to_string(),
            kind: state.auth.kind().to_string(),
            email: actor.email,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub id: String,
    pub kind: String,
    pub email: String,
}
