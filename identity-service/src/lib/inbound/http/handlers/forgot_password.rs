use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::actor::models::EmailAddress;
use crate::domain::auth::errors::AuthError;
use crate::inbound::http::router::KindState;

const GENERIC_RESPONSE: &str =
    "If the address is registered, password reset instructions have been sent to it.";

pub async fn forgot_password(
    State(state): State<KindState>,
    Json(body): Json<ForgotPasswordRequestBody>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let email = EmailAddress::new(body.email).map_err(AuthError::from)?;

    match state.auth.request_password_reset(&email).await {
        // An unknown address answers exactly like a known one; account
        // existence never leaks through this endpoint.
        Ok(()) | Err(AuthError::ActorNotFound) => Ok(ApiSuccess::new(
            StatusCode::OK,
            MessageData {
                message: GENERIC_RESPONSE.to_string(),
            },
        )),
        Err(e) => Err(ApiError::from(e)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForgotPasswordRequestBody {
    email: String,
}
