use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::inbound::http::router::KindState;

pub async fn reset_password(
    State(state): State<KindState>,
    Path(access_key): Path<String>,
    Json(body): Json<ResetPasswordRequestBody>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    state.auth.reset_password(&access_key, body.password).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData {
            message: "Password has been reset.".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetPasswordRequestBody {
    password: String,
}
