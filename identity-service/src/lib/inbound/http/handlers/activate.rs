use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::inbound::http::router::KindState;

pub async fn activate(
    State(state): State<KindState>,
    Path(access_key): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    state.auth.activate(&access_key).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData {
            message: "Account activated.".to_string(),
        },
    ))
}
