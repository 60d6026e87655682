use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;

use super::AccessTokenData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::KindState;

pub async fn refresh(
    State(state): State<KindState>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiSuccess<AccessTokenData>), ApiError> {
    let old_token = jar
        .get(&state.cookie.name)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized("Refresh token missing".to_string()))?;

    let pair = state.auth.refresh(&old_token).await?;

    // Rotation always re-sets the short-lived cookie.
    let jar = jar.add(state.cookie.issue(pair.refresh_token, false));

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            AccessTokenData {
                access_token: pair.access_token,
            },
        ),
    ))
}
