use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;

use super::ApiError;
use crate::inbound::http::router::KindState;

pub async fn logout(
    State(state): State<KindState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), ApiError> {
    let token = jar
        .get(&state.cookie.name)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized("Refresh token missing".to_string()))?;

    state.auth.logout(&token).await?;

    // The cookie is cleared regardless of how many sessions existed.
    let jar = jar.add(state.cookie.clear());

    Ok((jar, StatusCode::NO_CONTENT))
}
