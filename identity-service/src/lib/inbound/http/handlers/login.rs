use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::AccessTokenData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::actor::models::EmailAddress;
use crate::domain::auth::models::Credentials;
use crate::inbound::http::router::KindState;

pub async fn login(
    State(state): State<KindState>,
    jar: CookieJar,
    Json(body): Json<LoginRequestBody>,
) -> Result<(CookieJar, ApiSuccess<AccessTokenData>), ApiError> {
    // A malformed email cannot match any account; fail like one.
    let email = EmailAddress::new(body.email)
        .map_err(|_| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let pair = state
        .auth
        .login(Credentials {
            email,
            password: body.password,
            remember: body.remember_me,
        })
        .await?;

    let jar = jar.add(state.cookie.issue(pair.refresh_token, body.remember_me));

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

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
    #[serde(rename = "rememberMe", default)]
    remember_me: bool,
}
