use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::AccessTokenData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::actor::models::EmailAddress;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::RegisterCommand;
use crate::inbound::http::router::KindState;

pub async fn register(
    State(state): State<KindState>,
    jar: CookieJar,
    Json(body): Json<RegisterRequestBody>,
) -> Result<(CookieJar, ApiSuccess<AccessTokenData>), ApiError> {
    let email = EmailAddress::new(body.email).map_err(AuthError::from)?;

    let pair = state
        .auth
        .register(RegisterCommand {
            name: body.name,
            email,
            phone: body.phone,
            password: body.password,
        })
        .await?;

    // New registrations keep the long-lived cookie.
    let jar = jar.add(state.cookie.issue(pair.refresh_token, true));

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::CREATED,
            AccessTokenData {
                access_token: pair.access_token,
            },
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    name: String,
    email: String,
    #[serde(default)]
    phone: Option<String>,
    password: String,
}
