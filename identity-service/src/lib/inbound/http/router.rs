use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::activate::activate;
use super::handlers::forgot_password::forgot_password;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::me;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::handlers::reset_password::reset_password;
use super::middleware::authenticate as auth_middleware;
use crate::domain::actor::models::ActorKind;
use crate::domain::auth::service::AuthService;
use crate::domain::verification::service::VerificationService;
use crate::outbound::mail::SmtpNotificationGateway;
use crate::outbound::repositories::PostgresActorStore;
use crate::outbound::repositories::PostgresSessionStore;
use crate::outbound::repositories::PostgresVerificationEventStore;

/// The fully wired authenticator for one actor kind.
pub type Authenticator = AuthService<
    PostgresActorStore,
    PostgresSessionStore,
    VerificationService<PostgresVerificationEventStore, SmtpNotificationGateway>,
>;

/// Refresh cookie settings for one actor kind.
#[derive(Debug, Clone)]
pub struct RefreshCookie {
    pub name: String,
    pub path: String,
    pub secure: bool,
    pub max_age_days: i64,
    pub remember_max_age_days: i64,
}

impl RefreshCookie {
    /// Cookie contract for the given kind: per-kind name, HTTP-only,
    /// scoped to that kind's refresh endpoint.
    pub fn for_kind(kind: ActorKind, secure: bool) -> Self {
        let name = match kind {
            ActorKind::User => "refreshToken",
            ActorKind::Employee => "employeeRefreshToken",
        };
        Self {
            name: name.to_string(),
            path: format!("/auth/{kind}/refresh"),
            secure,
            max_age_days: 7,
            remember_max_age_days: 30,
        }
    }

    /// Build the Set-Cookie value carrying a fresh refresh token.
    pub fn issue(&self, token: String, remember: bool) -> Cookie<'static> {
        let days = if remember {
            self.remember_max_age_days
        } else {
            self.max_age_days
        };

        Cookie::build((self.name.clone(), token))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path(self.path.clone())
            .max_age(time::Duration::days(days))
            .build()
    }

    /// Build the expired Set-Cookie value that clears the token.
    pub fn clear(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), String::new()))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path(self.path.clone())
            .max_age(time::Duration::ZERO)
            .build()
    }
}

#[derive(Clone)]
pub struct KindState {
    pub auth: Arc<Authenticator>,
    pub cookie: RefreshCookie,
}

/// Routes for one actor kind, mounted under `/auth/{kind}`.
fn kind_router(state: KindState) -> Router {
    let kind = state.auth.kind();

    let protected_routes = Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/register", post(register))
        .route("/logout", get(logout))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/:access_key", post(reset_password))
        .route(&format!("/activate-{kind}/:access_key"), post(activate))
        .merge(protected_routes)
        .with_state(state)
}

pub fn create_router(user: KindState, employee: KindState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .nest("/auth/user", kind_router(user))
        .nest("/auth/employee", kind_router(employee))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
}
