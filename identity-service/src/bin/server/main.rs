use std::sync::Arc;

use auth::TokenSigner;
use identity_service::config::Config;
use identity_service::config::JwtConfig;
use identity_service::domain::actor::models::ActorKind;
use identity_service::domain::auth::models::TokenTtl;
use identity_service::domain::auth::service::AuthService;
use identity_service::domain::verification::service::VerificationService;
use identity_service::inbound::http::router::create_router;
use identity_service::inbound::http::router::KindState;
use identity_service::inbound::http::router::RefreshCookie;
use identity_service::outbound::mail::SmtpNotificationGateway;
use identity_service::outbound::repositories::PostgresActorStore;
use identity_service::outbound::repositories::PostgresSessionStore;
use identity_service::outbound::repositories::PostgresVerificationEventStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        environment = %config.app.environment,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let actors = Arc::new(PostgresActorStore::new(pg_pool.clone()));
    let sessions = Arc::new(PostgresSessionStore::new(pg_pool.clone()));
    let events = Arc::new(PostgresVerificationEventStore::new(pg_pool));
    let mailer = Arc::new(
        SmtpNotificationGateway::new(&config.mail)
            .map_err(|e| anyhow::anyhow!("smtp transport: {e}"))?,
    );

    let ttl = TokenTtl {
        access_minutes: config.tokens.access_minutes,
        refresh_days: config.tokens.refresh_days,
        remember_days: config.tokens.remember_days,
    };

    let user = kind_state(
        ActorKind::User,
        &config,
        &config.user_jwt,
        ttl,
        Arc::clone(&actors),
        Arc::clone(&sessions),
        Arc::clone(&events),
        Arc::clone(&mailer),
    );
    let employee = kind_state(
        ActorKind::Employee,
        &config,
        &config.employee_jwt,
        ttl,
        actors,
        sessions,
        events,
        mailer,
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user, employee);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn kind_state(
    kind: ActorKind,
    config: &Config,
    jwt: &JwtConfig,
    ttl: TokenTtl,
    actors: Arc<PostgresActorStore>,
    sessions: Arc<PostgresSessionStore>,
    events: Arc<PostgresVerificationEventStore>,
    mailer: Arc<SmtpNotificationGateway>,
) -> KindState {
    let verification = Arc::new(VerificationService::new(
        kind,
        events,
        mailer,
        config.app.base_url.clone(),
    ));

    let auth = Arc::new(AuthService::new(
        kind,
        actors,
        sessions,
        verification,
        TokenSigner::new(jwt.access_secret.as_bytes(), jwt.refresh_secret.as_bytes()),
        ttl,
    ));

    KindState {
        auth,
        cookie: RefreshCookie::for_kind(kind, config.app.is_production()),
    }
}
