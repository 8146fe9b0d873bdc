use std::sync::Arc;

use account_service::config::Config;
use account_service::inbound::http::router::create_router;
use account_service::inbound::http::router::AppState;
use account_service::outbound::repositories::InMemoryAccountRepository;
use account_service::outbound::repositories::PostgresAccountRepository;
use auth::BearerGate;
use auth::PasswordHasher;
use auth::TokenIssuer;
use auth::TokenValidator;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        database_configured = config.database.url.is_some(),
        jwt_issuer = %config.jwt.issuer,
        jwt_audience = %config.jwt.audience,
        jwt_expires_in_minutes = config.jwt.expires_in_minutes,
        "Configuration loaded"
    );

    let auth_config = config.jwt.to_auth_config().map_err(|e| {
        tracing::error!(error = %e, "Invalid token configuration");
        e
    })?;

    let password_hasher = Arc::new(PasswordHasher::new());
    let token_issuer = Arc::new(TokenIssuer::new(auth_config.clone()));
    let gate = BearerGate::new(Arc::new(TokenValidator::new(auth_config)));

    let state = match &config.database.url {
        Some(database_url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            tracing::info!(
                max_connections = 5,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            AppState::from_repository(
                Arc::new(PostgresAccountRepository::new(pg_pool)),
                password_hasher,
                token_issuer,
                gate,
            )
        }
        None => {
            tracing::warn!("No database URL configured, accounts are kept in memory only");

            AppState::from_repository(
                Arc::new(InMemoryAccountRepository::new()),
                password_hasher,
                token_issuer,
                gate,
            )
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state)).await?;

    tracing::info!("Server exited");

    Ok(())
}
