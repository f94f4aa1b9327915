use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordPolicy;
use identity_service::config::Config;
use identity_service::domain::identity::service::AuthService;
use identity_service::inbound::http::cookies::SessionTransport;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::PostgresDoctorDirectory;
use identity_service::outbound::repositories::PostgresIdentityRepository;
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
        production = config.server.production,
        access_ttl_minutes = config.tokens.access_ttl_minutes,
        refresh_ttl_days = config.tokens.refresh_ttl_days,
        lockout_threshold = config.lockout.threshold,
        lockout_duration_minutes = config.lockout.duration_minutes,
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

    let token_config = config.tokens.token_config();
    let authenticator = Arc::new(Authenticator::new(PasswordPolicy::new(), &token_config));
    let identity_repository = Arc::new(PostgresIdentityRepository::new(pg_pool.clone()));
    let doctor_directory = Arc::new(PostgresDoctorDirectory::new(pg_pool));

    let auth_service = Arc::new(AuthService::new(
        identity_repository,
        doctor_directory,
        authenticator,
        config.lockout.policy(),
    ));

    let transport = SessionTransport::new(
        config.cookies.secure,
        config.cookies.refresh_path.clone(),
        token_config.access_ttl,
        token_config.refresh_ttl,
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, transport, config.server.production);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
