use std::env;
use std::sync::Arc;

use anyhow::Context;
use auth::Authenticator;
use auth::PasswordPolicy;
use identity_service::config::Config;
use identity_service::domain::identity::models::EmailAddress;
use identity_service::domain::identity::models::PersonalDetails;
use identity_service::domain::identity::models::RegisterCommand;
use identity_service::domain::identity::ports::AuthServicePort;
use identity_service::domain::identity::service::AuthService;
use identity_service::identity::errors::AuthError;
use identity_service::outbound::repositories::PostgresDoctorDirectory;
use identity_service::outbound::repositories::PostgresIdentityRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Seeds the first admin identity from ADMIN_EMAIL, ADMIN_NAME and ADMIN_PASS.
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=info,create_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let email = env::var("ADMIN_EMAIL").context("ADMIN_EMAIL must be set")?;
    let full_name = env::var("ADMIN_NAME").context("ADMIN_NAME must be set")?;
    let password = env::var("ADMIN_PASS").context("ADMIN_PASS must be set")?;

    let config = Config::load()?;

    let pg_pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pg_pool).await?;

    let authenticator = Arc::new(Authenticator::new(
        PasswordPolicy::new(),
        &config.tokens.token_config(),
    ));
    let service = AuthService::new(
        Arc::new(PostgresIdentityRepository::new(pg_pool.clone())),
        Arc::new(PostgresDoctorDirectory::new(pg_pool)),
        authenticator,
        config.lockout.policy(),
    );

    let command = RegisterCommand::new(
        EmailAddress::new(email)?,
        password,
        PersonalDetails {
            full_name: Some(full_name),
            ..PersonalDetails::default()
        },
    );

    match service.provision_admin(command).await {
        Ok(admin) => {
            tracing::info!(identity_id = %admin.id, email = %admin.email, "Admin created");
            Ok(())
        }
        Err(AuthError::AdminAlreadyExists) => {
            tracing::warn!("Admin already exists, nothing to do");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
