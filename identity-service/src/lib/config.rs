use std::env;

use auth::TokenConfig;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::identity::lockout::LockoutPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub tokens: TokensConfig,
    #[serde(default)]
    pub lockout: LockoutConfig,
    #[serde(default)]
    pub cookies: CookiesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Masks internal error details in responses.
    #[serde(default)]
    pub production: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokensConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
    #[serde(default)]
    pub issuer: Option<String>,
}

impl TokensConfig {
    pub fn token_config(&self) -> TokenConfig {
        TokenConfig {
            access_secret: self.access_secret.clone(),
            refresh_secret: self.refresh_secret.clone(),
            access_ttl: Duration::minutes(self.access_ttl_minutes),
            refresh_ttl: Duration::days(self.refresh_ttl_days),
            issuer: self.issuer.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LockoutConfig {
    pub threshold: u32,
    pub duration_minutes: i64,
}

impl LockoutConfig {
    pub fn policy(&self) -> LockoutPolicy {
        LockoutPolicy::new(self.threshold, Duration::minutes(self.duration_minutes))
    }
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            threshold: LockoutPolicy::DEFAULT_THRESHOLD,
            duration_minutes: LockoutPolicy::DEFAULT_DURATION_MINUTES,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CookiesConfig {
    pub secure: bool,
    pub refresh_path: String,
}

impl Default for CookiesConfig {
    fn default() -> Self {
        Self {
            secure: true,
            refresh_path: "/api/v1/auth".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, TOKENS__ACCESS_SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        // Example: TOKENS__ACCESS_TTL_MINUTES=5 overrides tokens.access_ttl_minutes
        Self::load_with(Environment::default().separator("__"))
    }

    fn load_with(environment: Environment) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(environment)
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        if config.tokens.access_secret == config.tokens.refresh_secret {
            tracing::warn!("Access and refresh tokens share a signing secret");
        }

        Ok(config)
    }
}
