//! Auth Gateway
//!
//! A small authentication API providing:
//! - User registration with field-level validation
//! - Password login issuing JWT access/refresh token pairs
//! - Token refresh and bearer-authenticated identity lookup
//! - Best-effort signup webhook notification

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::{AppState, UserServiceTrait};
use infrastructure::auth::{TokenConfig, TokenService};
use infrastructure::notification::{NoopNotifier, SignupNotifier, WebhookNotifier};
use infrastructure::user::{
    Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService,
};
use tracing::info;

/// Create the application state with all services initialized from defaults
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let hasher = Arc::new(Argon2Hasher::new());

    info!("Storage backend: {}", config.storage.backend);

    let user_service: Arc<dyn UserServiceTrait> = match config.storage.backend.as_str() {
        "postgres" => {
            let database_url = std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

            info!("Connecting to PostgreSQL...");
            let pool = sqlx::PgPool::connect(&database_url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;
            info!("PostgreSQL connection established");

            let repository = Arc::new(PostgresUserRepository::new(pool));
            Arc::new(UserService::new(repository, hasher))
        }
        _ => {
            let repository = Arc::new(InMemoryUserRepository::new());
            Arc::new(UserService::new(repository, hasher))
        }
    };

    let token_service = Arc::new(TokenService::new(TokenConfig::new(
        &config.auth.jwt_secret,
        config.auth.access_ttl_minutes,
        config.auth.refresh_ttl_days,
    )));

    let notifier: Arc<dyn SignupNotifier> = match &config.notification.webhook_url {
        Some(url) => {
            info!("Signup webhook enabled: {}", url);
            Arc::new(WebhookNotifier::new(
                url,
                Duration::from_secs(config.notification.timeout_secs),
            )?)
        }
        None => {
            info!("No signup webhook configured, notifications disabled");
            Arc::new(NoopNotifier)
        }
    };

    Ok(AppState::new(user_service, token_service, notifier))
}
