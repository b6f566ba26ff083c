//! ApiHub accounts API
//!
//! Users, sign-in tokens and teams for the ApiHub service catalogue:
//! - Accounts keyed by email with argon2 password hashes
//! - Signed session tokens accepted as `Token` or `Bearer` credentials
//! - Teams keyed by a slug alias with owner and member management
//! - In-memory or PostgreSQL JSONB document storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{Team, TeamResourceCleaner, User};
use infrastructure::{
    auth::{JwtConfig, JwtGenerator, JwtService},
    storage::StorageFactory,
    team::{DetachedResourceCleaner, StorageTeamRepository, TeamService},
    user::{Argon2Hasher, StorageUserRepository, UserService, USER_UNIQUE_FIELDS},
};
use rand::Rng;
use tracing::{info, warn};

/// Create the application state with all services initialized
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = config
        .storage
        .to_storage_config()
        .map_err(anyhow::Error::msg)?;

    info!(backend = ?storage_config.storage_type(), "Opening storage");
    let factory = StorageFactory::connect(&storage_config).await?;

    let jwt_service = create_jwt_service(config);
    let cleaner = Arc::new(DetachedResourceCleaner::new());

    let state = build_app_state(&factory, jwt_service, cleaner).await?;
    info!("Application state initialized");

    Ok(state)
}

/// Wire repositories and services over the collections of `factory`
pub async fn build_app_state(
    factory: &StorageFactory,
    jwt_service: Arc<dyn JwtGenerator>,
    cleaner: Arc<dyn TeamResourceCleaner>,
) -> Result<AppState, domain::DomainError> {
    let user_storage = factory.collection::<User>("users", USER_UNIQUE_FIELDS).await?;
    let team_storage = factory.collection::<Team>("teams", &[]).await?;

    let team_repository = Arc::new(StorageTeamRepository::new(team_storage));
    let user_repository = Arc::new(StorageUserRepository::new(user_storage));

    let user_service = UserService::new(
        user_repository,
        Arc::new(Argon2Hasher::new()),
        team_repository.clone(),
        cleaner,
    );
    let team_service = TeamService::new(team_repository);

    Ok(AppState::new(
        Arc::new(user_service),
        Arc::new(team_service),
        jwt_service,
    ))
}

/// Create JWT service from secret (config, env var, or random)
fn create_jwt_service(config: &AppConfig) -> Arc<dyn JwtGenerator> {
    let jwt_secret = config
        .auth
        .jwt_secret
        .clone()
        .filter(|secret| !secret.is_empty())
        .or_else(|| std::env::var("JWT_SECRET").ok())
        .unwrap_or_else(|| {
            warn!(
                "No JWT secret configured. Generating random secret. \
                Tokens will NOT survive a restart. \
                Set JWT_SECRET or APP__AUTH__JWT_SECRET for persistent sessions."
            );
            generate_random_secret()
        });

    Arc::new(JwtService::new(JwtConfig::new(
        jwt_secret,
        u64::from(config.auth.token_expiration_hours),
    )))
}

fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_secret_shape() {
        let secret = generate_random_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(secret, generate_random_secret());
    }

    #[test]
    fn test_configured_secret_is_used() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("configured".to_string());
        config.auth.token_expiration_hours = 2;

        let service = create_jwt_service(&config);
        assert_eq!(service.expiration_hours(), 2);

        let user = User::new(
            "Bob",
            domain::Email::new("bob@bar.example.org").unwrap(),
            "bob",
            "hash",
        );
        let issued = service.generate(&user).unwrap();
        let other = JwtService::new(JwtConfig::new("configured", 2));
        assert!(other.validate(&issued.token).is_ok());
    }

    #[tokio::test]
    async fn test_build_app_state_in_memory() {
        let state = build_app_state(
            &StorageFactory::in_memory(),
            Arc::new(JwtService::new(JwtConfig::new("secret", 1))),
            Arc::new(DetachedResourceCleaner::new()),
        )
        .await
        .unwrap();

        assert_eq!(state.user_service.count().await.unwrap(), 0);
        assert_eq!(state.team_service.count().await.unwrap(), 0);
    }
}
