//! Orders App API
//!
//! JWT-gated REST endpoints for shop orders:
//! - Token issuance from username/password
//! - A bearer token gate in front of every route in the API namespace
//! - Paged, filterable order listings with `X-WP-Total` and `Link` headers

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use api::state::{ApiSettings, AppState, UserServiceTrait};
use domain::user::UserRole;
use infrastructure::{
    auth::{JwtConfig, JwtService},
    order::{InMemoryOrderRepository, OrderService},
    user::{Argon2Hasher, CreateUserRequest, InMemoryUserRepository, UserService},
};

const ADMIN_USER_ID: u64 = 1;
const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD_ENV_VAR: &str = "ADMIN_DEFAULT_PASSWORD";

/// Build the application state from configuration, loading seed files and
/// creating the initial administrator when no users exist
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let users = match &config.seed.users_path {
        Some(path) => {
            info!(path = %path.display(), "Loading users");
            InMemoryUserRepository::from_json_file(path).await?
        }
        None => InMemoryUserRepository::new(),
    };

    let orders = match &config.seed.orders_path {
        Some(path) => {
            info!(path = %path.display(), "Loading orders");
            InMemoryOrderRepository::from_json_file(path).await?
        }
        None => InMemoryOrderRepository::new(),
    };

    let state = build_app_state(config, users, orders);
    create_initial_admin_user(state.user_service.as_ref()).await?;

    Ok(state)
}

/// Wire services over the given repositories
pub fn build_app_state(
    config: &AppConfig,
    users: InMemoryUserRepository,
    orders: InMemoryOrderRepository,
) -> AppState {
    let user_service = Arc::new(UserService::new(Arc::new(users), Arc::new(Argon2Hasher::new())));
    let order_service = Arc::new(OrderService::new(Arc::new(orders)));
    let jwt_service = Arc::new(create_jwt_service(config));

    AppState {
        user_service,
        order_service,
        token_issuer: jwt_service.clone(),
        token_verifier: jwt_service,
        settings: Arc::new(ApiSettings::from_config(config)),
    }
}

/// JWT service over the configured secret (or `JWT_SECRET`)
///
/// Without a secret the service still starts; issuing and verifying fail
/// until one is configured.
pub fn create_jwt_service(config: &AppConfig) -> JwtService {
    let secret = config.auth.resolved_secret();

    if secret.is_none() {
        warn!(
            "No signing secret configured. Set auth.secret or JWT_SECRET; \
             token requests will be refused until then."
        );
    }

    let jwt_config = JwtConfig::new(secret, config.site.url.clone())
        .with_ttl(config.auth.token_ttl())
        .with_leeway(config.auth.leeway_secs)
        .with_issuer_validation(config.auth.validate_issuer);

    JwtService::new(jwt_config)
}

fn generate_random_password() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// Create an initial admin user if no users exist
async fn create_initial_admin_user(user_service: &dyn UserServiceTrait) -> anyhow::Result<()> {
    if user_service.count().await? > 0 {
        return Ok(());
    }

    let (password, from_env) = match std::env::var(ADMIN_PASSWORD_ENV_VAR) {
        Ok(p) if !p.is_empty() => (p, true),
        _ => (generate_random_password(), false),
    };

    user_service
        .create(CreateUserRequest {
            id: ADMIN_USER_ID,
            username: ADMIN_USERNAME.to_string(),
            password: password.clone(),
            role: UserRole::Administrator,
        })
        .await?;

    info!("===========================================");
    info!("Initial admin user created");
    info!("Username: {}", ADMIN_USERNAME);

    if from_env {
        info!("Password: (set via {})", ADMIN_PASSWORD_ENV_VAR);
    } else {
        info!("Password: {}", password);
    }

    info!("===========================================");

    Ok(())
}
