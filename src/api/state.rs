//! Application state for shared services

use std::sync::Arc;

use chrono::{FixedOffset, Offset, Utc};

use crate::config::{ApiConfig, AppConfig, SiteConfig};
use crate::domain::order::{Order, OrderPage, OrderQuery, OrderRepository};
use crate::domain::user::{LoginFailure, User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::{TokenIssuer, TokenVerifier};
use crate::infrastructure::order::OrderService;
use crate::infrastructure::user::{CreateUserRequest, PasswordHasher, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub order_service: Arc<dyn OrderServiceTrait>,
    pub token_issuer: Arc<dyn TokenIssuer>,
    pub token_verifier: Arc<dyn TokenVerifier>,
    pub settings: Arc<ApiSettings>,
}

/// Request-time settings the handlers and the auth gate read
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub api: ApiConfig,
    pub site: SiteConfig,
    pub require_ssl: bool,
    pub trust_forwarded_proto: bool,
}

impl ApiSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            api: config.api.clone(),
            site: config.site.clone(),
            require_ssl: config.auth.require_ssl,
            trust_forwarded_proto: config.auth.trust_forwarded_proto,
        }
    }

    /// e.g. `/wp-json/uni-app/v1`
    pub fn base_path(&self) -> String {
        self.api.base_path()
    }

    /// Site timezone; offsets out of range fall back to UTC
    pub fn site_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.site.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Result<User, LoginFailure>, DomainError>;
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError>;
}

/// Trait for order service operations
#[async_trait::async_trait]
pub trait OrderServiceTrait: Send + Sync {
    async fn get(&self, id: u64) -> Result<Option<Order>, DomainError>;
    async fn list(&self, query: &OrderQuery) -> Result<OrderPage, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Result<User, LoginFailure>, DomainError> {
        UserService::authenticate(self, username, password).await
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }

    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        UserService::create(self, request).await
    }
}

#[async_trait::async_trait]
impl<R: OrderRepository + 'static> OrderServiceTrait for OrderService<R> {
    async fn get(&self, id: u64) -> Result<Option<Order>, DomainError> {
        OrderService::get(self, id).await
    }

    async fn list(&self, query: &OrderQuery) -> Result<OrderPage, DomainError> {
        OrderService::list(self, query).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        OrderService::count(self).await
    }
}
