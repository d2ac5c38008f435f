//! User service for login checks and account management

use std::sync::Arc;

use crate::domain::user::{
    sanitize_key, validate_password, validate_username, LoginFailure, User, UserId,
    UserRepository, UserRole,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub id: u64,
    pub username: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Create a new user with a freshly hashed password
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        validate_username(&request.username)?;
        validate_password(&request.password)?;

        let user_id = UserId::new(request.id)?;

        if self.repository.get_by_username(&request.username).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                request.username
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::new(user_id, &request.username, password_hash, request.role);

        self.repository.create(user).await
    }

    /// Check a username/password pair
    ///
    /// The outer error is reserved for storage failures; a refused login is an
    /// `Ok(Err(_))` carrying the reason shown to the client.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Result<User, LoginFailure>, DomainError> {
        let username = sanitize_key(username);

        if username.is_empty() {
            return Ok(Err(LoginFailure::EmptyUsername));
        }

        if password.is_empty() {
            return Ok(Err(LoginFailure::EmptyPassword));
        }

        let Some(user) = self.repository.get_by_username(&username).await? else {
            return Ok(Err(LoginFailure::InvalidUsername));
        };

        if !user.is_active() {
            return Ok(Err(LoginFailure::AccountSuspended));
        }

        if !self.hasher.verify(password, user.password_hash()) {
            return Ok(Err(LoginFailure::IncorrectPassword));
        }

        self.repository.record_login(user.id()).await?;

        Ok(Ok(self.repository.get(user.id()).await?.unwrap_or(user)))
    }

    pub async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}
