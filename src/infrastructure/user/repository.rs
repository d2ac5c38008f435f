//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    /// Sanitized username -> user ID
    username_index: Arc<RwLock<HashMap<String, UserId>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial users; later duplicates are dropped
    pub fn with_users(users: Vec<User>) -> Self {
        let mut users_map = HashMap::new();
        let mut username_map = HashMap::new();

        for user in users {
            if users_map.contains_key(&user.id()) || username_map.contains_key(user.username()) {
                tracing::warn!(user_id = %user.id(), username = user.username(), "Skipping duplicate seed user");
                continue;
            }

            username_map.insert(user.username().to_string(), user.id());
            users_map.insert(user.id(), user);
        }

        Self {
            users: Arc::new(RwLock::new(users_map)),
            username_index: Arc::new(RwLock::new(username_map)),
        }
    }

    /// Load users from a JSON array file
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::storage(format!("Failed to read users file '{}': {}", path.display(), e))
        })?;

        let users: Vec<User> = serde_json::from_str(&content).map_err(|e| {
            DomainError::storage(format!("Failed to parse users file '{}': {}", path.display(), e))
        })?;

        Ok(Self::with_users(users))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let username_index = self.username_index.read().await;

        let Some(user_id) = username_index.get(username) else {
            return Ok(None);
        };

        let users = self.users.read().await;
        Ok(users.get(user_id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let mut username_index = self.username_index.write().await;

        if users.contains_key(&user.id()) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                user.id()
            )));
        }

        if username_index.contains_key(user.username()) {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                user.username()
            )));
        }

        username_index.insert(user.username().to_string(), user.id());
        users.insert(user.id(), user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let mut username_index = self.username_index.write().await;

        let old_username = users
            .get(&user.id())
            .map(|existing| existing.username().to_string())
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", user.id())))?;

        if old_username != user.username() {
            if username_index.contains_key(user.username()) {
                return Err(DomainError::conflict(format!(
                    "Username '{}' already exists",
                    user.username()
                )));
            }

            username_index.remove(&old_username);
            username_index.insert(user.username().to_string(), user.id());
        }

        users.insert(user.id(), user.clone());

        Ok(user.clone())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.users.read().await.len())
    }

    async fn record_login(&self, id: UserId) -> Result<(), DomainError> {
        let mut users = self.users.write().await;

        match users.get_mut(&id) {
            Some(user) => {
                user.record_login();
                Ok(())
            }
            None => Err(DomainError::not_found(format!("User '{}' not found", id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserRole;
    use std::io::Write;

    fn create_test_user(id: u64, username: &str) -> User {
        User::new(
            UserId::new(id).unwrap(),
            username,
            "hashed_password",
            UserRole::ShopManager,
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user(1, "manager");

        repo.create(user).await.unwrap();

        let by_id = repo.get(UserId::new(1).unwrap()).await.unwrap().unwrap();
        assert_eq!(by_id.username(), "manager");

        let by_name = repo.get_by_username("manager").await.unwrap().unwrap();
        assert_eq!(by_name.id().value(), 1);

        assert!(repo.get_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_conflicts() {
        let repo = InMemoryUserRepository::new();
        repo.create(create_test_user(1, "manager")).await.unwrap();

        let same_id = repo.create(create_test_user(1, "other")).await;
        assert!(matches!(same_id, Err(DomainError::Conflict { .. })));

        let same_name = repo.create(create_test_user(2, "manager")).await;
        assert!(matches!(same_name, Err(DomainError::Conflict { .. })));

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_moves_username_index() {
        let repo = InMemoryUserRepository::with_users(vec![
            create_test_user(1, "manager"),
            create_test_user(2, "clerk"),
        ]);

        let mut renamed = User::new(
            UserId::new(1).unwrap(),
            "head-manager",
            "hashed_password",
            UserRole::Administrator,
        );
        renamed.set_role(UserRole::Administrator);
        repo.update(&renamed).await.unwrap();

        assert!(repo.get_by_username("manager").await.unwrap().is_none());
        let found = repo.get_by_username("head-manager").await.unwrap().unwrap();
        assert_eq!(found.role(), UserRole::Administrator);

        let clash = create_test_user(1, "clerk");
        assert!(matches!(
            repo.update(&clash).await,
            Err(DomainError::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = InMemoryUserRepository::new();
        let result = repo.update(&create_test_user(9, "ghost")).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_record_login() {
        let repo = InMemoryUserRepository::with_users(vec![create_test_user(1, "manager")]);
        let id = UserId::new(1).unwrap();

        repo.record_login(id).await.unwrap();
        let user = repo.get(id).await.unwrap().unwrap();
        assert!(user.last_login_at().is_some());

        assert!(repo.record_login(UserId::new(2).unwrap()).await.is_err());
    }

    #[test]
    fn test_with_users_skips_duplicates() {
        let repo = InMemoryUserRepository::with_users(vec![
            create_test_user(1, "manager"),
            create_test_user(2, "manager"),
            create_test_user(1, "clerk"),
        ]);

        let users = repo.users.try_read().unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_from_json_file() {
        let dir = std::env::temp_dir().join(format!("orders-app-users-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("users.json");

        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"[{{"id": 7, "username": "clerk", "password_hash": "$argon2id$x", "role": "shop_manager"}}]"#
        )
        .unwrap();

        let repo = InMemoryUserRepository::from_json_file(&path).await.unwrap();
        let user = repo.get_by_username("clerk").await.unwrap().unwrap();
        assert_eq!(user.id().value(), 7);
        assert_eq!(user.role(), UserRole::ShopManager);

        let missing = InMemoryUserRepository::from_json_file(dir.join("nope.json")).await;
        assert!(matches!(missing, Err(DomainError::Storage { .. })));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
