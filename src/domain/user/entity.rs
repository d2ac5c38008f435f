//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::UserValidationError;

/// User identifier - a positive integer, as carried in token claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct UserId(u64);

impl UserId {
    /// Create a new UserId after validation
    pub fn new(id: u64) -> Result<Self, UserValidationError> {
        if id == 0 {
            return Err(UserValidationError::ZeroId);
        }
        Ok(Self(id))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for u64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role assigned to a user, deciding which resources it may read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Administrator,
    ShopManager,
    #[default]
    Customer,
}

impl UserRole {
    /// Whether the role may list and view shop orders
    pub fn can_read_orders(&self) -> bool {
        matches!(self, Self::Administrator | Self::ShopManager)
    }
}

/// Status of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// User is active and can log in
    #[default]
    Active,
    /// User is temporarily suspended
    Suspended,
}

impl UserStatus {
    /// Check if the user can log in
    pub fn can_login(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// User entity for authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    id: UserId,
    /// Username for login, stored sanitized
    username: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    #[serde(default)]
    role: UserRole,
    #[serde(default)]
    status: UserStatus,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new user
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
            role,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    /// Check if the user is active and can log in
    pub fn is_active(&self) -> bool {
        self.status.can_login()
    }

    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.touch();
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.touch();
    }

    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
    }

    pub fn suspend(&mut self) {
        self.status = UserStatus::Suspended;
        self.touch();
    }

    /// Activate a suspended user
    pub fn activate(&mut self) {
        if self.status == UserStatus::Suspended {
            self.status = UserStatus::Active;
            self.touch();
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(id: u64, username: &str) -> User {
        User::new(
            UserId::new(id).unwrap(),
            username,
            "hashed_password",
            UserRole::ShopManager,
        )
    }

    #[test]
    fn test_user_id_rejects_zero() {
        assert!(UserId::new(0).is_err());
        assert_eq!(UserId::new(12).unwrap().value(), 12);
    }

    #[test]
    fn test_user_id_deserialize() {
        let id: UserId = serde_json::from_str("5").unwrap();
        assert_eq!(id.value(), 5);
        assert!(serde_json::from_str::<UserId>("0").is_err());
    }

    #[test]
    fn test_role_capabilities() {
        assert!(UserRole::Administrator.can_read_orders());
        assert!(UserRole::ShopManager.can_read_orders());
        assert!(!UserRole::Customer.can_read_orders());
    }

    #[test]
    fn test_user_status_changes() {
        let mut user = create_test_user(1, "manager");
        assert!(user.is_active());

        user.suspend();
        assert!(!user.is_active());
        assert_eq!(user.status(), UserStatus::Suspended);

        user.activate();
        assert!(user.is_active());
    }

    #[test]
    fn test_user_record_login() {
        let mut user = create_test_user(1, "manager");
        assert!(user.last_login_at().is_none());

        user.record_login();
        assert!(user.last_login_at().is_some());
    }

    #[test]
    fn test_user_serialization_excludes_password() {
        let user = create_test_user(1, "manager");

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("\"role\":\"shop_manager\""));
    }

    #[test]
    fn test_user_deserialization_defaults() {
        let user: User = serde_json::from_str(
            r#"{"id": 3, "username": "clerk", "password_hash": "$argon2id$stub"}"#,
        )
        .unwrap();

        assert_eq!(user.id().value(), 3);
        assert_eq!(user.role(), UserRole::Customer);
        assert!(user.is_active());
        assert_eq!(user.password_hash(), "$argon2id$stub");
    }
}
