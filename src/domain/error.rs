use thiserror::Error;

use super::user::UserValidationError;

/// Failures of the user and order stores and the services over them
///
/// Login refusals and token failures have their own types
/// (`LoginFailure`, `TokenError`); this covers everything else.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid ID: {message}")]
    InvalidId { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Seed files that cannot be read or parsed
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<UserValidationError> for DomainError {
    fn from(err: UserValidationError) -> Self {
        match err {
            UserValidationError::ZeroId => Self::InvalidId {
                message: err.to_string(),
            },
            other => Self::validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let error = DomainError::not_found("User '9' not found");
        assert_eq!(error.to_string(), "Not found: User '9' not found");

        let error = DomainError::storage("orders.json: expected value at line 1");
        assert_eq!(
            error.to_string(),
            "Storage error: orders.json: expected value at line 1"
        );
    }

    #[test]
    fn test_from_user_validation() {
        let zero: DomainError = UserValidationError::ZeroId.into();
        assert!(matches!(zero, DomainError::InvalidId { .. }));

        let short: DomainError = UserValidationError::PasswordTooShort(8).into();
        assert_eq!(
            short.to_string(),
            "Validation error: Password is too short. Minimum length is 8 characters"
        );
    }
}
