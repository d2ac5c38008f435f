//! User domain
//!
//! Users who can obtain tokens, their roles, and the reasons a login is refused.

mod entity;
mod login;
mod repository;
mod validation;

pub use entity::{User, UserId, UserRole, UserStatus};
pub use login::LoginFailure;
pub use repository::UserRepository;
pub use validation::{sanitize_key, validate_password, validate_username, UserValidationError};

#[cfg(test)]
pub use repository::MockUserRepository;
