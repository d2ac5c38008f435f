//! User infrastructure module
//!
//! Password hashing with Argon2, the in-memory repository and the service that
//! checks login credentials.

mod password;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use repository::InMemoryUserRepository;
pub use service::{CreateUserRequest, UserService};
