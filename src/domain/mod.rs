//! Domain layer - entities, value objects and repository traits

pub mod error;
pub mod order;
pub mod token;
pub mod user;

pub use error::DomainError;
pub use order::{Order, OrderId, OrderPage, OrderQuery, OrderRepository, OrderStatus};
pub use token::{TokenClaims, TokenData, TokenError};
pub use user::{LoginFailure, User, UserId, UserRepository, UserRole, UserStatus};
