//! Infrastructure layer - implementations of domain traits and process-wide setup

pub mod auth;
pub mod logging;
pub mod observability;
pub mod order;
pub mod user;
