//! API middleware components

pub mod auth_gate;
pub mod logging;
pub mod metrics;
pub mod security;
pub mod user_auth;

pub use auth_gate::{auth_gate_middleware, GateError};
pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use security::security_headers_middleware;
pub use user_auth::{Authenticated, RequireUser};
