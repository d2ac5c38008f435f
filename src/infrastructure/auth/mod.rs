//! Authentication infrastructure module
//!
//! This module provides JWT issuance and verification over a shared secret.

mod jwt;

pub use jwt::{IssuedToken, JwtConfig, JwtService, TokenIssuer, TokenVerifier, VerifiedToken};
