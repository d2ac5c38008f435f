//! Token domain
//!
//! Signed claims carried by bearer tokens and the ways verifying them can fail.

mod claims;
mod error;

pub use claims::{TokenClaims, TokenData};
pub use error::TokenError;
