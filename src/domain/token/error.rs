//! Token failures

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Reasons a token cannot be issued or accepted
///
/// The display strings are returned to API clients verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Required params are missing.")]
    MissingSecret,

    #[error("Wrong number of segments")]
    WrongNumberOfSegments,

    #[error("{0}")]
    Malformed(String),

    #[error("Algorithm not allowed")]
    AlgorithmNotAllowed,

    #[error("Signature verification failed")]
    SignatureInvalid,

    #[error("Cannot handle token prior to {}", .0.format("%Y-%m-%dT%H:%M:%S%z"))]
    BeforeValid(DateTime<Utc>),

    #[error("Expired token")]
    Expired,

    #[error("Invalid issuer")]
    InvalidIssuer,

    #[error("Token does not identify a user")]
    MissingIdentity,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    /// Stable label used for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingSecret => "missing_secret",
            Self::WrongNumberOfSegments | Self::Malformed(_) => "malformed",
            Self::AlgorithmNotAllowed => "algorithm",
            Self::SignatureInvalid => "signature",
            Self::BeforeValid(_) => "not_yet_valid",
            Self::Expired => "expired",
            Self::InvalidIssuer => "issuer",
            Self::MissingIdentity => "identity",
            Self::Signing(_) => "signing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_messages() {
        assert_eq!(TokenError::Expired.to_string(), "Expired token");
        assert_eq!(
            TokenError::SignatureInvalid.to_string(),
            "Signature verification failed"
        );
        assert_eq!(
            TokenError::MissingSecret.to_string(),
            "Required params are missing."
        );
    }

    #[test]
    fn test_before_valid_message() {
        let at = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            TokenError::BeforeValid(at).to_string(),
            "Cannot handle token prior to 2030-01-02T03:04:05+0000"
        );
    }

    #[test]
    fn test_reason_labels() {
        assert_eq!(TokenError::WrongNumberOfSegments.reason(), "malformed");
        assert_eq!(TokenError::Malformed("x".into()).reason(), "malformed");
        assert_eq!(TokenError::Expired.reason(), "expired");
    }
}
