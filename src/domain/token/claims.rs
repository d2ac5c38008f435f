//! Claims payload for issued tokens

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;

/// Identity block nested under the `data` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    /// Numeric identity of the authenticated user
    #[serde(default)]
    pub user_id: u64,
}

/// JWT claims structure
///
/// Issued tokens carry every time claim; tokens signed elsewhere may omit any
/// of them, and an absent claim is simply not checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issuer (site URL)
    #[serde(default)]
    pub iss: String,
    /// Issued at timestamp (Unix epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Not-before timestamp (Unix epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Expiration timestamp (Unix epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Identity payload
    pub data: TokenData,
}

impl TokenClaims {
    /// Create claims for a user, valid from `issued_at` for `ttl`
    pub fn new(
        issuer: impl Into<String>,
        user_id: &UserId,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let iat = issued_at.timestamp();

        Self {
            iss: issuer.into(),
            iat: Some(iat),
            nbf: Some(iat),
            exp: Some((issued_at + ttl).timestamp()),
            data: TokenData {
                user_id: user_id.value(),
            },
        }
    }

    /// The user carried by the token, if it names one
    pub fn user_id(&self) -> Option<UserId> {
        UserId::new(self.data.user_id).ok()
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.map(timestamp_to_datetime)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.map(timestamp_to_datetime)
    }

    /// Check if the token has expired at `now`; a token without `exp` never does
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp.is_some_and(|exp| now.timestamp() >= exp)
    }
}

fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(ts, 0).single().unwrap_or_default()
}
