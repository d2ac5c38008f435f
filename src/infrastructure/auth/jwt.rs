//! JWT token generation and validation over a shared HS256 secret

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt::Debug;

use crate::domain::user::UserId;
use crate::domain::{TokenClaims, TokenError};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Configuration for JWT service
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared signing secret; `None` leaves the service unable to issue or verify
    pub secret: Option<String>,
    /// Value of the `iss` claim
    pub issuer: String,
    /// Token lifetime
    pub ttl: Duration,
    /// Clock skew tolerated on `nbf`, `iat` and `exp`, in seconds
    pub leeway_secs: i64,
    /// Reject tokens whose `iss` differs from `issuer`
    pub validate_issuer: bool,
}

impl JwtConfig {
    /// Create new JWT configuration with a 7 day lifetime and no leeway
    pub fn new(secret: Option<String>, issuer: impl Into<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
            issuer: issuer.into(),
            ttl: Duration::days(7),
            leeway_secs: 0,
            validate_issuer: false,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_leeway(mut self, leeway_secs: i64) -> Self {
        self.leeway_secs = leeway_secs.max(0);
        self
    }

    pub fn with_issuer_validation(mut self, validate_issuer: bool) -> Self {
        self.validate_issuer = validate_issuer;
        self
    }
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[hidden]"))
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .field("leeway_secs", &self.leeway_secs)
            .field("validate_issuer", &self.validate_issuer)
            .finish()
    }
}

/// A freshly signed token and the claims inside it
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

/// Outcome of a successful verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id: UserId,
    pub claims: TokenClaims,
}

/// Emits signed, time-bounded credentials
pub trait TokenIssuer: Send + Sync + Debug {
    /// Whether a signing secret is configured
    fn is_configured(&self) -> bool;

    fn issue(&self, user_id: UserId) -> Result<IssuedToken, TokenError>;
}

/// Validates bearer credentials and extracts the identity they carry
pub trait TokenVerifier: Send + Sync + Debug {
    fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError>;
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// JWT service implementation using a shared secret
pub struct JwtService {
    config: JwtConfig,
    keys: Option<Keys>,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("config", &self.config)
            .field("keys", &self.keys.as_ref().map(|_| "[hidden]"))
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let keys = config.secret.as_ref().map(|secret| Keys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        });

        Self { config, keys }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Issue a token as of `now`
    pub fn issue_at(&self, user_id: UserId, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let keys = self.keys.as_ref().ok_or(TokenError::MissingSecret)?;
        let claims = TokenClaims::new(&self.config.issuer, &user_id, now, self.config.ttl);

        let token = encode(&Header::new(ALGORITHM), &claims, &keys.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, claims })
    }

    /// Verify a token as of `now`
    ///
    /// Time checks run in the order not-before, issued-at, expiry, after the
    /// signature has been confirmed. A time claim the token omits is skipped.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken, TokenError> {
        let keys = self.keys.as_ref().ok_or(TokenError::MissingSecret)?;

        if token.split('.').count() != 3 {
            return Err(TokenError::WrongNumberOfSegments);
        }

        let claims = decode::<TokenClaims>(token, &keys.decoding, &self.validation())
            .map_err(map_decode_error)?
            .claims;

        let now = now.timestamp();
        let leeway = self.config.leeway_secs;

        if let Some(nbf) = claims.nbf.filter(|nbf| *nbf > now + leeway) {
            return Err(TokenError::BeforeValid(to_datetime(nbf)));
        }

        if let Some(iat) = claims.iat.filter(|iat| *iat > now + leeway) {
            return Err(TokenError::BeforeValid(to_datetime(iat)));
        }

        if claims.exp.is_some_and(|exp| now - leeway >= exp) {
            return Err(TokenError::Expired);
        }

        if self.config.validate_issuer && claims.iss != self.config.issuer {
            return Err(TokenError::InvalidIssuer);
        }

        let user_id = claims.user_id().ok_or(TokenError::MissingIdentity)?;

        Ok(VerifiedToken { user_id, claims })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(ALGORITHM);
        // Time windows are checked in verify_at with second precision
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.set_required_spec_claims::<&str>(&[]);
        validation
    }
}

impl TokenIssuer for JwtService {
    fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    fn issue(&self, user_id: UserId) -> Result<IssuedToken, TokenError> {
        self.issue_at(user_id, Utc::now())
    }
}

impl TokenVerifier for JwtService {
    fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        self.verify_at(token, Utc::now())
    }
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            TokenError::AlgorithmNotAllowed
        }
        ErrorKind::Json(_) => TokenError::Malformed("Invalid claims encoding".to_string()),
        ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
            TokenError::Malformed("Invalid segment encoding".to_string())
        }
        ErrorKind::InvalidToken => TokenError::Malformed("Malformed token".to_string()),
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
        _ => TokenError::Malformed(err.to_string()),
    }
}

fn to_datetime(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(ts, 0).single().unwrap_or_default()
}
