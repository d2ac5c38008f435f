//! Token endpoints
//!
//! `POST {ns}/token` exchanges a username and password for a bearer token and
//! is the one route the auth gate lets through without one. `POST {ns}/token/check`
//! reports on the token the gate already accepted.

use axum::{
    extract::{Query, State},
    routing::post,
    Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::middleware::Authenticated;
use crate::api::state::AppState;
use crate::api::types::{error::CODE_PREFIX, ApiError, Json};
use crate::domain::TokenError;
use crate::infrastructure::observability::{record_login_failure, record_token_issued};

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/token", post(issue_token))
        .route("/token/check", post(check_token))
}

/// Credentials, from the JSON body or the query string
#[derive(Debug, Default, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl TokenRequest {
    /// Body values win over query values
    fn merge(self, query: TokenRequest) -> Self {
        Self {
            username: self.username.or(query.username),
            password: self.password.or(query.password),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenCheckResponse {
    pub code: String,
    pub data: TokenCheckData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenCheckData {
    pub status: u16,
    pub user_id: u64,
    pub issued_at: Option<String>,
    pub expires_at: Option<String>,
}

/// POST {ns}/token
///
/// The body is the signed token as a bare JSON string.
pub async fn issue_token(
    State(state): State<AppState>,
    Query(query): Query<TokenRequest>,
    body: Option<Json<TokenRequest>>,
) -> Result<Json<String>, ApiError> {
    let request = body.map(Json::into_inner).unwrap_or_default().merge(query);

    let (username, password) = match (request.username, request.password) {
        (Some(username), Some(password)) => (username, password),
        (username, password) => {
            let missing: Vec<&str> = [("username", username.is_none()), ("password", password.is_none())]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
            return Err(ApiError::missing_params(&missing));
        }
    };

    if !state.token_issuer.is_configured() {
        warn!("Token requested but no signing secret is configured");
        return Err(TokenError::MissingSecret.into());
    }

    let user = match state.user_service.authenticate(&username, &password).await? {
        Ok(user) => user,
        Err(failure) => {
            warn!(reason = failure.code(), "Login refused");
            record_login_failure(failure.code());
            return Err(ApiError::login_failed(failure));
        }
    };

    let issued = state.token_issuer.issue(user.id())?;
    record_token_issued();

    info!(user_id = %user.id(), expires_at = ?issued.claims.exp, "Token issued");

    Ok(Json(issued.token))
}

/// POST {ns}/token/check
pub async fn check_token(Authenticated(verified): Authenticated) -> Json<TokenCheckResponse> {
    Json(TokenCheckResponse {
        code: format!("{}_valid_token", CODE_PREFIX),
        data: TokenCheckData {
            status: 200,
            user_id: verified.user_id.value(),
            issued_at: verified.claims.issued_at().map(format_timestamp),
            expires_at: verified.claims.expires_at().map(format_timestamp),
        },
    })
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
