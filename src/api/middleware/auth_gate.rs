//! Bearer token gate for every route inside the API namespace
//!
//! Requests outside `/{rest_prefix}/{namespace}/` pass through untouched. Inside
//! it, a request must arrive over SSL and, unless it is the token issuing
//! route, carry a valid `Authorization: Bearer <token>` header. Failures are
//! answered here with `401` and never reach a handler.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::debug;

use crate::api::state::{ApiSettings, AppState};
use crate::api::types::ApiError;
use crate::domain::TokenError;
use crate::infrastructure::auth::{TokenVerifier, VerifiedToken};
use crate::infrastructure::observability::record_gate_rejection;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Why the gate refused a request; the message is returned to the client
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("Use SSL connection only")]
    InsecureConnection,

    #[error("Authorization header is missing")]
    MissingAuthorization,

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl GateError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InsecureConnection => "insecure_connection",
            Self::MissingAuthorization => "missing_authorization",
            Self::Token(err) => err.reason(),
        }
    }
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Token(token_err) => token_err.into(),
            other => ApiError::unauthorized(other.to_string()),
        }
    }
}

pub async fn auth_gate_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let decision = evaluate(
        &state.settings,
        state.token_verifier.as_ref(),
        request.method(),
        request.uri().path(),
        request.headers(),
    );

    match decision {
        Ok(Some(verified)) => {
            debug!(user_id = %verified.user_id, "Bearer token accepted");
            request.extensions_mut().insert(verified);
            next.run(request).await
        }
        Ok(None) => next.run(request).await,
        Err(err) => {
            debug!(path = %request.uri().path(), reason = err.reason(), "Request stopped by auth gate");
            record_gate_rejection(err.reason());
            ApiError::from(err).into_response()
        }
    }
}

/// Decide what happens to a request
///
/// `Ok(None)` lets the request through without an identity, either because
/// it is outside the namespace or because it asks for a token.
pub fn evaluate(
    settings: &ApiSettings,
    verifier: &dyn TokenVerifier,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
) -> Result<Option<VerifiedToken>, GateError> {
    if !path.starts_with(&settings.api.namespace_prefix()) {
        return Ok(None);
    }

    if !is_secure(settings, headers) {
        return Err(GateError::InsecureConnection);
    }

    if is_token_request(settings, method, path) {
        return Ok(None);
    }

    let token = bearer_token(headers).ok_or(GateError::MissingAuthorization)?;
    let verified = verifier.verify(token)?;

    Ok(Some(verified))
}

fn is_secure(settings: &ApiSettings, headers: &HeaderMap) -> bool {
    if !settings.require_ssl {
        return true;
    }

    settings.trust_forwarded_proto
        && headers
            .get(FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"))
}

fn is_token_request(settings: &ApiSettings, method: &Method, path: &str) -> bool {
    method == Method::POST
        && path.trim_end_matches('/') == format!("{}/token", settings.base_path())
}

/// Token from an `Authorization: Bearer <token>` header, if well formed
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, rest) = value.split_once(char::is_whitespace)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    rest.split_whitespace().next()
}
