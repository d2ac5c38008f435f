//! Error envelope in the `{code, message, data: {status}}` shape REST clients expect

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::order::OrderQueryError;
use crate::domain::{DomainError, LoginFailure, TokenError};

/// Prefix of every error code this API originates
pub const CODE_PREFIX: &str = "uni_wc_orders_app";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
    pub data: ApiErrorData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorData {
    pub status: u16,
    /// Offending parameters: a list of names, or a name -> reason map
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                code: code.into(),
                message: message.into(),
                data: ApiErrorData {
                    status: status.as_u16(),
                    params: None,
                },
            },
        }
    }

    /// Replace the error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.code = code.into();
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.response.data.params = Some(params);
        self
    }

    pub fn code(&self) -> &str {
        &self.response.code
    }

    pub fn message(&self) -> &str {
        &self.response.message
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "rest_bad_request", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, format!("{}_auth_error", CODE_PREFIX), message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "rest_forbidden", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "rest_no_route", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "rest_conflict", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_server_error",
            message,
        )
    }

    /// Required parameters absent from the request
    pub fn missing_params(params: &[&str]) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "rest_missing_callback_param",
            format!("Missing parameter(s): {}", params.join(", ")),
        )
        .with_params(Value::from(params.to_vec()))
    }

    /// A parameter present but unusable
    pub fn invalid_param(param: &str, reason: impl Into<String>) -> Self {
        let mut params = serde_json::Map::new();
        params.insert(param.to_string(), Value::String(reason.into()));

        Self::new(
            StatusCode::BAD_REQUEST,
            "rest_invalid_param",
            format!("Invalid parameter(s): {}", param),
        )
        .with_params(Value::Object(params))
    }

    /// Refused username/password pair
    pub fn login_failed(failure: LoginFailure) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            format!("{}_{}", CODE_PREFIX, failure.code()),
            failure.to_string(),
        )
    }

    /// The configured route namespace does not recognise this path
    pub fn no_route() -> Self {
        Self::not_found("No route was found matching the URL and request method.")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::InvalidId { message } => Self::bad_request(message),
            DomainError::Conflict { message } => Self::conflict(message),
            DomainError::Internal { message }
            | DomainError::Storage { message } => {
                tracing::error!(error = %err, "Request failed");
                Self::internal(message)
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::MissingSecret => Self::unauthorized(err.to_string())
                .with_code(format!("{}_misconfiguration", CODE_PREFIX)),
            TokenError::Signing(ref message) => {
                tracing::error!(error = %message, "Token signing failed");
                Self::internal("Could not issue a token.")
            }
            other => Self::unauthorized(other.to_string()),
        }
    }
}

impl From<OrderQueryError> for ApiError {
    fn from(err: OrderQueryError) -> Self {
        Self::invalid_param(err.param(), err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.response.code, self.response.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let err = ApiError::unauthorized("Expired token");
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(json["code"], "uni_wc_orders_app_auth_error");
        assert_eq!(json["message"], "Expired token");
        assert_eq!(json["data"]["status"], 401);
        assert!(json["data"].get("params").is_none());
    }

    #[test]
    fn test_with_code_keeps_status() {
        let err = ApiError::forbidden("Sorry, you cannot list resources.")
            .with_code("uni_wc_orders_app_rest_cannot_view");

        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.code(), "uni_wc_orders_app_rest_cannot_view");
        assert_eq!(err.response.data.status, 403);
    }

    #[test]
    fn test_missing_params() {
        let err = ApiError::missing_params(&["username", "password"]);

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Missing parameter(s): username, password");
        assert_eq!(
            err.response.data.params,
            Some(serde_json::json!(["username", "password"]))
        );
    }

    #[test]
    fn test_invalid_param_from_query_error() {
        let err: ApiError = OrderQueryError::OutOfRange {
            param: "per_page",
            min: 1,
            max: 100,
        }
        .into();

        assert_eq!(err.code(), "rest_invalid_param");
        assert_eq!(err.message(), "Invalid parameter(s): per_page");
        assert_eq!(
            err.response.data.params.unwrap()["per_page"],
            "per_page must be between 1 (inclusive) and 100 (inclusive)"
        );
    }

    #[test]
    fn test_login_failure_codes() {
        let err = ApiError::login_failed(LoginFailure::IncorrectPassword);

        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.code(), "uni_wc_orders_app_incorrect_password");
    }

    #[test]
    fn test_token_error_conversion() {
        let missing: ApiError = TokenError::MissingSecret.into();
        assert_eq!(missing.code(), "uni_wc_orders_app_misconfiguration");
        assert_eq!(missing.message(), "Required params are missing.");
        assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

        let expired: ApiError = TokenError::Expired.into();
        assert_eq!(expired.code(), "uni_wc_orders_app_auth_error");

        let signing: ApiError = TokenError::Signing("boom".into()).into();
        assert_eq!(signing.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!signing.message().contains("boom"));
    }

    #[test]
    fn test_domain_error_conversion() {
        let api_err: ApiError = DomainError::not_found("Order not found").into();
        assert_eq!(api_err.status, StatusCode::NOT_FOUND);

        let api_err: ApiError = DomainError::storage("disk gone").into();
        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
