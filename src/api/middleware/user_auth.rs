//! Extractors for the identity the auth gate attached to a request

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;
use crate::domain::TokenError;
use crate::infrastructure::auth::VerifiedToken;

use super::auth_gate::GateError;

/// The verified token of the current request
#[derive(Debug, Clone)]
pub struct Authenticated(pub VerifiedToken);

impl<S: Send + Sync> FromRequestParts<S> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedToken>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(|| GateError::MissingAuthorization.into())
    }
}

/// The active user the current request's token names
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Authenticated(verified) = Authenticated::from_request_parts(parts, state).await?;

        let user = state
            .user_service
            .get(verified.user_id)
            .await?
            .filter(User::is_active)
            .ok_or_else(|| ApiError::from(TokenError::MissingIdentity))?;

        Ok(RequireUser(user))
    }
}
