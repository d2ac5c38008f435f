//! Outcomes of a failed username/password check

use thiserror::Error;

/// Why a login attempt was refused
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum LoginFailure {
    #[error("The username field is empty.")]
    EmptyUsername,

    #[error("The password field is empty.")]
    EmptyPassword,

    #[error("Unknown username. Check again or try your email address.")]
    InvalidUsername,

    #[error("The password you entered for the username is incorrect.")]
    IncorrectPassword,

    #[error("This account has been suspended.")]
    AccountSuspended,
}

impl LoginFailure {
    /// Machine-readable code, appended to the API error code prefix
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "empty_username",
            Self::EmptyPassword => "empty_password",
            Self::InvalidUsername => "invalid_username",
            Self::IncorrectPassword => "incorrect_password",
            Self::AccountSuspended => "account_suspended",
        }
    }
}
